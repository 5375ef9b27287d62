//! Bot polling loop
//!
//! Pulls updates from the transport, hands each text message to the
//! dispatcher one at a time and sends the reply back to the same chat.
//!
//! Shutdown is only observed while waiting for the next batch. Once a batch
//! has been received it is always handled to the end, and the final offset is
//! confirmed to the transport before returning, so no command runs twice
//! across a restart.

use std::future::Future;
use std::time::Duration;

use spendbot_core::error::Result;
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::telegram::{ChatTransport, Update};

/// Pause after a failed poll before trying again
const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Offset that confirms every update up to and including `update_id`
fn offset_after(offset: Option<i64>, update_id: i64) -> Option<i64> {
    Some(offset.map_or(update_id + 1, |o| o.max(update_id + 1)))
}

/// Dispatch a received batch and send the replies
///
/// Returns the offset for the next poll: one past the highest update id
/// seen, or the given offset when the batch was empty.
pub async fn handle_batch<T: ChatTransport + ?Sized>(
    transport: &T,
    dispatcher: &Dispatcher,
    offset: Option<i64>,
    updates: Vec<Update>,
) -> Option<i64> {
    let mut next_offset = offset;

    for update in updates {
        next_offset = offset_after(next_offset, update.update_id);

        let Some(message) = update.message else {
            continue;
        };
        let Some(text) = message.text else {
            continue;
        };

        debug!(
            "Message from {} in chat {}",
            message.sender.as_deref().unwrap_or("unknown"),
            message.chat_id
        );

        // SQLite calls block, so keep them off the async worker
        let handler = dispatcher.clone();
        let reply = match tokio::task::spawn_blocking(move || handler.handle(&text)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Command handler in chat {} panicked: {}", message.chat_id, e);
                continue;
            }
        };

        if let Some(reply) = reply {
            // A failed reply must not stall the offset, or the command would run twice
            if let Err(e) = transport.send(message.chat_id, &reply).await {
                warn!("Failed to reply in chat {}: {}", message.chat_id, e);
            }
        }
    }

    next_offset
}

/// Poll once and handle the resulting batch
pub async fn poll_once<T: ChatTransport + ?Sized>(
    transport: &T,
    dispatcher: &Dispatcher,
    offset: Option<i64>,
) -> Result<Option<i64>> {
    let updates = transport.poll(offset).await?;
    Ok(handle_batch(transport, dispatcher, offset, updates).await)
}

/// Run the bot until `shutdown` completes
pub async fn run_until<T, F>(transport: &T, dispatcher: &Dispatcher, shutdown: F) -> Result<()>
where
    T: ChatTransport + ?Sized,
    F: Future,
{
    tokio::pin!(shutdown);
    let mut offset = None;
    // Offset last sent to the transport; anything below it is confirmed
    let mut confirmed = None;

    loop {
        let polled = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            polled = transport.poll(offset) => polled,
        };

        match polled {
            Ok(updates) => {
                confirmed = offset;
                offset = handle_batch(transport, dispatcher, offset, updates).await;
            }
            Err(e) => {
                warn!("Polling failed: {}", e);
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(POLL_BACKOFF) => {}
                }
            }
        }
    }

    info!("Shutting down");
    if let Some(next) = offset {
        if offset != confirmed {
            if let Err(e) = transport.acknowledge(next).await {
                warn!("Failed to confirm handled updates: {}", e);
            }
        }
    }
    Ok(())
}

/// Run the bot until Ctrl-C
pub async fn run<T: ChatTransport + ?Sized>(transport: &T, dispatcher: &Dispatcher) -> Result<()> {
    info!("Bot is running, press Ctrl-C to stop");
    run_until(transport, dispatcher, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}
