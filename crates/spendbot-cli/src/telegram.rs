//! Telegram Bot API transport
//!
//! HTTP client for the two Bot API methods the bot needs: `getUpdates`
//! (long polling) and `sendMessage`. The bot loop only sees the
//! [`ChatTransport`] trait so it can run against a mock in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use spendbot_core::error::{Error, Result};
use tracing::debug;

/// Default Bot API endpoint
pub const API_BASE: &str = "https://api.telegram.org";

/// Longest text Telegram accepts in a single message
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// One received update
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub update_id: i64,
    /// Present for plain chat messages; other update kinds only advance the offset
    pub message: Option<ChatMessage>,
}

/// A text message sent to the bot
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub chat_id: i64,
    pub text: Option<String>,
    pub sender: Option<String>,
}

/// Interface between the bot loop and a chat network
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch updates with `update_id >= offset`
    async fn poll(&self, offset: Option<i64>) -> Result<Vec<Update>>;

    /// Send a text reply to a chat
    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Tell the server every update below `offset` has been handled
    ///
    /// Called on shutdown, when the last offset was never sent back in a poll.
    async fn acknowledge(&self, offset: i64) -> Result<()>;
}

/// Telegram Bot API client using long polling
#[derive(Clone)]
pub struct TelegramClient {
    http_client: Client,
    base_url: String,
    token: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    /// Create a client for the public Bot API
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(API_BASE, token, poll_timeout_secs)
    }

    /// Create a client against a custom Bot API server
    pub fn with_base_url(base_url: &str, token: &str, poll_timeout_secs: u64) -> Result<Self> {
        // The HTTP timeout has to outlast the server-side long poll
        let http_client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            poll_timeout_secs,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        // Failed calls still carry a JSON body with `ok = false`, so the
        // HTTP status is not checked separately
        let response = self
            .http_client
            .post(self.method_url(method))
            .json(request)
            .send()
            .await?;

        let body: ApiResponse<Resp> = response.json().await?;
        body.into_result(method)
    }
}

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(Error::Telegram(format!(
                "{} failed ({}): {}",
                method,
                self.error_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "no code".to_string()),
                self.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawUpdate {
    update_id: i64,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    chat: RawChat,
    text: Option<String>,
    from: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    username: Option<String>,
    first_name: Option<String>,
}

impl From<RawUpdate> for Update {
    fn from(raw: RawUpdate) -> Self {
        Update {
            update_id: raw.update_id,
            message: raw.message.map(|m| ChatMessage {
                chat_id: m.chat.id,
                text: m.text,
                sender: m.from.and_then(|u| u.username.or(u.first_name)),
            }),
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn poll(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout_secs,
            limit: None,
            allowed_updates: &["message"],
        };

        let raw: Vec<RawUpdate> = self.call("getUpdates", &request).await?;
        debug!("Received {} updates", raw.len());
        Ok(raw.into_iter().map(Update::from).collect())
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        // Telegram rejects empty or whitespace-only text
        for chunk in split_message(text, MAX_MESSAGE_CHARS)
            .iter()
            .filter(|c| !c.trim().is_empty())
        {
            let request = SendMessageRequest {
                chat_id,
                text: chunk,
            };
            let _: serde_json::Value = self.call("sendMessage", &request).await?;
        }
        Ok(())
    }

    async fn acknowledge(&self, offset: i64) -> Result<()> {
        // A non-blocking poll with the new offset is how the Bot API confirms updates
        let request = GetUpdatesRequest {
            offset: Some(offset),
            timeout: 0,
            limit: Some(1),
            allowed_updates: &["message"],
        };

        let _: Vec<serde_json::Value> = self.call("getUpdates", &request).await?;
        debug!("Confirmed updates below {}", offset);
        Ok(())
    }
}

/// Split text into chunks of at most `limit` characters
///
/// Breaks on line boundaries where possible; a single line longer than the
/// limit is cut at character boundaries. Blank lines are kept, including
/// leading ones and ones that fall right after a break.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    // Chunk being built, with its length in chars
    let mut current: Option<(String, usize)> = None;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if let Some((chunk, len)) = current.as_mut() {
            if *len + 1 + line_len <= limit {
                chunk.push('\n');
                chunk.push_str(line);
                *len += 1 + line_len;
                continue;
            }
        }

        if let Some((chunk, _)) = current.take() {
            chunks.push(chunk);
        }

        if line_len <= limit {
            current = Some((line.to_string(), line_len));
        } else {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
        }
    }

    if let Some((chunk, _)) = current {
        chunks.push(chunk);
    }
    if chunks.is_empty() {
        chunks.push(String::new());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_updates() {
        let body = r#"{
            "ok": true,
            "result": [
                {
                    "update_id": 100,
                    "message": {
                        "message_id": 7,
                        "date": 1710000000,
                        "chat": {"id": 42, "type": "private"},
                        "from": {"id": 9, "is_bot": false, "first_name": "Ana", "username": "ana"},
                        "text": "/get"
                    }
                },
                {"update_id": 101}
            ]
        }"#;

        let response: ApiResponse<Vec<RawUpdate>> = serde_json::from_str(body).unwrap();
        let updates: Vec<Update> = response
            .into_result("getUpdates")
            .unwrap()
            .into_iter()
            .map(Update::from)
            .collect();

        assert_eq!(updates.len(), 2);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat_id, 42);
        assert_eq!(message.text.as_deref(), Some("/get"));
        assert_eq!(message.sender.as_deref(), Some("ana"));
        assert_eq!(updates[1].update_id, 101);
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn test_decode_api_error() {
        let body = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let response: ApiResponse<Vec<RawUpdate>> = serde_json::from_str(body).unwrap();

        let err = response.into_result("getUpdates").unwrap_err();
        match err {
            Error::Telegram(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Unauthorized"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_get_updates_request_shape() {
        let request = GetUpdatesRequest {
            offset: None,
            timeout: 30,
            limit: None,
            allowed_updates: &["message"],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"timeout": 30, "allowed_updates": ["message"]})
        );

        let confirm = GetUpdatesRequest {
            offset: Some(13),
            timeout: 0,
            limit: Some(1),
            allowed_updates: &["message"],
        };
        let json = serde_json::to_value(&confirm).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"offset": 13, "timeout": 0, "limit": 1, "allowed_updates": ["message"]})
        );
    }

    #[test]
    fn test_method_url() {
        let client = TelegramClient::with_base_url("http://localhost:8081/", "123:abc", 5).unwrap();
        assert_eq!(
            client.method_url("getUpdates"),
            "http://localhost:8081/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_split_short_message_untouched() {
        assert_eq!(split_message("hello\nworld", 100), vec!["hello\nworld"]);
        assert_eq!(split_message("", 100), vec![""]);
    }

    #[test]
    fn test_split_on_line_boundaries() {
        let chunks = split_message("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn test_split_keeps_blank_lines() {
        assert_eq!(split_message("\nabc", 10), vec!["\nabc"]);
        assert_eq!(split_message("abc\n\n\ndef", 100), vec!["abc\n\n\ndef"]);

        // A blank line that lands right after a break is its own chunk
        let chunks = split_message("aaaa\n\nbbbb", 4);
        assert_eq!(chunks, vec!["aaaa", "", "bbbb"]);
        assert_eq!(chunks.join("\n"), "aaaa\n\nbbbb");
    }

    #[test]
    fn test_split_long_line() {
        let chunks = split_message("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_counts_chars_not_bytes() {
        let line = "►".repeat(5);
        assert_eq!(split_message(&line, 5), vec![line.clone()]);
    }
}
