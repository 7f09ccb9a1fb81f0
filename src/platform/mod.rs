pub mod telegram;

use async_trait::async_trait;
use serde::Deserialize;

/// The command that triggers the welcome message.
pub const GREETING_COMMAND: &str = "/start";

// ── Wire types ───────────────────────────────────────────────────────────────

/// Webhook update as posted by Telegram. Only the fields the bot reads are
/// modelled; everything else is ignored.
#[derive(Debug, Deserialize, Default)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<WireMessage>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireMessage {
    #[serde(default)]
    pub chat: Option<WireChat>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WireChat {
    #[serde(default)]
    pub id: Option<i64>,
}

/// One resolution variant of a photo. Telegram lists them smallest first.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PhotoSize {
    /// Empty when Telegram omitted it.
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

// ── Domain types ─────────────────────────────────────────────────────────────

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Command { chat_id: i64, command: String },
    Photo { chat_id: i64, sizes: Vec<PhotoSize> },
    Text { chat_id: i64, text: String },
    /// Stickers, documents, voice notes and anything else without text or photo.
    Other { chat_id: i64 },
}

impl InboundEvent {
    pub fn chat_id(&self) -> i64 {
        match self {
            InboundEvent::Command { chat_id, .. }
            | InboundEvent::Photo { chat_id, .. }
            | InboundEvent::Text { chat_id, .. }
            | InboundEvent::Other { chat_id } => *chat_id,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Chat ID not found in request")]
pub struct MissingChatId;

impl TryFrom<Update> for InboundEvent {
    type Error = MissingChatId;

    fn try_from(update: Update) -> Result<Self, Self::Error> {
        let message = update.message.ok_or(MissingChatId)?;
        let chat_id = message.chat.and_then(|c| c.id).ok_or(MissingChatId)?;

        if message.text.as_deref() == Some(GREETING_COMMAND) {
            return Ok(InboundEvent::Command {
                chat_id,
                command: GREETING_COMMAND.to_string(),
            });
        }
        if let Some(sizes) = message.photo {
            return Ok(InboundEvent::Photo { chat_id, sizes });
        }
        if let Some(text) = message.text {
            return Ok(InboundEvent::Text { chat_id, text });
        }
        Ok(InboundEvent::Other { chat_id })
    }
}

/// One unit of content to send back, already formatted for MarkdownV2.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundReply {
    Text { content: String },
    Photo { url: String, caption: String },
}

#[derive(Debug, thiserror::Error)]
#[error("Telegram getFile error: {0}")]
pub struct FileResolutionError(pub String);

/// The chat platform operations the responder needs.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Resolve a file id to a URL the file can be downloaded from.
    async fn file_url(&self, file_id: &str) -> Result<String, FileResolutionError>;

    /// Send a single reply to `chat_id`.
    async fn send_reply(&self, chat_id: i64, reply: &OutboundReply) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(body: serde_json::Value) -> Result<InboundEvent, MissingChatId> {
        let update: Update = serde_json::from_value(body).unwrap();
        InboundEvent::try_from(update)
    }

    #[test]
    fn test_greeting_command() {
        let ev = event(json!({"message": {"chat": {"id": 7}, "text": "/start"}})).unwrap();
        assert_eq!(
            ev,
            InboundEvent::Command {
                chat_id: 7,
                command: "/start".to_string()
            }
        );
    }

    #[test]
    fn test_other_commands_are_text() {
        let ev = event(json!({"message": {"chat": {"id": 7}, "text": "/help"}})).unwrap();
        assert!(matches!(ev, InboundEvent::Text { ref text, .. } if text == "/help"));
    }

    #[test]
    fn test_photo_keeps_variant_order() {
        let ev = event(json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "date": 1700000000,
                "chat": {"id": -100, "type": "group"},
                "photo": [
                    {"file_id": "small", "file_unique_id": "s", "width": 90, "height": 90},
                    {"file_id": "large", "file_unique_id": "l", "width": 1280, "height": 1280, "file_size": 1234}
                ]
            }
        }))
        .unwrap();

        match ev {
            InboundEvent::Photo { chat_id, sizes } => {
                assert_eq!(chat_id, -100);
                let ids: Vec<&str> = sizes.iter().map(|s| s.file_id.as_str()).collect();
                assert_eq!(ids, ["small", "large"]);
                assert_eq!(sizes[1].file_size, Some(1234));
            }
            other => panic!("expected photo, got {:?}", other),
        }
    }

    #[test]
    fn test_photo_without_file_id_still_parses() {
        let ev = event(json!({
            "message": {"chat": {"id": 2}, "photo": [{"width": 90, "height": 90}]}
        }))
        .unwrap();

        match ev {
            InboundEvent::Photo { sizes, .. } => assert_eq!(sizes[0].file_id, ""),
            other => panic!("expected photo, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_text() {
        let ev = event(json!({"message": {"chat": {"id": 1}, "text": "buy milk"}})).unwrap();
        assert_eq!(
            ev,
            InboundEvent::Text {
                chat_id: 1,
                text: "buy milk".to_string()
            }
        );
    }

    #[test]
    fn test_sticker_is_other() {
        let ev = event(json!({"message": {"chat": {"id": 3}, "sticker": {"file_id": "x"}}})).unwrap();
        assert_eq!(ev, InboundEvent::Other { chat_id: 3 });
        assert_eq!(ev.chat_id(), 3);
    }

    #[test]
    fn test_missing_chat_id() {
        assert_eq!(event(json!({"message": {"text": "hi"}})), Err(MissingChatId));
        assert_eq!(event(json!({"edited_message": {"chat": {"id": 1}}})), Err(MissingChatId));
        assert_eq!(event(json!({})), Err(MissingChatId));
    }
}
