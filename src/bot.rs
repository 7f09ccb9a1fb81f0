use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::image::{fetch_image, PhotoError};
use crate::markdown::{escape_markdown, inline_code};
use crate::messages;
use crate::platform::{ChatApi, InboundEvent, OutboundReply, PhotoSize};
use crate::qr::{encode_link, QrDecoder};
use crate::validation::is_valid_url;

/// Decides what to answer to one inbound event and delivers it.
pub struct Responder<'a> {
    chat: &'a dyn ChatApi,
    http: &'a reqwest::Client,
    decoder: &'a QrDecoder,
    config: &'a Config,
}

impl<'a> Responder<'a> {
    pub fn new(
        chat: &'a dyn ChatApi,
        http: &'a reqwest::Client,
        decoder: &'a QrDecoder,
        config: &'a Config,
    ) -> Self {
        Self {
            chat,
            http,
            decoder,
            config,
        }
    }

    /// Classify `event` and build the replies, then send them in order.
    pub async fn handle(&self, event: &InboundEvent) -> Result<()> {
        let replies = self.replies_for(event).await;
        info!("Prepared {} response(s)", replies.len());
        if replies.is_empty() {
            return Ok(());
        }
        self.deliver(event.chat_id(), &replies).await
    }

    /// Build the ordered reply list. Never fails: problems while composing a
    /// reply become an apology reply instead.
    pub async fn replies_for(&self, event: &InboundEvent) -> Vec<OutboundReply> {
        match event {
            InboundEvent::Command { command, .. } => {
                info!("Processing {} command", command);
                vec![text_reply(&messages::welcome())]
            }
            InboundEvent::Photo { sizes, .. } => {
                info!("Processing photo message ({} size variants)", sizes.len());
                self.photo_replies(sizes).await
            }
            InboundEvent::Text { text, .. } => {
                info!("Processing text message ({} chars)", text.chars().count());
                self.text_replies(text)
            }
            InboundEvent::Other { chat_id } => {
                info!("Ignoring unsupported message in chat {}", chat_id);
                Vec::new()
            }
        }
    }

    /// Send replies one at a time; the first rejection aborts the rest.
    pub async fn deliver(&self, chat_id: i64, replies: &[OutboundReply]) -> Result<()> {
        for (i, reply) in replies.iter().enumerate() {
            self.chat
                .send_reply(chat_id, reply)
                .await
                .with_context(|| {
                    format!("Failed to deliver reply {} of {}", i + 1, replies.len())
                })?;
        }
        Ok(())
    }

    async fn photo_replies(&self, sizes: &[PhotoSize]) -> Vec<OutboundReply> {
        match self.decode_photo(sizes).await {
            Ok(content) => vec![
                text_reply(&messages::qr_found()),
                OutboundReply::Text {
                    content: inline_code(&content),
                },
            ],
            Err(e) => {
                error!("Error processing photo: {}", e);
                let max_mb = self.config.limits.max_image_bytes / (1024 * 1024);
                vec![text_reply(&messages::photo_failed(max_mb, &e.to_string()))]
            }
        }
    }

    async fn decode_photo(&self, sizes: &[PhotoSize]) -> Result<String, PhotoError> {
        let largest = sizes.last().ok_or(PhotoError::NoSizes)?;
        info!(
            "Using photo variant {} ({}x{}, {} bytes)",
            largest.file_id,
            largest.width.unwrap_or_default(),
            largest.height.unwrap_or_default(),
            largest.file_size.unwrap_or_default()
        );

        if largest.file_id.is_empty() {
            return Err(PhotoError::MissingFileId);
        }
        let url = self.chat.file_url(&largest.file_id).await?;
        let image = fetch_image(self.http, &url, &self.config.limits).await?;
        let content = self.decoder.decode(&image).await?;
        Ok(content)
    }

    fn text_replies(&self, text: &str) -> Vec<OutboundReply> {
        let max_chars = self.config.limits.max_text_chars;

        if text.trim().is_empty() {
            return vec![text_reply(&messages::empty_text())];
        }
        if text.chars().count() > max_chars {
            return vec![text_reply(&messages::text_too_long(max_chars))];
        }
        if text.starts_with("http") && !is_valid_url(text) {
            return vec![text_reply(&messages::invalid_url())];
        }

        match encode_link(&self.config.qr.encode_url, text, &self.config.qr.style) {
            Ok(url) => vec![OutboundReply::Photo {
                url,
                caption: escape_markdown(&messages::qr_ready()),
            }],
            Err(e) => {
                warn!("Error generating QR code link: {:#}", e);
                vec![text_reply(&messages::encode_failed())]
            }
        }
    }
}

fn text_reply(raw: &str) -> OutboundReply {
    OutboundReply::Text {
        content: escape_markdown(raw),
    }
}
