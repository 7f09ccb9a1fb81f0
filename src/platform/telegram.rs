use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use teloxide::payloads::{SendMessageSetters, SendPhotoSetters};
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, ParseMode};
use tracing::{debug, info};

use crate::platform::{ChatApi, FileResolutionError, OutboundReply};

/// Bot API client bound to one token.
pub struct TelegramApi {
    bot: Bot,
    token: String,
    api_url: Url,
}

impl TelegramApi {
    pub fn new(client: reqwest::Client, token: &str, api_url: &str) -> Result<Self> {
        let api_url =
            Url::parse(api_url).with_context(|| format!("Invalid Telegram API URL: {}", api_url))?;
        let bot = Bot::with_client(token, client).set_api_url(api_url.clone());
        Ok(Self {
            bot,
            token: token.to_string(),
            api_url,
        })
    }

    /// Download location for a `file_path` returned by `getFile`.
    pub fn download_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            self.token,
            file_path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn file_url(&self, file_id: &str) -> Result<String, FileResolutionError> {
        debug!("Getting file URL for file_id: {}", file_id);

        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| FileResolutionError(e.to_string().replace(&self.token, "<token>")))?;

        Ok(self.download_url(&file.path))
    }

    async fn send_reply(&self, chat_id: i64, reply: &OutboundReply) -> Result<()> {
        match reply {
            OutboundReply::Text { content } => {
                info!("Sending text reply to chat {}", chat_id);
                self.bot
                    .send_message(ChatId(chat_id), content)
                    .parse_mode(ParseMode::MarkdownV2)
                    .await
                    .context("Telegram sendMessage failed")?;
            }
            OutboundReply::Photo { url, caption } => {
                info!("Sending photo reply to chat {}", chat_id);
                let url = Url::parse(url).with_context(|| format!("Invalid photo URL: {}", url))?;
                self.bot
                    .send_photo(ChatId(chat_id), InputFile::url(url))
                    .caption(caption)
                    .parse_mode(ParseMode::MarkdownV2)
                    .await
                    .context("Telegram sendPhoto failed")?;
            }
        }
        Ok(())
    }
}
