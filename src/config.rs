use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::qr::decode::ResponseShape;
use crate::qr::QrStyle;

/// Environment variable that overrides `[telegram] bot_token`.
pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Absent tokens are tolerated at startup and reported per request.
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QrConfig {
    #[serde(default = "default_encode_url")]
    pub encode_url: String,
    #[serde(flatten)]
    pub style: QrStyle,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DecoderConfig {
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub shape: ResponseShape,
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_encode_url() -> String {
    "https://api.qrserver.com/v1/create-qr-code/".to_string()
}

fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_max_text_chars() -> usize {
    850
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "qrserver".to_string(),
            url: "https://api.qrserver.com/v1/read-qr-code/".to_string(),
            shape: ResponseShape::Symbols,
        },
        ProviderConfig {
            name: "goqr".to_string(),
            url: "https://api.goqr.me/v1/read-qr-code".to_string(),
            shape: ResponseShape::Symbols,
        },
        ProviderConfig {
            name: "zxing".to_string(),
            url: "https://zxing.org/w/decode".to_string(),
            shape: ResponseShape::Text,
        },
    ]
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_url: default_api_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            encode_url: default_encode_url(),
            style: QrStyle::default(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            max_text_chars: default_max_text_chars(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
        }
    }
}

impl Config {
    /// Bot token, if one was configured. Empty strings count as missing.
    pub fn bot_token(&self) -> Option<&str> {
        self.telegram
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Load the TOML file at `path` (all defaults if it does not exist), then
    /// apply the `TELEGRAM_TOKEN` override.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::parse(&content)?
        } else {
            info!(
                "Config file {} not found, using defaults",
                path.display()
            );
            Config::default()
        };

        config.apply_token_override(std::env::var(TOKEN_ENV).ok());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        if config.decoder.providers.is_empty() {
            anyhow::bail!("[decoder] must list at least one provider");
        }
        Ok(config)
    }

    fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.telegram.bot_token = Some(token);
        }
    }
}
