use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::image::Image;

/// JSON layout a decoding provider answers with.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `[{"symbol": [{"data": "..."}]}]`
    #[default]
    Symbols,
    /// `{"text": "..."}`
    Text,
}

impl ResponseShape {
    /// Pull the decoded payload out of a provider response. Anything that
    /// does not match the expected layout counts as "nothing found".
    pub fn extract(self, body: &Value) -> Option<String> {
        let data = match self {
            ResponseShape::Symbols => body.get(0)?.get("symbol")?.get(0)?.get("data")?,
            ResponseShape::Text => body.get("text")?,
        };
        data.as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider answered HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("no QR data in response")]
    NoData,
}

/// Every provider failed; `attempts` keeps each provider's reason in order.
#[derive(Debug, thiserror::Error)]
#[error("QR code could not be read ({})", format_attempts(.attempts))]
pub struct DecodeFailure {
    pub attempts: Vec<(String, String)>,
}

fn format_attempts(attempts: &[(String, String)]) -> String {
    if attempts.is_empty() {
        return "no providers configured".to_string();
    }
    attempts
        .iter()
        .map(|(name, reason)| format!("{}: {}", name, reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// One remote QR reading service.
#[async_trait]
pub trait QrReader: Send + Sync {
    fn name(&self) -> &str;

    async fn read(&self, image: &Image) -> Result<String, ReaderError>;
}

/// Reader that uploads the image as multipart field `file` to an HTTP endpoint.
pub struct HttpQrReader {
    client: reqwest::Client,
    name: String,
    url: String,
    shape: ResponseShape,
}

impl HttpQrReader {
    pub fn new(client: reqwest::Client, provider: &ProviderConfig) -> Self {
        Self {
            client,
            name: provider.name.clone(),
            url: provider.url.clone(),
            shape: provider.shape,
        }
    }

    fn form(image: &Image) -> Form {
        let part = Part::bytes(image.bytes.clone()).file_name("qr.png");
        let part = match image.content_type.as_deref() {
            Some(mime) => match part.mime_str(mime) {
                Ok(part) => part,
                Err(_) => Part::bytes(image.bytes.clone()).file_name("qr.png"),
            },
            None => part,
        };
        Form::new().part("file", part)
    }
}

#[async_trait]
impl QrReader for HttpQrReader {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self, image: &Image) -> Result<String, ReaderError> {
        debug!("Uploading {} bytes to {} ({})", image.bytes.len(), self.name, self.url);

        let response = self
            .client
            .post(&self.url)
            .multipart(Self::form(image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReaderError::Status(status));
        }

        let body = response.text().await?;
        debug!("{} scan response: {}", self.name, body);

        // Non-JSON bodies are treated like an empty result.
        let json: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        self.shape.extract(&json).ok_or(ReaderError::NoData)
    }
}

/// Tries each reader in order and returns the first non-empty result.
pub struct QrDecoder {
    readers: Vec<Box<dyn QrReader>>,
}

impl QrDecoder {
    pub fn new(readers: Vec<Box<dyn QrReader>>) -> Self {
        Self { readers }
    }

    pub fn from_config(client: &reqwest::Client, providers: &[ProviderConfig]) -> Self {
        let readers = providers
            .iter()
            .map(|p| Box::new(HttpQrReader::new(client.clone(), p)) as Box<dyn QrReader>)
            .collect();
        Self::new(readers)
    }

    pub async fn decode(&self, image: &Image) -> Result<String, DecodeFailure> {
        let mut attempts = Vec::with_capacity(self.readers.len());

        for reader in &self.readers {
            match reader.read(image).await {
                Ok(data) => {
                    info!("QR code read by {}", reader.name());
                    return Ok(data);
                }
                Err(e) => {
                    warn!("Failed to read QR code with {}: {}", reader.name(), e);
                    attempts.push((reader.name().to_string(), e.to_string()));
                }
            }
        }

        Err(DecodeFailure { attempts })
    }
}
