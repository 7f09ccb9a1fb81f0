use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::{debug, info};

use crate::config::LimitsConfig;
use crate::platform::FileResolutionError;
use crate::qr::DecodeFailure;

const ALLOWED_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];
const ALLOWED_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".webp"];

/// A downloaded photo, ready to be handed to the QR decoder.
#[derive(Debug, Clone)]
pub struct Image {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Everything that can go wrong between a photo message and a decoded payload.
#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo message carries no size variants")]
    NoSizes,
    #[error("photo has no file id")]
    MissingFileId,
    #[error(transparent)]
    FileResolution(#[from] FileResolutionError),
    #[error("failed to download image: {0}")]
    Download(reqwest::Error),
    #[error("image is larger than {limit} bytes ({size} bytes)")]
    TooLarge { size: u64, limit: u64 },
    #[error("image must be PNG, JPEG or WebP, got {content_type}")]
    UnsupportedFormat { content_type: String },
    #[error(transparent)]
    Decode(#[from] DecodeFailure),
}

/// The download URL embeds the bot token, so it never travels with the error.
impl From<reqwest::Error> for PhotoError {
    fn from(e: reqwest::Error) -> Self {
        PhotoError::Download(e.without_url())
    }
}

/// Download `url`, checking the declared size and format before the body is read.
pub async fn fetch_image(
    client: &reqwest::Client,
    url: &str,
    limits: &LimitsConfig,
) -> Result<Image, PhotoError> {
    let response = client.get(url).send().await?.error_for_status()?;

    let headers = response.headers();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let declared_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);

    debug!(
        "Image headers: content_type={:?}, content_length={}",
        content_type, declared_length
    );

    check_size(declared_length, limits.max_image_bytes)?;
    check_format(content_type.as_deref(), url)?;

    let bytes = response.bytes().await?.to_vec();
    info!("Downloaded image: {} bytes", bytes.len());

    Ok(Image {
        bytes,
        content_type: content_type.map(|ct| mime_essence(&ct)),
    })
}

/// Zero means the length was not declared, which is allowed.
fn check_size(declared: u64, limit: u64) -> Result<(), PhotoError> {
    if declared != 0 && declared > limit {
        return Err(PhotoError::TooLarge {
            size: declared,
            limit,
        });
    }
    Ok(())
}

fn check_format(content_type: Option<&str>, url: &str) -> Result<(), PhotoError> {
    let declared = content_type.map(mime_essence);
    if let Some(ref mime) = declared {
        if ALLOWED_TYPES.contains(&mime.as_str()) {
            return Ok(());
        }
    }

    if has_allowed_extension(url) {
        return Ok(());
    }

    Err(PhotoError::UnsupportedFormat {
        content_type: declared.unwrap_or_else(|| "unknown".to_string()),
    })
}

fn has_allowed_extension(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// `image/JPEG; charset=x` → `image/jpeg`
fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn limits() -> LimitsConfig {
        LimitsConfig::default()
    }

    #[test]
    fn test_size_limits() {
        let limit = 10 * 1024 * 1024;
        assert!(check_size(0, limit).is_ok());
        assert!(check_size(limit, limit).is_ok());
        assert!(matches!(
            check_size(11_000_000, limit),
            Err(PhotoError::TooLarge { size: 11_000_000, .. })
        ));
    }

    #[test]
    fn test_allowed_content_types() {
        assert!(check_format(Some("image/png"), "https://x/file").is_ok());
        assert!(check_format(Some("image/jpeg"), "https://x/file").is_ok());
        assert!(check_format(Some("image/webp"), "https://x/file").is_ok());
        assert!(check_format(Some("Image/JPEG; charset=binary"), "https://x/file").is_ok());
    }

    #[test]
    fn test_extension_fallback() {
        assert!(check_format(Some("application/octet-stream"), "https://x/photos/file_1.jpg").is_ok());
        assert!(check_format(None, "https://x/photos/file_1.WEBP").is_ok());
        assert!(check_format(None, "https://x/a.jpeg?download=1").is_ok());
    }

    #[test]
    fn test_gif_without_extension_rejected() {
        let err = check_format(Some("image/gif"), "https://x/photos/file_1").unwrap_err();
        assert_eq!(err.to_string(), "image must be PNG, JPEG or WebP, got image/gif");
    }

    #[test]
    fn test_missing_type_reported_as_unknown() {
        let err = check_format(None, "https://x/photos/file_1.gif").unwrap_err();
        assert!(matches!(
            err,
            PhotoError::UnsupportedFormat { ref content_type } if content_type == "unknown"
        ));
    }

    #[tokio::test]
    async fn test_fetch_accepts_jpeg() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file/bottoken/photos/file_1.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"JPEGDATA".as_ref())
                    .insert_header("content-type", "image/jpeg"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/file/bottoken/photos/file_1.jpg", server.uri());
        let image = fetch_image(&reqwest::Client::new(), &url, &limits())
            .await
            .unwrap();
        assert_eq!(image.bytes, b"JPEGDATA");
        assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_gif() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"GIF89a".as_ref())
                    .insert_header("content-type", "image/gif"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/file/bottoken/animations/file_2", server.uri());
        let err = fetch_image(&reqwest::Client::new(), &url, &limits())
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_fetch_rejects_declared_oversize() {
        let server = MockServer::start().await;
        let body = vec![0u8; 2048];
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(body)
                    .insert_header("content-type", "image/png"),
            )
            .mount(&server)
            .await;

        let small = LimitsConfig {
            max_image_bytes: 1024,
            ..LimitsConfig::default()
        };
        let url = format!("{}/big.png", server.uri());
        let err = fetch_image(&reqwest::Client::new(), &url, &small)
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoError::TooLarge { size: 2048, limit: 1024 }));
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/file/bot999:secret/missing.png", server.uri());
        let err = fetch_image(&reqwest::Client::new(), &url, &limits())
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoError::Download(_)));

        let message = err.to_string();
        assert!(message.contains("404"), "{message}");
        assert!(!message.contains("secret"), "{message}");
        assert!(!message.contains(&server.uri()), "{message}");
    }

    #[tokio::test]
    async fn test_fetch_transport_error_hides_url() {
        let url = "http://127.0.0.1:1/file/bot999:secret/photos/file_1.jpg";
        let err = fetch_image(&reqwest::Client::new(), url, &limits())
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoError::Download(_)));
        assert!(!err.to_string().contains("secret"), "{err}");
    }
}
