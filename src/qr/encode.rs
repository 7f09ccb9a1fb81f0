use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;

/// Rendering options passed to the remote QR image service.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct QrStyle {
    /// Edge length in pixels; images are always square.
    pub size: u32,
    pub margin: u32,
    /// Foreground colour as hex, with or without a leading `#`.
    pub color: String,
    pub bgcolor: String,
    pub format: String,
    pub quiet_zone: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size: 400,
            margin: 10,
            color: "262626".to_string(),
            bgcolor: "D9D9D9".to_string(),
            format: "png".to_string(),
            quiet_zone: 2,
        }
    }
}

/// Build the GET URL that renders `text` as a QR image.
///
/// Nothing is fetched here: the chat platform downloads the image itself when
/// the link is sent as a photo.
pub fn encode_link(base_url: &str, text: &str, style: &QrStyle) -> Result<String> {
    let link = format!(
        "{base}?size={size}x{size}&data={data}&color={color}&bgcolor={bgcolor}&margin={margin}&format={format}&qzone={qzone}",
        base = base_url,
        size = style.size,
        data = urlencoding::encode(text),
        color = hex_colour(&style.color),
        bgcolor = hex_colour(&style.bgcolor),
        margin = style.margin,
        format = urlencoding::encode(&style.format),
        qzone = style.quiet_zone,
    );

    Url::parse(&link).with_context(|| format!("Invalid QR encoder URL: {}", base_url))?;
    Ok(link)
}

fn hex_colour(colour: &str) -> &str {
    colour.trim_start_matches('#')
}
