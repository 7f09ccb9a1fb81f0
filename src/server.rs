use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, error, info, Instrument};

use crate::bot::Responder;
use crate::config::{Config, TOKEN_ENV};
use crate::platform::telegram::TelegramApi;
use crate::platform::{InboundEvent, Update};
use crate::qr::QrDecoder;

/// Shared, read-only state for every webhook request.
pub struct AppState {
    pub config: Config,
    pub http: reqwest::Client,
    pub decoder: QrDecoder,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let decoder = QrDecoder::from_config(&http, &config.decoder.providers);
        Self {
            config,
            http,
            decoder,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    stack: String,
}

fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, GET, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    ]
}

/// The webhook answers on every path.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().fallback(webhook).with_state(state)
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("webhook", %request_id);

    async move {
        info!("Request received: {} {}", method, uri);

        if method == Method::OPTIONS {
            return (StatusCode::OK, cors_headers(), Body::empty()).into_response();
        }
        if method != Method::POST {
            return (StatusCode::METHOD_NOT_ALLOWED, cors_headers(), "Method Not Allowed")
                .into_response();
        }

        match process_update(&state, &body).await {
            Ok(()) => (StatusCode::OK, cors_headers(), "OK").into_response(),
            Err(e) => {
                error!("Error processing request: {:#}", e);
                let body = ErrorBody {
                    error: e.to_string(),
                    stack: format!("{:?}", e),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, cors_headers(), Json(body)).into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn process_update(state: &AppState, body: &[u8]) -> Result<()> {
    let update: Update =
        serde_json::from_slice(body).context("Request body is not a valid update")?;
    debug!(
        "Update {:?}: {}",
        update.update_id,
        String::from_utf8_lossy(body)
    );

    let token = state
        .config
        .bot_token()
        .ok_or_else(|| anyhow!("{} environment variable is not set", TOKEN_ENV))?;

    let event = InboundEvent::try_from(update)?;
    let chat = TelegramApi::new(state.http.clone(), token, &state.config.telegram.api_url)?;

    Responder::new(&chat, &state.http, &state.decoder, &state.config)
        .handle(&event)
        .await
}
