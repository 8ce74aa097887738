use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::relay::Relay;
use crate::request::{InboundRequest, Method};
use axum::{
    body::{Body, Bytes},
    extract::{RawQuery, State},
    http::{header, HeaderMap, Method as HttpMethod, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const PANIC_BODY: &str = "Sorry, there was an error processing your request.";

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    relay: Arc<Relay>,
}

impl AppState {
    pub fn new(config: RelayConfig, relay: Relay) -> Self {
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
        }
    }
}

/// Routes: the ask endpoint under both its API path and the path the
/// Netlify deployment used, plus a health check.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ask", get(handle_ask).post(handle_ask))
        .route("/.netlify/functions/ask", get(handle_ask).post(handle_ask))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(state: AppState) -> RelayResult<()> {
    let addr = state.config.http_addr;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| RelayError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Starting HTTP server on {}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| RelayError::Server(format!("HTTP server failed: {}", e)))
}

/// Health check handler
async fn health() -> impl IntoResponse {
    "Relay is running"
}

async fn handle_ask(
    State(state): State<AppState>,
    method: HttpMethod,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    body: Bytes,
) -> Response {
    let request = to_inbound(&method, &headers, raw_query.as_deref(), &body);
    let api_key = state.config.api_key();
    let shaped = state.relay.respond(&request, api_key.as_deref()).await;

    let status =
        StatusCode::from_u16(shaped.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    plain_text(status, shaped.body)
}

fn to_inbound(
    method: &HttpMethod,
    headers: &HeaderMap,
    raw_query: Option<&str>,
    body: &Bytes,
) -> InboundRequest {
    let method = if method == HttpMethod::POST {
        Method::Post
    } else {
        Method::Get
    };

    let mut request = InboundRequest::new(method);
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request.insert_header(name.as_str(), value);
        }
    }

    if !body.is_empty() {
        request.body = Some(String::from_utf8_lossy(body).into_owned());
    }

    request.query_params = parse_query(raw_query.unwrap_or_default());
    request
}

/// Form-decodes a query string; the first occurrence of a key wins.
fn parse_query(raw: &str) -> HashMap<String, String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw).unwrap_or_default();
    let mut params = HashMap::new();
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    params
}

fn plain_text(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "Request handler panicked");
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, PANIC_BODY.to_string())
}
