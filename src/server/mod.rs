//! HTTP front end
//!
//! `POST /` takes a JSON sonification request and answers with the rendered
//! MIDI file as a `data:` URI in a plain-text body.

use crate::config::SonificationRequest;
use crate::error::SonifyError;
use crate::midi::MidiWriter;
use crate::sonify::sonify_request;
use axum::{
    extract::ConnectInfo,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Failure of a single request
#[derive(Debug)]
pub enum ApiError {
    /// The request was understood but cannot be sonified
    Rejected(SonifyError),
    /// Encoding the result failed
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            ApiError::Internal(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err)).into_response()
            }
        }
    }
}

/// Build the application router
pub fn build_router() -> Router {
    Router::new()
        .route("/", post(sonify))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the router on `0.0.0.0:port` until the process exits
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {}: {}", addr, e))?;

    info!("Now listening on {}", addr);
    axum::serve(
        listener,
        build_router().into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Forwarded client address if a proxy set one, else the peer address
fn client_address(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| peer.to_string())
}

async fn sonify(
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<SonificationRequest>,
) -> Result<Response, ApiError> {
    let client = client_address(&headers, peer);
    info!(
        "Received a request from {} ({} parameter(s))",
        client,
        request.parameter_map.len()
    );

    let events = sonify_request(&request).map_err(|err| {
        warn!("Rejected request from {}: {}", client, err);
        ApiError::Rejected(err)
    })?;

    let uri = MidiWriter::new()
        .encode_data_uri(&events)
        .map_err(ApiError::Internal)?;

    Ok(([(header::CONTENT_TYPE, "text/plain")], uri).into_response())
}
