//! HTTP server for the validation API.
//!
//! Persisting annotated records is the consumer's job; this surface only
//! runs the batch pass and streams its narration.
//!
//! # API Endpoints
//!
//! | Method | Path            | Description                          |
//! |--------|-----------------|--------------------------------------|
//! | GET    | `/health`       | Health check                         |
//! | POST   | `/api/validate` | Validate a JSON batch of records     |
//! | GET    | `/api/logs`     | SSE stream for real-time logs        |

use axum::{
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_warning, LOG_BUS};
use super::types::{error_response, ValidateRequest, ValidateResponse};
use crate::batch::{process_batch, BatchOptions, BatchOutcome};
use crate::resolver::{FixedNamespace, HttpSpaceResolver};
use crate::rules::RuleSet;

/// Start the HTTP server.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Permissive CORS so the import UI can call from anywhere in dev
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/validate", post(validate_batch_endpoint))
        .route("/api/logs", get(sse_logs))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Rowguard server running on http://localhost:{}", port);
    println!("   POST /api/validate - Validate a batch of records");
    println!("   GET  /api/logs     - SSE log stream");
    println!("   GET  /health       - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "rowguard",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "validate": "POST /api/validate",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BUS.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Validate endpoint
async fn validate_batch_endpoint(
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, (StatusCode, Json<Value>)> {
    if request.records.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(error_response("No records provided")),
        ));
    }

    let rules = RuleSet::default();
    let options = BatchOptions::default();
    let space_id = request.space_id.as_deref().unwrap_or("-").to_string();

    let outcome = match (request.namespace, request.space_id) {
        // An explicit namespace needs no lookup
        (Some(namespace), _) => {
            let resolver = FixedNamespace::new(namespace);
            process_batch(request.records, &resolver, &space_id, &rules, &options).await
        }
        (None, Some(space_id)) => match HttpSpaceResolver::from_env() {
            Ok(resolver) => {
                process_batch(request.records, &resolver, &space_id, &rules, &options).await
            }
            // Fail-open: an unconfigured resolver must not block the import
            Err(e) => {
                log_warning(format!(
                    "Space resolver unavailable, skipping validation: {}",
                    e
                ));
                BatchOutcome::skipped(request.records)
            }
        },
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(error_response("Either namespace or spaceId is required")),
            ));
        }
    };

    Ok(Json(ValidateResponse::from(outcome)))
}
