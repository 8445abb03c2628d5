use std::collections::BTreeMap;
use std::sync::Arc;
use axum::{routing::{get, post}, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::error::SpellfallError;
use crate::interface::QueryInterface;

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub id: u64,
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn status_of(e: &SpellfallError) -> StatusCode {
    if e.is_user_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR }
}

pub fn router(interface: Arc<QueryInterface>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    let for_search = Arc::clone(&interface);
    let for_fields = Arc::clone(&interface);
    let for_reload = interface;
    Router::new()
        .route("/v1/search", post(move |Json(req): Json<SearchRequest>| {
        let iface = Arc::clone(&for_search);
        async move {
            // searching is synchronous, so it runs on a blocking thread
            let started = std::time::Instant::now();
            let query = req.query;
            let outcome = tokio::task::spawn_blocking(move || iface.search(&query))
                .await
                .map_err(|e| {
                    warn!(error=%e, "Join error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Join error")
                })?;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            match outcome {
                Ok(outcome) => {
                    let names: Vec<String> = outcome.names.into_iter().collect();
                    let body = SearchResponse { id: outcome.id.value(), status: "ok".into(), elapsed_ms, count: Some(names.len()), names: Some(names), urls: Some(outcome.urls), error: None };
                    Ok::<_, (StatusCode, &'static str)>((StatusCode::OK, Json(body)))
                }
                Err(failure) => {
                    let status = status_of(&failure.error);
                    let msg = format!("{}", failure.error);
                    warn!(%msg, code=%status.as_u16(), "query error");
                    let body = SearchResponse { id: failure.id.value(), status: "error".into(), elapsed_ms, count: None, names: None, urls: None, error: Some(msg) };
                    Ok::<_, (StatusCode, &'static str)>((status, Json(body)))
                }
            }
        }
    }))
        .route("/v1/fields", get(move || {
        let iface = Arc::clone(&for_fields);
        async move {
            match iface.snapshot() {
                Ok(snapshot) => Ok(Json(snapshot.registry().summaries())),
                Err(e) => {
                    warn!(error=%e, "fields unavailable");
                    Err((StatusCode::INTERNAL_SERVER_ERROR, "snapshot unavailable"))
                }
            }
        }
    }))
        .route("/v1/reload", post(move || {
        let iface = Arc::clone(&for_reload);
        async move {
            let reloaded = tokio::task::spawn_blocking(move || iface.reload())
                .await
                .map_err(|e| {
                    warn!(error=%e, "Join error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Join error")
                })?;
            match reloaded {
                Ok(records) => {
                    info!(records, "corpus reloaded");
                    let body = ReloadResponse { status: "ok".into(), records: Some(records), error: None };
                    Ok::<_, (StatusCode, &'static str)>((StatusCode::OK, Json(body)))
                }
                Err(e) => {
                    let msg = format!("{e}");
                    warn!(%msg, "reload failed, keeping the current snapshot");
                    let body = ReloadResponse { status: "error".into(), records: None, error: Some(msg) };
                    Ok::<_, (StatusCode, &'static str)>((StatusCode::INTERNAL_SERVER_ERROR, Json(body)))
                }
            }
        }
    }))
    .layer(cors)
}

