use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use covenant_core::{EventSink, Hash32, RegistryError, RegistryEvent, SignatureRecord};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Header carrying the pre-authenticated caller identity. Transport
/// authentication happens upstream of this server.
pub const IDENTITY_HEADER: &str = "x-covenant-identity";

/// Bridges registry events into the log stream.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &RegistryEvent) {
        match event {
            RegistryEvent::SignatureSubmitted { submitter, document_hash } => {
                info!("signature submitted submitter={submitter} document_hash={document_hash}");
            }
            RegistryEvent::CovenantFinalized { total_signatures, final_hash } => {
                info!("covenant finalized total_signatures={total_signatures} final_hash={final_hash}");
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub external_fingerprint: String,
    pub document_hash: Hash32,
}

#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    pub combined_hash: Hash32,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    total_signatures: usize,
    required_count: usize,
    percent_signed: f64,
    finalized: bool,
    final_hash: Option<Hash32>,
    deadline: i64,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signatures", post(submit_signature).get(list_signatures))
        .route("/finalize", post(finalize))
        .route("/count", get(count))
        .route("/signed/:identity", get(has_signed))
        .route("/status", get(status))
        .route("/health", get(health))
        .with_state(state)
}

/// One distinct HTTP status per error kind so callers can tell the
/// rejections apart without parsing the body.
fn error_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::DeadlinePassed { .. } => StatusCode::FORBIDDEN,
        RegistryError::DuplicateSubmission(_) => StatusCode::CONFLICT,
        RegistryError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        RegistryError::AlreadyFinalized => StatusCode::GONE,
        RegistryError::QuorumNotMet { .. } => StatusCode::PRECONDITION_FAILED,
    }
}

fn reject(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

fn caller_identity(headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, format!("missing {IDENTITY_HEADER} header")))
}

async fn submit_signature(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SubmitRequest>,
) -> Response {
    let caller = match caller_identity(&headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let now = Utc::now().timestamp();
    let mut registry = state.registry.write().unwrap();
    match registry.submit_signature(&caller, &req.external_fingerprint, req.document_hash, now) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "submitter": caller, "count": registry.count() })),
        )
            .into_response(),
        Err(err) => {
            debug!("submission rejected submitter={caller} error={err}");
            reject(error_status(&err), err.to_string())
        }
    }
}

async fn finalize(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<FinalizeRequest>,
) -> Response {
    let caller = match caller_identity(&headers) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let mut registry = state.registry.write().unwrap();
    match registry.finalize(&caller, req.combined_hash) {
        Ok(()) => Json(serde_json::json!({
            "finalized": true,
            "final_hash": registry.final_hash(),
            "total_signatures": registry.count(),
        }))
        .into_response(),
        Err(err) => {
            debug!("finalize rejected caller={caller} error={err}");
            reject(error_status(&err), err.to_string())
        }
    }
}

async fn count(State(state): State<Arc<AppState>>) -> Response {
    let registry = state.registry.read().unwrap();
    Json(serde_json::json!({ "count": registry.count() })).into_response()
}

async fn has_signed(State(state): State<Arc<AppState>>, Path(identity): Path<String>) -> Response {
    let registry = state.registry.read().unwrap();
    Json(serde_json::json!({ "identity": identity, "signed": registry.has_signed(&identity) })).into_response()
}

/// Audit export: every accepted record, in submission order.
async fn list_signatures(State(state): State<Arc<AppState>>) -> Response {
    let registry = state.registry.read().unwrap();
    let records: Vec<SignatureRecord> = registry.records().cloned().collect();
    Json(records).into_response()
}

/// Public status report. Reads only aggregate counts and configuration.
async fn status(State(state): State<Arc<AppState>>) -> Response {
    let registry = state.registry.read().unwrap();
    Json(StatusReport {
        total_signatures: registry.count(),
        required_count: registry.required_count(),
        percent_signed: percent_signed(registry.count(), registry.required_count()),
        finalized: registry.is_finalized(),
        final_hash: registry.final_hash().copied(),
        deadline: registry.deadline(),
    })
    .into_response()
}

async fn health() -> Response {
    Json(serde_json::json!({ "status": "healthy" })).into_response()
}

fn percent_signed(count: usize, required: usize) -> f64 {
    if required == 0 {
        return 100.0;
    }
    ((count as f64 / required as f64) * 100.0).min(100.0)
}
