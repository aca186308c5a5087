//! Route handlers.
//!
//! Handlers only decode bodies and translate results; validation and
//! mapping live in [`crate::sponsor`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics::{self, Outcome};
use crate::sponsor::{
    AddLinkRequest, ExecutionRequest, ExecutionResult, LedgerStatus, ProfileCreationRequest,
    ProfileUpdateRequest, RemoveLinkRequest, SponsorError, SponsorResult, TransactionBuildResult,
    UpdateLinkRequest,
};

type JsonBody<T> = Result<Json<T>, JsonRejection>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sponsor: LedgerStatus,
    pub timestamp: String,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "wallink-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "network": state.mapper.settings().network,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let sponsor = state.mapper.ledger_status().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        sponsor,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// POST /create-profile
pub async fn create_profile(
    State(state): State<AppState>,
    body: JsonBody<ProfileCreationRequest>,
) -> Result<Json<TransactionBuildResult>, ApiError> {
    let Json(request) = decode("create_profile", body)?;
    let result = state.mapper.build_create_profile(&request).await;
    respond("create_profile", result)
}

/// POST /add-link
pub async fn add_link(
    State(state): State<AppState>,
    body: JsonBody<AddLinkRequest>,
) -> Result<Json<TransactionBuildResult>, ApiError> {
    let Json(request) = decode("add_link", body)?;
    let result = state.mapper.build_add_social_link(&request).await;
    respond("add_link", result)
}

/// POST /update-link
pub async fn update_link(
    State(state): State<AppState>,
    body: JsonBody<UpdateLinkRequest>,
) -> Result<Json<TransactionBuildResult>, ApiError> {
    let Json(request) = decode("update_link", body)?;
    let result = state.mapper.build_update_social_link(&request).await;
    respond("update_link", result)
}

/// POST /remove-link
pub async fn remove_link(
    State(state): State<AppState>,
    body: JsonBody<RemoveLinkRequest>,
) -> Result<Json<TransactionBuildResult>, ApiError> {
    let Json(request) = decode("remove_link", body)?;
    let result = state.mapper.build_remove_social_link(&request).await;
    respond("remove_link", result)
}

/// POST /update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    body: JsonBody<ProfileUpdateRequest>,
) -> Result<Json<TransactionBuildResult>, ApiError> {
    let Json(request) = decode("update_profile", body)?;
    let result = state.mapper.build_update_profile(&request).await;
    respond("update_profile", result)
}

/// POST /execute
pub async fn execute(
    State(state): State<AppState>,
    body: JsonBody<ExecutionRequest>,
) -> Result<Json<ExecutionResult>, ApiError> {
    let Json(request) = decode("execute", body)?;
    let result = state.mapper.execute_signed_transaction(&request).await;
    respond("execute", result)
}

fn decode<T>(intent: &'static str, body: JsonBody<T>) -> Result<Json<T>, ApiError> {
    body.map_err(|rejection| {
        tracing::debug!(intent, error = %rejection, "Unreadable request body");
        metrics::record_intent(intent, Outcome::Invalid);
        ApiError::from(rejection)
    })
}

fn respond<T>(intent: &'static str, result: SponsorResult<T>) -> Result<Json<T>, ApiError> {
    match result {
        Ok(value) => {
            metrics::record_intent(intent, Outcome::Ok);
            Ok(Json(value))
        }
        Err(err) => {
            let outcome = match err {
                SponsorError::Validation(_) => Outcome::Invalid,
                SponsorError::Ledger(_) => Outcome::Failed,
            };
            tracing::info!(intent, outcome = outcome.as_str(), error = %err, "Intent rejected");
            metrics::record_intent(intent, outcome);
            Err(err.into())
        }
    }
}
