//! HTTP Route Handlers
//!
//! Thin adapters from JSON bodies to `WaitlistService` calls.

use crate::error::ApiError;
use crate::types::{
    CleanupResponse, HealthResponse, RemoveRequest, RemoveResponse, SubmitRequest,
    UpdateStatusRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use waitlist_core::application::WaitlistService;
use waitlist_core::domain::{Activity, Entry, EntryStatus, QueuePosition};

pub type AppState = Arc<WaitlistService>;

type ApiResult<T> = Result<T, ApiError>;

fn required(field: Option<String>, message: &str) -> ApiResult<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// POST /api/user
pub async fn submit(
    State(service): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Entry>)> {
    let Json(req) = payload?;
    let entry = service.submit(req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/user
pub async fn remove(
    State(service): State<AppState>,
    payload: Result<Json<RemoveRequest>, JsonRejection>,
) -> ApiResult<Json<RemoveResponse>> {
    let Json(req) = payload?;
    let id = required(req.id, "User ID is required")?;

    service.remove(&id).await?;

    Ok(Json(RemoveResponse {
        message: "User removed from the waitlist".to_string(),
        id,
    }))
}

/// PUT /api/user
pub async fn update_status(
    State(service): State<AppState>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Entry>> {
    let Json(req) = payload?;
    let id = required(req.id, "User ID is required")?;
    let status = required(req.status, "Status is required")?;
    let status = EntryStatus::from_str(&status).map_err(waitlist_core::AppError::from)?;

    let entry = service.set_status(&id, status).await?;
    Ok(Json(entry))
}

/// GET /api/users
pub async fn list(State(service): State<AppState>) -> ApiResult<Json<Vec<Entry>>> {
    let entries = service.list().await?;
    debug!(count = entries.len(), "Serving waitlist");
    Ok(Json(entries))
}

/// GET /api/cleanup
pub async fn cleanup(State(service): State<AppState>) -> ApiResult<Json<CleanupResponse>> {
    let removed = service
        .cleanup()
        .await
        .map_err(|e| ApiError::from(e).with_message("Error cleaning up users"))?;
    Ok(Json(CleanupResponse::new(removed)))
}

/// GET /api/queue
pub async fn queue(State(service): State<AppState>) -> ApiResult<Json<Vec<QueuePosition>>> {
    Ok(Json(service.board().await?))
}

/// GET /api/activities
pub async fn activities(State(service): State<AppState>) -> Json<Vec<Activity>> {
    Json(service.catalog().as_slice().to_vec())
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: waitlist_core::VERSION.to_string(),
    })
}
