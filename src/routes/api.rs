// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the session, plan, quota and captions.

use crate::error::Result;
use crate::models::{HistoryItem, Plan, QuotaStatus};
use crate::services::SessionSnapshot;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/plan", put(change_plan))
        .route("/api/quota", get(get_quota))
        .route("/api/captions", post(create_caption))
        .route("/api/history", get(get_history))
}

// ─── Session & Plan ──────────────────────────────────────────

async fn get_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.controller.snapshot()?))
}

#[derive(Deserialize)]
pub struct PlanChangeRequest {
    plan: Plan,
}

/// Upgrading without a logged-in user answers `login_required`.
async fn change_plan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PlanChangeRequest>,
) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.controller.request_plan_change(body.plan)?))
}

async fn get_quota(State(state): State<Arc<AppState>>) -> Result<Json<QuotaStatus>> {
    Ok(Json(state.controller.quota_status()?))
}

// ─── Captions ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequestBody {
    /// Data URI or raw base64
    image: String,
    #[serde(default)]
    mime_type: String,
}

async fn create_caption(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CaptionRequestBody>,
) -> Result<Json<HistoryItem>> {
    let item = state
        .controller
        .generate_caption(&body.image, &body.mime_type)
        .await?;
    Ok(Json(item))
}

async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryItem>> {
    Json(state.controller.history())
}
