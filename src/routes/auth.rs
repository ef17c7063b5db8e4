// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mock sign-in routes.
//!
//! Every successful sign-in upgrades the profile to the paid plan; logout
//! drops it back to free.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::services::SessionSnapshot;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/google", post(login_with_google))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    name: String,
    email: String,
    password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionSnapshot>> {
    let snapshot = state.controller.login(&body.email, &body.password).await?;
    Ok(Json(snapshot))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<SessionSnapshot>> {
    let snapshot = state
        .controller
        .signup(&body.name, &body.email, &body.password)
        .await?;
    Ok(Json(snapshot))
}

async fn login_with_google(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>> {
    let snapshot = state.controller.login_with_google().await?;
    Ok(Json(snapshot))
}

async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<SessionSnapshot>> {
    Ok(Json(state.controller.logout()?))
}
