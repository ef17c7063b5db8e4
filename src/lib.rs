// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LensCraft: caption images with Gemini behind a free/paid quota.
//!
//! This crate provides the session, plan and quota bookkeeping for a single
//! user profile, the caption request orchestration with model fallback, and
//! a small JSON API that a browser front end drives.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::AppController;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub controller: AppController,
}
