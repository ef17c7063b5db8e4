// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application controller: the one place that combines session, plan,
//! quota and caption services into user-facing actions.
//!
//! Invariants kept here rather than in the individual managers:
//! - the plan is `Free` whenever nobody is logged in;
//! - a free-plan caption request is refused before any model call once the
//!   daily quota is used up, and counted only after it succeeds;
//! - a successful caption is never reported sooner than the configured
//!   minimum latency.

use crate::config::{Config, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MIN_CAPTION_LATENCY_MS};
use crate::error::{AppError, Result};
use crate::models::{HistoryItem, Plan, QuotaStatus, User};
use crate::services::caption::{strip_data_uri_prefix, CaptionOrchestrator};
use crate::services::quota::DAILY_LIMIT;
use crate::services::session::{IdentityProvider, MockIdentityProvider, SimulatedLatency};
use crate::services::{GeminiClient, HistoryLog, PlanManager, QuotaManager, SessionManager};
use crate::store::KeyValueStore;
use crate::time_utils::{Clock, SystemClock};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// What the UI needs to render the account and plan area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub plan: Plan,
    /// Captions left today; `None` on the paid plan.
    pub remaining: Option<u32>,
    pub daily_limit: u32,
}

/// Wires user actions to the managers and owns the session history.
pub struct AppController {
    sessions: SessionManager,
    plans: PlanManager,
    quota: QuotaManager,
    captions: CaptionOrchestrator,
    history: HistoryLog,
    clock: Arc<dyn Clock>,
    min_caption_latency: Duration,
    max_upload_bytes: usize,
}

impl AppController {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        captions: CaptionOrchestrator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let plans = PlanManager::new(store.clone());
        Self {
            sessions: SessionManager::new(store.clone(), identity),
            quota: QuotaManager::new(store, plans.clone(), clock.clone()),
            plans,
            captions,
            history: HistoryLog::new(),
            clock,
            min_caption_latency: Duration::from_millis(DEFAULT_MIN_CAPTION_LATENCY_MS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Production wiring: Gemini backend and mock identity provider.
    pub fn from_config(config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let latency = if config.simulate_auth_latency {
            SimulatedLatency::NETWORK
        } else {
            SimulatedLatency::NONE
        };
        let identity = Arc::new(MockIdentityProvider::new(clock.clone(), latency));
        let captions = CaptionOrchestrator::new(
            config.api_key.clone(),
            Arc::new(GeminiClient::new(config.gemini_api_url.clone())),
        );

        Self::new(store, identity, captions, clock)
            .with_min_caption_latency(config.min_caption_latency)
            .with_max_upload_bytes(config.max_upload_bytes)
    }

    pub fn with_min_caption_latency(mut self, latency: Duration) -> Self {
        self.min_caption_latency = latency;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn plans(&self) -> &PlanManager {
        &self.plans
    }

    /// Restore the stored session, demoting a paid plan nobody is logged in to.
    pub fn initialize(&self) -> Result<SessionSnapshot> {
        if self.plans.get_stored_plan().is_paid() && self.sessions.current_user().is_none() {
            tracing::warn!("Stored plan is PAID without a user; reverting to FREE");
            self.plans.set_stored_plan(Plan::Free)?;
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let plan = self.plans.get_stored_plan();
        let remaining = if plan.is_paid() {
            None
        } else {
            self.quota.check_quota()?.remaining
        };

        Ok(SessionSnapshot {
            user: self.sessions.current_user(),
            plan,
            remaining,
            daily_limit: DAILY_LIMIT,
        })
    }

    pub fn quota_status(&self) -> Result<QuotaStatus> {
        self.quota.check_quota()
    }

    /// Switch plans. Upgrading requires a logged-in user.
    pub fn request_plan_change(&self, plan: Plan) -> Result<SessionSnapshot> {
        if plan.is_paid() && self.sessions.current_user().is_none() {
            return Err(AppError::LoginRequired);
        }
        self.plans.set_stored_plan(plan)?;
        self.snapshot()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionSnapshot> {
        let user = self.sessions.login(email, password).await?;
        self.on_login(user)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<SessionSnapshot> {
        let user = self.sessions.signup(name, email, password).await?;
        self.on_login(user)
    }

    pub async fn login_with_google(&self) -> Result<SessionSnapshot> {
        let user = self.sessions.login_with_google().await?;
        self.on_login(user)
    }

    /// Log out and drop back to the free plan.
    pub fn logout(&self) -> Result<SessionSnapshot> {
        self.sessions.logout()?;
        self.plans.set_stored_plan(Plan::Free)?;
        self.snapshot()
    }

    /// Logging in upgrades to the paid plan.
    fn on_login(&self, user: User) -> Result<SessionSnapshot> {
        self.plans.set_stored_plan(Plan::Paid)?;
        tracing::info!(user_id = %user.id, "Upgraded to PAID on login");
        self.snapshot()
    }

    /// Caption an image and record it in the history.
    pub async fn generate_caption(&self, image: &str, mime_type: &str) -> Result<HistoryItem> {
        let image = image.trim();
        let mime_type = self.validate_image(image, mime_type)?;

        let plan = self.plans.get_stored_plan();
        let status = self.quota.check_quota()?;
        if !status.allowed && !plan.is_paid() {
            tracing::info!("Caption refused: daily quota reached");
            return Err(AppError::QuotaExceeded);
        }

        let started = Instant::now();
        let result = self.captions.generate_caption(image, mime_type).await?;

        let elapsed = started.elapsed();
        if elapsed < self.min_caption_latency {
            tokio::time::sleep(self.min_caption_latency - elapsed).await;
        }

        if !plan.is_paid() {
            self.quota.increment_quota()?;
        }

        let item = HistoryItem {
            id: uuid::Uuid::new_v4().to_string(),
            image_url: image.to_string(),
            caption: result.text,
            model_used: result.model,
            timestamp: self.clock.now_millis(),
        };
        self.history.prepend(item.clone());

        tracing::info!(
            model = %item.model_used,
            plan = %plan,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Caption generated"
        );
        Ok(item)
    }

    /// Session history, newest first.
    pub fn history(&self) -> Vec<HistoryItem> {
        self.history.items()
    }

    fn validate_image<'a>(&self, image: &str, mime_type: &'a str) -> Result<&'a str> {
        let data = strip_data_uri_prefix(image);
        if data.is_empty() {
            return Err(AppError::Validation("No image selected".to_string()));
        }

        let mime_type = if mime_type.is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            mime_type
        };
        if !mime_type.starts_with("image/") {
            return Err(AppError::Validation(format!(
                "Unsupported file type: {}",
                mime_type
            )));
        }

        if decoded_len(data) > self.max_upload_bytes {
            return Err(AppError::Validation(format!(
                "File size too large. Please upload an image under {}MB.",
                self.max_upload_bytes / (1024 * 1024)
            )));
        }
        BASE64
            .decode(data)
            .map_err(|_| AppError::Validation("Image data is not valid base64".to_string()))?;

        Ok(mime_type)
    }
}

/// Decoded size of a padded base64 payload, without decoding it.
fn decoded_len(data: &str) -> usize {
    let padding = data.bytes().rev().take_while(|&b| b == b'=').count().min(2);
    base64::decoded_len_estimate(data.len()).saturating_sub(padding)
}
