// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod caption;
pub mod controller;
pub mod gemini;
pub mod history;
pub mod plan;
pub mod quota;
pub mod session;

pub use caption::{CaptionBackend, CaptionOrchestrator, CaptionRequest};
pub use controller::{AppController, SessionSnapshot};
pub use gemini::GeminiClient;
pub use history::HistoryLog;
pub use plan::PlanManager;
pub use quota::{QuotaManager, DAILY_LIMIT};
pub use session::{IdentityProvider, MockIdentityProvider, SessionManager, SimulatedLatency};
