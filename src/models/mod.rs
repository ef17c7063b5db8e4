// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod history;
pub mod plan;
pub mod quota;
pub mod user;

pub use history::{CaptionResult, HistoryItem};
pub use plan::Plan;
pub use quota::{QuotaStatus, UserQuota};
pub use user::User;
