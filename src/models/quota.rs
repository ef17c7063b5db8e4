//! Free-tier usage records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Captions used on `last_reset_date`.
///
/// `count` only means something when `last_reset_date` is today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuota {
    pub count: u32,
    pub last_reset_date: NaiveDate,
}

impl UserQuota {
    /// Unused quota for `date`.
    pub fn fresh(date: NaiveDate) -> Self {
        Self {
            count: 0,
            last_reset_date: date,
        }
    }

    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.last_reset_date == today
    }
}

/// Result of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct QuotaStatus {
    pub allowed: bool,
    /// Captions left today; `None` means unlimited.
    pub remaining: Option<u32>,
    /// The stored quota belonged to an earlier day and was reset.
    pub reset: bool,
}

impl QuotaStatus {
    pub fn unlimited() -> Self {
        Self {
            allowed: true,
            remaining: None,
            reset: false,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.remaining.is_none()
    }
}
