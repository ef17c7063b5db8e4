//! Subscription plan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Subscription tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Plan {
    /// Five captions per UTC day
    #[default]
    Free,
    /// Unlimited captions
    Paid,
}

impl Plan {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::Paid => "PAID",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Plan::Paid)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = UnknownPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(Plan::Free),
            "PAID" => Ok(Plan::Paid),
            other => Err(UnknownPlan(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown plan: {0}")]
pub struct UnknownPlan(pub String);
