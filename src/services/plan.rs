// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription plan storage.

use crate::error::Result;
use crate::models::Plan;
use crate::store::{keys, KeyValueStore};
use std::sync::Arc;

/// Reads and writes the persisted plan.
///
/// This layer does not know about users. Requiring a login before
/// upgrading is the controller's job.
#[derive(Clone)]
pub struct PlanManager {
    store: Arc<dyn KeyValueStore>,
}

impl PlanManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored plan, `Free` when nothing (or nothing recognizable) is stored.
    pub fn get_stored_plan(&self) -> Plan {
        match self.store.get(keys::PLAN) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unrecognized stored plan");
                Plan::Free
            }),
            Ok(None) => Plan::Free,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored plan");
                Plan::Free
            }
        }
    }

    /// Overwrite the stored plan.
    pub fn set_stored_plan(&self, plan: Plan) -> Result<()> {
        self.store.set(keys::PLAN, plan.as_str())?;
        tracing::info!(plan = %plan, "Plan updated");
        Ok(())
    }
}
