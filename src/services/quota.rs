// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily free-tier quota.
//!
//! The quota record holds a count and the UTC day it belongs to. Both
//! [`QuotaManager::check_quota`] and [`QuotaManager::increment_quota`] read
//! the record fresh and reset it when the day has changed. The two calls are
//! not atomic with each other; one session issuing one request at a time is
//! assumed.

use crate::error::Result;
use crate::models::{QuotaStatus, UserQuota};
use crate::services::PlanManager;
use crate::store::{self, keys, KeyValueStore};
use crate::time_utils::Clock;
use std::sync::Arc;

/// Free captions per UTC day.
pub const DAILY_LIMIT: u32 = 5;

/// Owns the persisted [`UserQuota`].
#[derive(Clone)]
pub struct QuotaManager {
    store: Arc<dyn KeyValueStore>,
    plans: PlanManager,
    clock: Arc<dyn Clock>,
}

impl QuotaManager {
    pub fn new(store: Arc<dyn KeyValueStore>, plans: PlanManager, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            plans,
            clock,
        }
    }

    /// Whether another caption is allowed today.
    ///
    /// Paid plans are always allowed and never touch the quota record.
    pub fn check_quota(&self) -> Result<QuotaStatus> {
        if self.plans.get_stored_plan().is_paid() {
            return Ok(QuotaStatus::unlimited());
        }

        let (quota, reset) = self.load_reconciled()?;

        Ok(QuotaStatus {
            allowed: quota.count < DAILY_LIMIT,
            remaining: Some(DAILY_LIMIT.saturating_sub(quota.count)),
            reset,
        })
    }

    /// Record one caption against today's quota.
    ///
    /// No-op on paid plans. Callers check [`Self::check_quota`] first; this
    /// does not refuse to go past the limit.
    pub fn increment_quota(&self) -> Result<()> {
        if self.plans.get_stored_plan().is_paid() {
            return Ok(());
        }

        let (mut quota, _) = self.load_reconciled()?;
        quota.count = quota.count.saturating_add(1);
        store::set_json(self.store.as_ref(), keys::QUOTA, &quota)?;

        tracing::debug!(
            count = quota.count,
            date = %quota.last_reset_date,
            "Quota incremented"
        );
        Ok(())
    }

    /// Read the record, replacing it when missing or from an earlier day.
    ///
    /// Returns the current record and whether a stale one was reset.
    fn load_reconciled(&self) -> Result<(UserQuota, bool)> {
        let today = self.clock.today();

        let stored = match store::get_json::<UserQuota>(self.store.as_ref(), keys::QUOTA) {
            Ok(stored) => stored,
            Err(store::StoreError::Decode { message, .. }) => {
                tracing::warn!(error = %message, "Discarding unreadable quota record");
                None
            }
            Err(e) => return Err(e.into()),
        };

        match stored {
            Some(quota) if quota.is_current(today) => Ok((quota, false)),
            Some(stale) => {
                let quota = UserQuota::fresh(today);
                store::set_json(self.store.as_ref(), keys::QUOTA, &quota)?;
                tracing::info!(
                    previous_date = %stale.last_reset_date,
                    previous_count = stale.count,
                    "Daily quota reset"
                );
                Ok((quota, true))
            }
            None => {
                let quota = UserQuota::fresh(today);
                store::set_json(self.store.as_ref(), keys::QUOTA, &quota)?;
                Ok((quota, false))
            }
        }
    }
}
