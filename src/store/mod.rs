//! Persisted key-value store for the user profile.
//!
//! The profile is a handful of string values keyed by name, the same shape as
//! browser `localStorage`. Structured records are stored as JSON.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};

/// Key names as constants.
pub mod keys {
    /// Logged-in user (JSON `User`)
    pub const USER: &str = "lenscraft_user";
    /// Subscription plan (bare `FREE`/`PAID`)
    pub const PLAN: &str = "lenscraft_plan";
    /// Free-tier usage for the current day (JSON `UserQuota`)
    pub const QUOTA: &str = "lenscraft_quota";
}

/// Durable per-profile storage.
///
/// Operations are synchronous. Implementations are not required to
/// coordinate with other processes using the same backing storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON record.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    store
        .get(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|e| StoreError::Decode {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

/// Encode and write a JSON record.
pub fn set_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set(key, &raw)
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Corrupt profile file {path}: {message}")]
    CorruptProfile { path: String, message: String },

    #[error("Failed to decode {key}: {message}")]
    Decode { key: String, message: String },

    #[error("Failed to encode {key}: {message}")]
    Encode { key: String, message: String },
}
