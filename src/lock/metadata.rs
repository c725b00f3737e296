//! Lock artifact metadata.

use crate::error::{FilekitError, Result};
use crate::system;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Metadata stored inside a lock artifact, identifying the holder.
///
/// This is what an operator looks at when deciding whether a lock is stale
/// and safe to [`break_lock`](super::break_lock).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Owner of the lock (`user@host`).
    pub owner: String,

    /// Process ID of the lock holder (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the lock was created (RFC3339).
    pub created_at: DateTime<Utc>,
}

impl LockMetadata {
    /// Metadata describing the current process, stamped now.
    pub fn new() -> Self {
        Self {
            owner: system::owner_string(),
            pid: Some(std::process::id()),
            created_at: Utc::now(),
        }
    }

    /// Parse lock metadata from an artifact file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            FilekitError::LockError(format!(
                "failed to read lock artifact '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            FilekitError::LockError(format!(
                "failed to parse lock artifact '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Serialize to the JSON stored in the artifact.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FilekitError::LockError(format!("failed to serialize metadata: {}", e)))
    }

    /// How long the lock has been held.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.created_at)
    }

    /// Human-readable age, e.g. `3m`, `2h 10m`, `1d 4h`.
    pub fn age_string(&self) -> String {
        let age = self.age();
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

impl Default for LockMetadata {
    fn default() -> Self {
        Self::new()
    }
}
