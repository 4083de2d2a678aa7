//! Bounded diagnostic log.
//!
//! Keeps the most recent progress lines of all discovery calls so they can be
//! served from a read-only debug endpoint after the fact.

use crate::config::DEFAULT_DEBUG_LOG_CAPACITY;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// A fixed-capacity ring of timestamped log lines.
///
/// Appends are safe from many tasks at once. When full, the oldest line is
/// evicted.
#[derive(Debug)]
pub struct DebugLog {
    capacity: usize,
    entries: Mutex<VecDeque<String>>,
}

impl DebugLog {
    /// Creates an empty log holding at most `capacity` lines.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Emits `message` as a tracing event and appends it to the ring.
    ///
    /// Callers must pass already-sanitized text.
    pub fn record(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");

        let entry = format!("[{}] {message}", timestamp());
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Returns a copy of the retained lines, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().cloned().collect()
    }

    /// Returns the maximum number of retained lines.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DEBUG_LOG_CAPACITY)
    }
}

/// Seconds since the Unix epoch with millisecond precision.
fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}
