use std::collections::HashSet;
use tracing::warn;

use crate::domain::{InvalidOwnerEntry, InvalidReason};

/// Append-only audit list of dropped owner strings, deduplicated by
/// (raw, reason) and kept in first-seen order.
#[derive(Debug, Default)]
pub struct InvalidCollector {
    entries: Vec<InvalidOwnerEntry>,
    seen: HashSet<(String, InvalidReason)>,
}

impl InvalidCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejected string. Returns false if the same (raw, reason) pair
    /// was already recorded.
    pub fn record(&mut self, raw: &str, reason: InvalidReason) -> bool {
        if !self.seen.insert((raw.to_string(), reason)) {
            return false;
        }
        warn!(raw = %raw, reason = %reason, "Owner string rejected");
        self.entries.push(InvalidOwnerEntry::new(raw, reason));
        true
    }

    pub fn entries(&self) -> &[InvalidOwnerEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<InvalidOwnerEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
