//! Date-keyed ownership timeline.
//!
//! Bucket keys order themselves: real dates ascending, then synthetic
//! `unknown_date_N` buckets in the order they were encountered, then
//! `current`. A `BTreeMap` over [`DateKey`] therefore serializes in output
//! order without an order-preserving map.

use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::dedup::OwnerSet;
use crate::domain::Owner;

/// Date formats tried, in order, when a source does not configure its own.
/// Two-digit years come before four-digit ones so "05/01/20" is not year 20.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
    "%Y%m%d",
];

const MIN_YEAR: i32 = 1700;
const MAX_YEAR: i32 = 2200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateKey {
    Date(NaiveDate),
    /// 1-based, in encounter order
    Unknown(usize),
    Current,
}

impl DateKey {
    /// Inverse of `Display`
    pub fn parse_key(key: &str) -> Option<DateKey> {
        if key == "current" {
            return Some(DateKey::Current);
        }
        if let Some(n) = key.strip_prefix("unknown_date_") {
            return n.parse().ok().filter(|n| *n > 0).map(DateKey::Unknown);
        }
        NaiveDate::parse_from_str(key, "%Y-%m-%d").ok().map(DateKey::Date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateKey::Unknown(n) => write!(f, "unknown_date_{}", n),
            DateKey::Current => f.write_str("current"),
        }
    }
}

/// Parse a transaction date written in a source's locale format. A trailing
/// time part is ignored. Years outside 1700..=2200 count as unparseable.
pub fn parse_transaction_date<S: AsRef<str>>(raw: &str, formats: &[S]) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut candidates = vec![raw];
    for separator in ['T', ' '] {
        if let Some((date_part, _)) = raw.split_once(separator) {
            if !date_part.is_empty() && !candidates.contains(&date_part) {
                candidates.push(date_part);
            }
        }
    }

    candidates.iter().find_map(|candidate| {
        formats.iter().find_map(|format| {
            NaiveDate::parse_from_str(candidate, format.as_ref())
                .ok()
                .filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
        })
    })
}

/// Ordered mapping from date key to a deduplicated owner set.
/// `current` is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTimeline {
    buckets: BTreeMap<DateKey, OwnerSet>,
}

impl Default for OwnershipTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnershipTimeline {
    pub fn new() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(DateKey::Current, OwnerSet::new());
        Self { buckets }
    }

    /// Merge owners into a bucket, returning how many were duplicates
    pub fn insert<I: IntoIterator<Item = Owner>>(&mut self, key: DateKey, owners: I) -> usize {
        self.buckets.entry(key).or_default().extend(owners)
    }

    pub fn get(&self, key: &DateKey) -> Option<&OwnerSet> {
        self.buckets.get(key)
    }

    pub fn current(&self) -> &OwnerSet {
        &self.buckets[&DateKey::Current]
    }

    pub fn keys(&self) -> impl Iterator<Item = &DateKey> {
        self.buckets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &OwnerSet)> {
        self.buckets.iter()
    }

    /// Number of buckets, `current` included
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(OwnerSet::is_empty)
    }

    /// Most recent real-dated bucket
    pub fn latest_dated(&self) -> Option<(&NaiveDate, &OwnerSet)> {
        self.buckets.iter().rev().find_map(|(key, owners)| match key {
            DateKey::Date(date) => Some((date, owners)),
            _ => None,
        })
    }
}

impl Serialize for OwnershipTimeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, owners) in &self.buckets {
            map.serialize_entry(&key.to_string(), owners)?;
        }
        map.end()
    }
}

/// Builds an [`OwnershipTimeline`] from the current-owner block and the
/// historical transactions of one property.
pub struct TimelineAssembler {
    date_formats: Vec<String>,
    timeline: OwnershipTimeline,
    unknown_buckets: usize,
    duplicates_dropped: usize,
}

impl TimelineAssembler {
    pub fn new<S: AsRef<str>>(date_formats: &[S]) -> Self {
        let date_formats = if date_formats.is_empty() {
            DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
        } else {
            date_formats.iter().map(|f| f.as_ref().to_string()).collect()
        };

        Self {
            date_formats,
            timeline: OwnershipTimeline::new(),
            unknown_buckets: 0,
            duplicates_dropped: 0,
        }
    }

    pub fn add_current(&mut self, owners: Vec<Owner>) {
        self.duplicates_dropped += self.timeline.insert(DateKey::Current, owners);
    }

    /// Add the grantees of one transaction. A transaction without owners
    /// creates no bucket and does not consume an unknown-date number.
    pub fn add_transaction(
        &mut self,
        raw_date: Option<&str>,
        owners: Vec<Owner>,
    ) -> Option<DateKey> {
        if owners.is_empty() {
            return None;
        }

        let formats = self.date_formats.as_slice();
        let key = match raw_date.and_then(|raw| parse_transaction_date(raw, formats)) {
            Some(date) => DateKey::Date(date),
            None => {
                self.unknown_buckets += 1;
                debug!(
                    raw_date = ?raw_date,
                    bucket = self.unknown_buckets,
                    "Unparseable transaction date"
                );
                DateKey::Unknown(self.unknown_buckets)
            }
        };

        self.duplicates_dropped += self.timeline.insert(key, owners);
        Some(key)
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Finish the timeline. An empty `current` bucket falls back to the owners
    /// of the most recent real-dated transaction, never an unknown-date one.
    pub fn finish(mut self) -> OwnershipTimeline {
        if self.timeline.current().is_empty() {
            let fallback = self
                .timeline
                .latest_dated()
                .map(|(date, owners)| (*date, owners.as_slice().to_vec()));

            if let Some((date, owners)) = fallback {
                debug!(
                    %date,
                    owners = owners.len(),
                    "Current owners taken from latest transaction"
                );
                self.timeline.insert(DateKey::Current, owners);
            }
        }
        self.timeline
    }
}
