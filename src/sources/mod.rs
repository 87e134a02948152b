//! Per-source resolution profiles.
//!
//! Sources disagree on how owner strings are written: token order, which
//! characters separate joint owners, whether a digit means "company". Each
//! source keeps its own behavior instead of a unified guess, so a profile is
//! looked up by source id before a property is resolved.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::{Config, SourceOverride};
use crate::constants;
use crate::error::{ResolverError, Result};
use crate::pipeline::processing::{
    KeywordClassifier, NameOrder, ResolverTables, SplitRules, DEFAULT_DATE_FORMATS,
};

/// Resolution settings for one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProfile {
    pub id: String,
    pub name_order: NameOrder,
    pub split_on_semicolon: bool,
    pub split_on_slash: bool,
    pub digits_imply_company: bool,
    pub date_formats: Vec<String>,
}

impl SourceProfile {
    /// Profile with the given order, only `&`/`AND` splitting and the default date formats
    pub fn new(id: impl Into<String>, name_order: NameOrder) -> Self {
        Self {
            id: id.into(),
            name_order,
            split_on_semicolon: false,
            split_on_slash: false,
            digits_imply_company: false,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn assessor_roll() -> Self {
        Self {
            split_on_semicolon: true,
            ..Self::new(constants::ASSESSOR_ROLL, NameOrder::LastFirst)
        }
    }

    pub fn recorder_index() -> Self {
        Self {
            split_on_semicolon: true,
            split_on_slash: true,
            ..Self::new(constants::RECORDER_INDEX, NameOrder::FirstLast)
        }
    }

    pub fn deed_grantee() -> Self {
        Self {
            digits_imply_company: true,
            ..Self::new(constants::DEED_GRANTEE, NameOrder::FirstLast)
        }
    }

    pub fn conservative() -> Self {
        Self {
            split_on_semicolon: true,
            ..Self::new(constants::CONSERVATIVE, NameOrder::AutoConservative)
        }
    }

    /// Built-in profile for `source_id`, if there is one
    pub fn builtin(source_id: &str) -> Option<Self> {
        match source_id {
            constants::ASSESSOR_ROLL => Some(Self::assessor_roll()),
            constants::RECORDER_INDEX => Some(Self::recorder_index()),
            constants::DEED_GRANTEE => Some(Self::deed_grantee()),
            constants::CONSERVATIVE => Some(Self::conservative()),
            _ => None,
        }
    }

    pub fn split_rules(&self) -> SplitRules {
        SplitRules {
            on_semicolon: self.split_on_semicolon,
            on_slash: self.split_on_slash,
        }
    }

    /// The keyword classifier configured for this source
    pub fn classifier(&self, tables: Arc<ResolverTables>) -> KeywordClassifier {
        KeywordClassifier::new(tables).with_digits_imply_company(self.digits_imply_company)
    }

    /// Apply a `[sources.<id>]` config table on top of this profile
    pub fn apply_override(&mut self, over: &SourceOverride) -> Result<()> {
        if let Some(order) = over.name_order {
            self.name_order = order;
        }
        if let Some(enabled) = over.split_on_semicolon {
            self.split_on_semicolon = enabled;
        }
        if let Some(enabled) = over.split_on_slash {
            self.split_on_slash = enabled;
        }
        if let Some(enabled) = over.digits_imply_company {
            self.digits_imply_company = enabled;
        }
        if let Some(formats) = &over.date_formats {
            validate_date_formats(&self.id, formats)?;
            self.date_formats = formats.clone();
        }
        Ok(())
    }
}

/// Reject empty lists and strftime strings chrono cannot parse with
fn validate_date_formats(source_id: &str, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Err(ResolverError::Config(format!(
            "source '{}' has an empty date_formats list",
            source_id
        )));
    }
    for format in formats {
        let unparseable = StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
        if format.trim().is_empty() || unparseable {
            return Err(ResolverError::Config(format!(
                "source '{}' has an invalid date format '{}'",
                source_id, format
            )));
        }
    }
    Ok(())
}

/// Registry of source profiles keyed by source id
pub struct SourceRegistry {
    profiles: HashMap<String, SourceProfile>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistry {
    /// Create a registry holding the built-in profiles
    pub fn new() -> Self {
        let mut registry = Self {
            profiles: HashMap::new(),
        };

        for source_id in constants::get_supported_sources() {
            if let Some(profile) = SourceProfile::builtin(source_id) {
                registry.register(profile);
            }
        }

        registry
    }

    /// Built-in profiles with the `[sources]` tables of `config` applied.
    /// Ids that are not built in start from a `last_first` profile.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::new();

        for (source_id, over) in &config.sources {
            if !constants::is_builtin_source(source_id) {
                debug!(source = %source_id, "Adding source profile from config");
            }
            let mut profile = registry
                .profiles
                .remove(source_id)
                .unwrap_or_else(|| SourceProfile::new(source_id.clone(), NameOrder::LastFirst));
            profile.apply_override(over)?;
            registry.register(profile);
        }

        registry.get(&config.resolver.default_source)?;
        Ok(registry)
    }

    /// Register a profile, replacing any profile with the same id
    pub fn register(&mut self, profile: SourceProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    pub fn get(&self, source_id: &str) -> Result<&SourceProfile> {
        self.profiles
            .get(source_id)
            .ok_or_else(|| ResolverError::UnknownSource(source_id.to_string()))
    }

    /// Registered source ids, sorted
    pub fn list_sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self.profiles.keys().map(|k| k.as_str()).collect();
        sources.sort_unstable();
        sources
    }
}
