//! The JSON document produced for one property:
//!
//! ```json
//! {
//!   "property_<id>": { "owners_by_date": { "2009-03-14": [...], "current": [...] } },
//!   "invalid_owners": [ { "raw": "...", "reason": "..." } ]
//! }
//! ```

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::PROPERTY_KEY_PREFIX;
use crate::domain::{InvalidOwnerEntry, Owner};
use crate::error::Result;
use crate::pipeline::processing::OwnershipTimeline;

/// Everything resolved for one property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyReport {
    pub property_id: String,
    /// Source profile the property was resolved with; not serialized
    pub source_id: String,
    pub owners_by_date: OwnershipTimeline,
    pub invalid_owners: Vec<InvalidOwnerEntry>,
}

#[derive(Serialize)]
struct PropertyBlock<'a> {
    owners_by_date: &'a OwnershipTimeline,
}

impl PropertyReport {
    pub fn new(
        property_id: impl Into<String>,
        source_id: impl Into<String>,
        owners_by_date: OwnershipTimeline,
        invalid_owners: Vec<InvalidOwnerEntry>,
    ) -> Self {
        Self {
            property_id: property_id.into(),
            source_id: source_id.into(),
            owners_by_date,
            invalid_owners,
        }
    }

    /// `property_<id>`
    pub fn property_key(&self) -> String {
        format!("{}{}", PROPERTY_KEY_PREFIX, self.property_id)
    }

    pub fn current_owners(&self) -> &[Owner] {
        self.owners_by_date.current().as_slice()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name for this report: the property key with anything outside
    /// `[A-Za-z0-9_-]` replaced by `_`
    pub fn file_name(&self) -> String {
        let safe: String = self
            .property_key()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        format!("{}.json", safe)
    }

    /// Write the report into `dir` (created if needed) and return the file path
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_json_pretty()?)?;
        Ok(path)
    }
}

impl Serialize for PropertyReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(
            &self.property_key(),
            &PropertyBlock {
                owners_by_date: &self.owners_by_date,
            },
        )?;
        map.serialize_entry("invalid_owners", &self.invalid_owners)?;
        map.end()
    }
}
