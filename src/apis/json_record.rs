//! Property documents produced by the extraction step, one JSON object per
//! property:
//!
//! ```json
//! {
//!   "property_id": "0042-118",
//!   "source": "assessor_roll",
//!   "current_owners": ["SMITH JOHN A & MARY"],
//!   "transactions": [{"date": "03/14/2009", "grantee": "SMITH JOHN A"}]
//! }
//! ```
//!
//! Structural problems are reported with a JSONPath-like location such as
//! `$.transactions[2].grantee`.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::{require_property_id, OwnerSource};
use crate::domain::HistoricalTransaction;
use crate::error::{ResolverError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct JsonPropertySource {
    property_id: Option<String>,
    source: Option<String>,
    current_owners: Vec<String>,
    transactions: Vec<HistoricalTransaction>,
}

impl JsonPropertySource {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| ResolverError::malformed("$", "expected a JSON object"))?;

        Ok(Self {
            property_id: property_id_field(root)?,
            source: optional_string(root, "source", "$.source")?,
            current_owners: current_owners_field(root)?,
            transactions: transactions_field(root)?,
        })
    }
}

impl FromStr for JsonPropertySource {
    type Err = ResolverError;

    fn from_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }
}

impl OwnerSource for JsonPropertySource {
    fn property_id(&self) -> Result<String> {
        require_property_id(self.property_id.as_deref())
    }

    fn source_hint(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn current_owner_candidates(&self) -> Result<Vec<String>> {
        Ok(self.current_owners.clone())
    }

    fn historical_transactions(&self) -> Result<Vec<HistoricalTransaction>> {
        Ok(self.transactions.clone())
    }
}

/// Numeric ids are accepted and kept in their JSON spelling
fn property_id_field(root: &Map<String, Value>) -> Result<Option<String>> {
    match root.get("property_id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id.clone())),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(_) => Err(ResolverError::malformed("$.property_id", "expected a string or number")),
    }
}

fn optional_string(object: &Map<String, Value>, key: &str, path: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ResolverError::malformed(path, "expected a string or null")),
    }
}

/// A single string is read as a one-element list; null entries are skipped
fn current_owners_field(root: &Map<String, Value>) -> Result<Vec<String>> {
    match root.get("current_owners") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => {
            let mut owners = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => owners.push(s.clone()),
                    Value::Null => {}
                    _ => {
                        return Err(ResolverError::malformed(
                            format!("$.current_owners[{}]", i),
                            "expected a string",
                        ))
                    }
                }
            }
            Ok(owners)
        }
        Some(_) => Err(ResolverError::malformed(
            "$.current_owners",
            "expected an array of strings",
        )),
    }
}

fn transactions_field(root: &Map<String, Value>) -> Result<Vec<HistoricalTransaction>> {
    let items = match root.get("transactions") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ResolverError::malformed("$.transactions", "expected an array")),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<HistoricalTransaction> {
            let path = format!("$.transactions[{}]", i);
            let object = item
                .as_object()
                .ok_or_else(|| ResolverError::malformed(path.clone(), "expected an object"))?;

            Ok(HistoricalTransaction {
                raw_date: optional_string(object, "date", &format!("{}.date", path))?,
                grantee_raw: optional_string(object, "grantee", &format!("{}.grantee", path))?,
            })
        })
        .collect()
}
