//! Candidate suppliers: where raw owner strings come from.
//!
//! Document acquisition and DOM/JSON traversal live outside the engine. A
//! supplier only has to hand over the property id, the current-owner strings
//! and the historical transactions.

pub mod in_memory;
pub mod json_record;

pub use in_memory::InMemoryPropertySource;
pub use json_record::JsonPropertySource;

use crate::domain::HistoricalTransaction;
use crate::error::Result;

/// Core trait that every candidate supplier implements
pub trait OwnerSource {
    /// Identifier of the property. Failing here aborts the whole property.
    fn property_id(&self) -> Result<String>;

    /// Source profile named by the document itself, if any
    fn source_hint(&self) -> Option<&str> {
        None
    }

    fn current_owner_candidates(&self) -> Result<Vec<String>>;

    fn historical_transactions(&self) -> Result<Vec<HistoricalTransaction>>;
}

/// Shared property id check: surrounding whitespace is dropped and a blank id
/// is a hard error
pub(crate) fn require_property_id(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(crate::error::ResolverError::MissingPropertyId),
    }
}
