use super::{require_property_id, OwnerSource};
use crate::domain::HistoricalTransaction;
use crate::error::Result;

/// Supplier built in code, for callers that already hold the candidate strings
#[derive(Debug, Clone, Default)]
pub struct InMemoryPropertySource {
    property_id: Option<String>,
    source: Option<String>,
    current_owners: Vec<String>,
    transactions: Vec<HistoricalTransaction>,
}

impl InMemoryPropertySource {
    pub fn new(property_id: impl Into<String>) -> Self {
        Self {
            property_id: Some(property_id.into()),
            ..Self::default()
        }
    }

    /// A supplier whose property id lookup fails
    pub fn without_property_id() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_current_owner(mut self, raw: impl Into<String>) -> Self {
        self.current_owners.push(raw.into());
        self
    }

    pub fn with_transaction(mut self, raw_date: Option<&str>, grantee_raw: Option<&str>) -> Self {
        self.transactions.push(HistoricalTransaction {
            raw_date: raw_date.map(str::to_string),
            grantee_raw: grantee_raw.map(str::to_string),
        });
        self
    }
}

impl OwnerSource for InMemoryPropertySource {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolverError;

    #[test]
    fn test_builder_collects_candidates() {
        let source = InMemoryPropertySource::new(" 1024 ")
            .with_source("assessor_roll")
            .with_current_owner("SMITH JOHN")
            .with_transaction(Some("2001-01-01"), Some("DOE JANE"))
            .with_transaction(None, None);

        assert_eq!(source.property_id().unwrap(), "1024");
        assert_eq!(source.source_hint(), Some("assessor_roll"));
        assert_eq!(source.current_owner_candidates().unwrap(), vec!["SMITH JOHN"]);
        assert_eq!(source.historical_transactions().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_property_id() {
        assert!(matches!(
            InMemoryPropertySource::without_property_id().property_id(),
            Err(ResolverError::MissingPropertyId)
        ));
        assert!(matches!(
            InMemoryPropertySource::new("   ").property_id(),
            Err(ResolverError::MissingPropertyId)
        ));
    }
}
