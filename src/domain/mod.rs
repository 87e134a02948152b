use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw ownership string as scraped, with the transaction date it belongs to
/// (None for the current-owner block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerCandidate {
    pub raw_text: String,
    pub source_date: Option<String>,
}

impl OwnerCandidate {
    pub fn current(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            source_date: None,
        }
    }

    pub fn dated(raw_text: impl Into<String>, source_date: Option<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            source_date,
        }
    }
}

/// A recorded transfer as delivered by the document extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalTransaction {
    /// Date in whatever locale format the source uses
    pub raw_date: Option<String>,
    /// Receiving party of the transfer, unparsed
    pub grantee_raw: Option<String>,
}

/// A natural person. Every name field already satisfies the name-shape grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix_name: Option<String>,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            middle_name: None,
            prefix_name: None,
            suffix_name: None,
        }
    }

    pub fn with_middle(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    pub fn with_prefix(mut self, prefix_name: impl Into<String>) -> Self {
        self.prefix_name = Some(prefix_name.into());
        self
    }

    pub fn with_suffix(mut self, suffix_name: impl Into<String>) -> Self {
        self.suffix_name = Some(suffix_name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An owner of record. Serialized as `{"type": "person", ...}` or
/// `{"type": "company", "name": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Owner {
    Person(Person),
    Company(Company),
}

impl Owner {
    pub fn kind(&self) -> &'static str {
        match self {
            Owner::Person(_) => "person",
            Owner::Company(_) => "company",
        }
    }

    pub fn is_company(&self) -> bool {
        matches!(self, Owner::Company(_))
    }
}

impl From<Person> for Owner {
    fn from(person: Person) -> Self {
        Owner::Person(person)
    }
}

impl From<Company> for Owner {
    fn from(company: Company) -> Self {
        Owner::Company(company)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Company(c) => write!(f, "{}", c.name),
            Owner::Person(p) => {
                if let Some(prefix) = &p.prefix_name {
                    write!(f, "{} ", prefix)?;
                }
                write!(f, "{}", p.first_name)?;
                if let Some(middle) = &p.middle_name {
                    write!(f, " {}", middle)?;
                }
                write!(f, " {}", p.last_name)?;
                if let Some(suffix) = &p.suffix_name {
                    write!(f, " {}", suffix)?;
                }
                Ok(())
            }
        }
    }
}

/// Reason codes attached to owner strings that could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Nothing left after normalization
    Empty,
    /// Neither company nor person
    Unclassified,
    /// Mailing address or other non-name text
    AddressOrNoise,
    /// Fewer than two usable name tokens and no inferred surname
    InsufficientNameParts,
    /// Two-token name with no ordering signal under the conservative order
    AmbiguousNameOrder,
    FirstNamePatternMismatch,
    LastNamePatternMismatch,
    MiddleNamePatternMismatch,
    CouldNotParsePerson,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::Empty => "empty",
            InvalidReason::Unclassified => "unclassified",
            InvalidReason::AddressOrNoise => "address_or_noise",
            InvalidReason::InsufficientNameParts => "insufficient_name_parts",
            InvalidReason::AmbiguousNameOrder => "ambiguous_name_order",
            InvalidReason::FirstNamePatternMismatch => "first_name_pattern_mismatch",
            InvalidReason::LastNamePatternMismatch => "last_name_pattern_mismatch",
            InvalidReason::MiddleNamePatternMismatch => "middle_name_pattern_mismatch",
            InvalidReason::CouldNotParsePerson => "could_not_parse_person",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit record for a string that was dropped from the owner set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvalidOwnerEntry {
    pub raw: String,
    pub reason: InvalidReason,
}

impl InvalidOwnerEntry {
    pub fn new(raw: impl Into<String>, reason: InvalidReason) -> Self {
        Self {
            raw: raw.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_record_shape() {
        let owner: Owner = Person::new("Jane", "Doe").with_middle("A").into();
        assert_eq!(
            serde_json::to_value(&owner).unwrap(),
            json!({
                "type": "person",
                "first_name": "Jane",
                "last_name": "Doe",
                "middle_name": "A"
            })
        );
    }

    #[test]
    fn test_person_without_middle_serializes_null() {
        let owner: Owner = Person::new("John", "Smith").with_suffix("Jr.").into();
        let value = serde_json::to_value(&owner).unwrap();
        assert_eq!(value["middle_name"], serde_json::Value::Null);
        assert_eq!(value["suffix_name"], "Jr.");
        assert!(value.get("prefix_name").is_none());
    }

    #[test]
    fn test_company_record_shape() {
        let owner: Owner = Company::new("Acme Holdings Llc").into();
        assert_eq!(
            serde_json::to_value(&owner).unwrap(),
            json!({"type": "company", "name": "Acme Holdings Llc"})
        );
    }

    #[test]
    fn test_kind_matches_record_type_tag() {
        let owners: Vec<Owner> = vec![
            Person::new("Jane", "Doe").into(),
            Company::new("Acme Llc").into(),
        ];
        for owner in owners {
            let value = serde_json::to_value(&owner).unwrap();
            assert_eq!(value["type"], owner.kind());
        }
    }

    #[test]
    fn test_owner_record_round_trips_from_json() {
        let owner: Owner = serde_json::from_value(json!({
            "type": "person",
            "first_name": "Mary",
            "last_name": "Smith",
            "middle_name": null,
            "prefix_name": "Dr."
        }))
        .unwrap();

        assert_eq!(owner, Owner::Person(Person::new("Mary", "Smith").with_prefix("Dr.")));
        assert_eq!(owner.to_string(), "Dr. Mary Smith");
    }

    #[test]
    fn test_invalid_entry_reason_code() {
        let entry = InvalidOwnerEntry::new("MARY A", InvalidReason::InsufficientNameParts);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"raw": "MARY A", "reason": "insufficient_name_parts"})
        );
        assert_eq!(InvalidReason::AddressOrNoise.to_string(), "address_or_noise");
    }
}
