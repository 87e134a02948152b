use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use super::tables::ResolverTables;
use crate::domain::InvalidReason;

/// Street addresses, PO boxes and trailing "STATE ZIP" blocks
static ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b\d+[A-Z]?\s+(?:[NSEW]\.?\s+)?(?:[A-Z0-9.]+\s+){0,4}",
        r"(?:ST|STREET|AVE|AVENUE|RD|ROAD|DR|DRIVE|BLVD|BOULEVARD|LN|LANE|CT|COURT|WAY|HWY|",
        r"HIGHWAY|PL|PLACE|PKWY|PARKWAY|CIR|CIRCLE|TER|TERRACE|TRL|TRAIL|LOOP|SQ|SQUARE)\b",
        r"|\bP\.?\s*O\.?\s*BOX\b",
        r"|\bBOX\s+\d+",
        r"|\b[A-Z]{2}\s+\d{5}(?:-\d{4})?\s*$",
    ))
    .unwrap()
});

/// Outcome of classifying one owner string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Company,
    Person,
    Unclassified(InvalidReason),
}

/// Capability seam for owner classification. The pipeline only ever talks to
/// this trait, so alternative strategies can be swapped in per source.
pub trait OwnerClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;

    /// Human-readable strategy name, used in logs
    fn name(&self) -> &str;
}

/// Keyword and pattern driven classifier backed by [`ResolverTables`].
///
/// Check order matters and is fixed:
/// 1. company keyword (word-anchored)
/// 2. street address / PO box noise
/// 3. suffix and prefix tokens are set aside
/// 4. digit heuristics on what is left
pub struct KeywordClassifier {
    tables: Arc<ResolverTables>,
    digits_imply_company: bool,
}

impl KeywordClassifier {
    pub fn new(tables: Arc<ResolverTables>) -> Self {
        Self {
            tables,
            digits_imply_company: false,
        }
    }

    /// Treat any digit left after suffix extraction as a company marker
    pub fn with_digits_imply_company(mut self, enabled: bool) -> Self {
        self.digits_imply_company = enabled;
        self
    }

    /// Tokens of `text` with recognized or suffix-like affixes removed
    fn tokens_without_affixes<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .filter(|t| {
                self.tables.canonical_suffix(t).is_none()
                    && self.tables.canonical_prefix(t).is_none()
                    && !self.tables.is_suffix_like(t)
            })
            .collect()
    }
}

impl OwnerClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            return Classification::Unclassified(InvalidReason::Empty);
        }

        if !text.chars().any(char::is_alphabetic) {
            return if text.chars().any(|c| c.is_ascii_digit()) {
                Classification::Unclassified(InvalidReason::AddressOrNoise)
            } else {
                Classification::Unclassified(InvalidReason::Unclassified)
            };
        }

        if self.tables.has_company_keyword(text) {
            return Classification::Company;
        }

        if ADDRESS.is_match(text) {
            return Classification::Unclassified(InvalidReason::AddressOrNoise);
        }

        let remainder = self.tokens_without_affixes(text);
        let has_digit = remainder.iter().any(|t| t.chars().any(|c| c.is_ascii_digit()));

        if has_digit {
            if self.digits_imply_company {
                return Classification::Company;
            }
            if is_all_caps(text) && remainder.len() >= 3 {
                return Classification::Company;
            }
            return Classification::Unclassified(InvalidReason::Unclassified);
        }

        Classification::Person
    }

    fn name(&self) -> &str {
        if self.digits_imply_company {
            "keyword_digits_company"
        } else {
            "keyword"
        }
    }
}

/// At least one letter and no lower-case letters
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}
