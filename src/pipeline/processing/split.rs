use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::{Classification, OwnerClassifier};

static AMPERSAND_AND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:&|\band\b)\s*").unwrap());
static WITH_SEMICOLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:&|;|\band\b)\s*").unwrap());
static WITH_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:&|/|\band\b)\s*").unwrap());
static WITH_BOTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:&|;|/|\band\b)\s*").unwrap());

/// Which optional delimiters a source uses between joint owners.
/// `&` and `AND` always split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitRules {
    pub on_semicolon: bool,
    pub on_slash: bool,
}

impl SplitRules {
    fn delimiter(&self) -> &'static Regex {
        match (self.on_semicolon, self.on_slash) {
            (false, false) => &*AMPERSAND_AND,
            (true, false) => &*WITH_SEMICOLON,
            (false, true) => &*WITH_SLASH,
            (true, true) => &*WITH_BOTH,
        }
    }
}

/// Divide a normalized owner string into owner fragments.
///
/// The whole string is classified first; a string that is already a company
/// ("SMITH AND SONS INC") is never split. Non-empty input always yields at
/// least one fragment.
pub fn split_joint_owners(
    text: &str,
    classifier: &dyn OwnerClassifier,
    rules: &SplitRules,
) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if classifier.classify(text) == Classification::Company {
        return vec![text.to_string()];
    }

    let fragments: Vec<String> = rules
        .delimiter()
        .split(text)
        .map(|f| f.trim_matches(|c: char| c.is_whitespace() || c == ','))
        .filter(|f| !f.is_empty())
        .map(|f| f.to_string())
        .collect();

    if fragments.is_empty() {
        vec![text.to_string()]
    } else {
        fragments
    }
}
