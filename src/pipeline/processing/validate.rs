use once_cell::sync::Lazy;
use regex::Regex;

use super::person::ParsedName;
use crate::domain::{InvalidReason, Person};

/// First and last names: capitalized segments joined by single separators
static FIRST_LAST_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]*([ \-',.][A-Za-z][a-z]*)*$").unwrap());
static MIDDLE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z\s\-',.]*$").unwrap());

/// Check every name field against the shape grammar. One failing field
/// rejects the whole name; nothing is truncated to make it fit.
pub fn validate_person(parsed: ParsedName) -> Result<Person, InvalidReason> {
    if !FIRST_LAST_NAME.is_match(&parsed.first) {
        return Err(InvalidReason::FirstNamePatternMismatch);
    }
    if !FIRST_LAST_NAME.is_match(&parsed.last) {
        return Err(InvalidReason::LastNamePatternMismatch);
    }
    if let Some(middle) = &parsed.middle {
        if !MIDDLE_NAME.is_match(middle) {
            return Err(InvalidReason::MiddleNamePatternMismatch);
        }
    }

    Ok(Person {
        first_name: parsed.first,
        last_name: parsed.last,
        middle_name: parsed.middle,
        prefix_name: parsed.prefix,
        suffix_name: parsed.suffix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(first: &str, middle: Option<&str>, last: &str) -> ParsedName {
        ParsedName {
            prefix: None,
            first: first.to_string(),
            middle: middle.map(str::to_string),
            last: last.to_string(),
            suffix: None,
        }
    }

    #[test]
    fn test_accepts_well_formed_names() {
        let person = validate_person(parsed("Mary-Kate", Some("A"), "O'Brien")).unwrap();
        assert_eq!(person.first_name, "Mary-Kate");
        assert_eq!(person.last_name, "O'Brien");
        assert_eq!(person.middle_name.as_deref(), Some("A"));

        assert!(validate_person(parsed("Jane", None, "De La Cruz")).is_ok());
        assert!(validate_person(parsed("John", Some("Robert Lee"), "Smith")).is_ok());
    }

    #[test]
    fn test_reports_the_failing_field() {
        assert_eq!(
            validate_person(parsed("J0hn", None, "Smith")),
            Err(InvalidReason::FirstNamePatternMismatch)
        );
        assert_eq!(
            validate_person(parsed("John", None, "Smith2")),
            Err(InvalidReason::LastNamePatternMismatch)
        );
        assert_eq!(
            validate_person(parsed("John", Some("4"), "Smith")),
            Err(InvalidReason::MiddleNamePatternMismatch)
        );
    }

    #[test]
    fn test_rejects_untitled_or_doubled_separators() {
        assert_eq!(
            validate_person(parsed("john", None, "Smith")),
            Err(InvalidReason::FirstNamePatternMismatch)
        );
        assert_eq!(
            validate_person(parsed("John", None, "Smith--Jones")),
            Err(InvalidReason::LastNamePatternMismatch)
        );
    }

    #[test]
    fn test_affixes_carry_over() {
        let mut name = parsed("John", None, "Smith");
        name.prefix = Some("Dr.".to_string());
        name.suffix = Some("Jr.".to_string());
        let person = validate_person(name).unwrap();
        assert_eq!(person.prefix_name.as_deref(), Some("Dr."));
        assert_eq!(person.suffix_name.as_deref(), Some("Jr."));
    }
}
