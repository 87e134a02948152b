//! Person name parsing.
//!
//! A fragment arrives here already normalized, split and classified as a
//! person candidate. The parser decides which tokens are the first, middle and
//! last name and pulls honorific prefixes and generational suffixes off the
//! ends. Ordering of plain (comma-less) names is never guessed from letter
//! case; it comes from the source profile as a [`NameOrder`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::normalize::title_case;
use super::tables::ResolverTables;
use crate::domain::InvalidReason;

/// Token order of plain names for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrder {
    /// `SMITH JOHN A`, typical of all-caps assessor rolls
    #[default]
    LastFirst,
    /// `John A Smith`, typical of free text
    FirstLast,
    /// Only accept names whose initials make the order unambiguous
    AutoConservative,
}

impl NameOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameOrder::LastFirst => "last_first",
            NameOrder::FirstLast => "first_last",
            NameOrder::AutoConservative => "auto_conservative",
        }
    }
}

impl fmt::Display for NameOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name parts of one person, title-cased but not yet shape-validated.
/// Prefix and suffix are already in canonical display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub prefix: Option<String>,
    pub first: String,
    pub middle: Option<String>,
    pub last: String,
    pub suffix: Option<String>,
}

pub struct PersonNameParser {
    tables: Arc<ResolverTables>,
    order: NameOrder,
}

impl PersonNameParser {
    pub fn new(tables: Arc<ResolverTables>, order: NameOrder) -> Self {
        Self { tables, order }
    }

    pub fn order(&self) -> NameOrder {
        self.order
    }

    /// Parse one fragment. `inferred_surname` comes from a sibling fragment of
    /// the same joint-owner string and is only used for single-token names.
    pub fn parse(
        &self,
        fragment: &str,
        inferred_surname: Option<&str>,
    ) -> Result<ParsedName, InvalidReason> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(InvalidReason::Empty);
        }

        match fragment.split_once(',') {
            Some((left, right)) => self.parse_comma_form(left, right, inferred_surname),
            None => self.parse_plain(tokenize(fragment), None, inferred_surname),
        }
    }

    /// `LAST [SUFFIX], [PREFIX] FIRST [MIDDLE...] [SUFFIX]`, the same for every order
    fn parse_comma_form(
        &self,
        left: &str,
        right: &str,
        inferred_surname: Option<&str>,
    ) -> Result<ParsedName, InvalidReason> {
        let mut last_tokens = tokenize(left);
        let mut given_tokens = tokenize(right);

        if last_tokens.is_empty() {
            return Err(InvalidReason::CouldNotParsePerson);
        }
        if given_tokens.is_empty() {
            return self.parse_plain(last_tokens, None, inferred_surname);
        }

        // "JOHN SMITH, JR": the comma only sets off the suffix
        if given_tokens.iter().all(|t| self.is_any_suffix(t)) {
            let suffix = given_tokens.iter().find_map(|t| self.tables.canonical_suffix(t));
            return self.parse_plain(last_tokens, suffix.map(str::to_string), inferred_surname);
        }

        let mut suffix = self.take_suffixes(&mut last_tokens);
        let prefix = self.take_prefix(&mut given_tokens);
        let given_suffix = self.take_suffixes(&mut given_tokens);
        if suffix.is_none() {
            suffix = given_suffix;
        }

        if is_initial(&last_tokens.join(" ")) {
            return Err(InvalidReason::InsufficientNameParts);
        }

        let (first, middle) = given_tokens
            .split_first()
            .ok_or(InvalidReason::InsufficientNameParts)?;
        Ok(ParsedName {
            prefix,
            first: title_case(first),
            middle: join_title_cased(middle),
            last: title_case(&last_tokens.join(" ")),
            suffix,
        })
    }

    fn parse_plain(
        &self,
        mut tokens: Vec<&str>,
        preset_suffix: Option<String>,
        inferred_surname: Option<&str>,
    ) -> Result<ParsedName, InvalidReason> {
        // a bare honorific ("MR" out of "MR & MRS JOHN SMITH") names nobody
        if tokens.len() == 1 && self.tables.canonical_prefix(tokens[0]).is_some() {
            return Err(InvalidReason::InsufficientNameParts);
        }

        // roll formats lead with the surname, and "SIR ALAN" is a surname
        let prefix = if self.order == NameOrder::LastFirst && tokens.len() == 2 {
            None
        } else {
            self.take_prefix(&mut tokens)
        };
        let trailing_suffix = self.take_suffixes(&mut tokens);
        let mut suffix = preset_suffix.or(trailing_suffix);

        // "SMITH JR JOHN": roll formats put the suffix right after the surname
        if suffix.is_none() && self.order == NameOrder::LastFirst && tokens.len() >= 3 {
            if let Some(canonical) = self.tables.canonical_suffix(tokens[1]) {
                suffix = Some(canonical.to_string());
                tokens.remove(1);
            }
        }

        match tokens.len() {
            0 => Err(InvalidReason::InsufficientNameParts),
            1 => match inferred_surname {
                Some(surname) if !surname.trim().is_empty() => Ok(ParsedName {
                    prefix,
                    first: title_case(tokens[0]),
                    middle: None,
                    last: title_case(surname),
                    suffix,
                }),
                _ => Err(InvalidReason::InsufficientNameParts),
            },
            len => {
                // "MARY A" never becomes a person with surname "A"
                if len == 2 && is_initial(tokens[1]) {
                    return Err(InvalidReason::InsufficientNameParts);
                }

                let order = match self.order {
                    NameOrder::AutoConservative => self.detect_order(&tokens)?,
                    order => order,
                };

                let (first, middle, last) = match order {
                    NameOrder::FirstLast => self.split_first_last(&tokens)?,
                    _ => self.split_last_first(&tokens)?,
                };

                Ok(ParsedName {
                    prefix,
                    first: title_case(first),
                    middle: join_title_cased(middle),
                    last: title_case(&last.join(" ")),
                    suffix,
                })
            }
        }
    }

    /// Order signal from initials; only unambiguous shapes pass. With three or
    /// more tokens a leading initial proves nothing ("J ROBERT SMITH" reads
    /// either way), so the initial has to sit strictly inside.
    fn detect_order(&self, tokens: &[&str]) -> Result<NameOrder, InvalidReason> {
        let last_index = tokens.len() - 1;
        if tokens.len() >= 3 && is_initial(tokens[last_index]) {
            return Ok(NameOrder::LastFirst);
        }

        let inner = if tokens.len() >= 3 {
            &tokens[1..last_index]
        } else {
            &tokens[..last_index]
        };
        if !is_initial(tokens[last_index]) && inner.iter().any(|t| is_initial(t)) {
            return Ok(NameOrder::FirstLast);
        }
        Err(InvalidReason::AmbiguousNameOrder)
    }

    /// `FIRST [MIDDLE...] [PARTICLE...] LAST`
    fn split_first_last<'a, 't>(
        &self,
        tokens: &'a [&'t str],
    ) -> Result<(&'t str, &'a [&'t str], &'a [&'t str]), InvalidReason> {
        let last_index = tokens.len() - 1;
        if is_initial(tokens[last_index]) {
            return Err(InvalidReason::InsufficientNameParts);
        }

        let mut surname_start = last_index;
        while surname_start > 1 && self.tables.is_surname_particle(tokens[surname_start - 1]) {
            surname_start -= 1;
        }

        Ok((tokens[0], &tokens[1..surname_start], &tokens[surname_start..]))
    }

    /// `[PARTICLE...] LAST FIRST [MIDDLE...]`
    fn split_last_first<'a, 't>(
        &self,
        tokens: &'a [&'t str],
    ) -> Result<(&'t str, &'a [&'t str], &'a [&'t str]), InvalidReason> {
        if is_initial(tokens[0]) {
            return Err(InvalidReason::InsufficientNameParts);
        }

        let mut surname_end = 1;
        while surname_end < tokens.len() - 1
            && self.tables.is_surname_particle(tokens[surname_end - 1])
        {
            surname_end += 1;
        }

        let given = &tokens[surname_end..];
        Ok((given[0], &given[1..], &tokens[..surname_end]))
    }

    fn take_prefix(&self, tokens: &mut Vec<&str>) -> Option<String> {
        if tokens.len() < 2 {
            return None;
        }
        let canonical = self.tables.canonical_prefix(tokens[0])?.to_string();
        tokens.remove(0);
        Some(canonical)
    }

    /// Pop trailing suffix tokens. Suffix-like tokens outside the table are
    /// dropped; when several recognized suffixes trail, the leftmost is kept.
    fn take_suffixes(&self, tokens: &mut Vec<&str>) -> Option<String> {
        let mut kept = None;
        while tokens.len() > 1 {
            let Some(&token) = tokens.last() else { break };
            if let Some(canonical) = self.tables.canonical_suffix(token) {
                kept = Some(canonical.to_string());
            } else if !self.tables.is_suffix_like(token) {
                break;
            }
            tokens.pop();
        }
        kept
    }

    fn is_any_suffix(&self, token: &str) -> bool {
        self.tables.canonical_suffix(token).is_some() || self.tables.is_suffix_like(token)
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

/// A lone letter, with or without a trailing period
fn is_initial(token: &str) -> bool {
    let mut letters = token.chars().filter(|c| c.is_alphabetic());
    letters.next().is_some()
        && letters.next().is_none()
        && token.trim_end_matches('.').chars().count() == 1
}

fn join_title_cased(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(title_case(&tokens.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::tables::DEFAULT_TABLES;

    fn parser(order: NameOrder) -> PersonNameParser {
        PersonNameParser::new(DEFAULT_TABLES.clone(), order)
    }

    fn name(first: &str, middle: Option<&str>, last: &str) -> ParsedName {
        ParsedName {
            prefix: None,
            first: first.to_string(),
            middle: middle.map(str::to_string),
            last: last.to_string(),
            suffix: None,
        }
    }

    #[test]
    fn test_comma_form_is_order_independent() {
        for order in [NameOrder::LastFirst, NameOrder::FirstLast, NameOrder::AutoConservative] {
            assert_eq!(
                parser(order).parse("DOE, JANE A", None).unwrap(),
                name("Jane", Some("A"), "Doe")
            );
        }
    }

    #[test]
    fn test_comma_form_suffix_on_surname() {
        let parsed = parser(NameOrder::LastFirst).parse("SMITH JR, JOHN", None).unwrap();
        assert_eq!(parsed.last, "Smith");
        assert_eq!(parsed.first, "John");
        assert_eq!(parsed.suffix.as_deref(), Some("Jr."));
    }

    #[test]
    fn test_comma_form_suffix_after_given_names() {
        let parsed = parser(NameOrder::FirstLast).parse("DOE, JANE MARIE III", None).unwrap();
        assert_eq!(parsed.first, "Jane");
        assert_eq!(parsed.middle.as_deref(), Some("Marie"));
        assert_eq!(parsed.suffix.as_deref(), Some("III"));
    }

    #[test]
    fn test_comma_only_sets_off_suffix() {
        let parsed = parser(NameOrder::FirstLast).parse("JOHN SMITH, JR.", None).unwrap();
        assert_eq!(parsed.first, "John");
        assert_eq!(parsed.last, "Smith");
        assert_eq!(parsed.suffix.as_deref(), Some("Jr."));
    }

    #[test]
    fn test_comma_form_failures() {
        let p = parser(NameOrder::LastFirst);
        assert_eq!(p.parse(", JOHN", None), Err(InvalidReason::CouldNotParsePerson));
        assert_eq!(p.parse("A, JOHN", None), Err(InvalidReason::InsufficientNameParts));
    }

    #[test]
    fn test_plain_orders() {
        assert_eq!(
            parser(NameOrder::LastFirst).parse("SMITH JOHN ROBERT", None).unwrap(),
            name("John", Some("Robert"), "Smith")
        );
        assert_eq!(
            parser(NameOrder::FirstLast).parse("John Robert Smith", None).unwrap(),
            name("John", Some("Robert"), "Smith")
        );
    }

    #[test]
    fn test_trailing_single_letter_is_never_a_surname() {
        for order in [NameOrder::LastFirst, NameOrder::FirstLast, NameOrder::AutoConservative] {
            assert_eq!(
                parser(order).parse("MARY A", None),
                Err(InvalidReason::InsufficientNameParts)
            );
        }
        assert_eq!(
            parser(NameOrder::FirstLast).parse("JOHN ROBERT Q", None),
            Err(InvalidReason::InsufficientNameParts)
        );
    }

    #[test]
    fn test_single_token_uses_inferred_surname() {
        let p = parser(NameOrder::FirstLast);
        assert_eq!(p.parse("JOHN", Some("Smith")).unwrap(), name("John", None, "Smith"));
        assert_eq!(p.parse("JOHN", None), Err(InvalidReason::InsufficientNameParts));
    }

    #[test]
    fn test_inferred_surname_ignored_for_multi_token_names() {
        let parsed = parser(NameOrder::FirstLast).parse("MARY JONES", Some("Smith")).unwrap();
        assert_eq!(parsed.last, "Jones");
    }

    #[test]
    fn test_prefix_and_suffix_extraction() {
        let parsed = parser(NameOrder::FirstLast).parse("DR. JOHN A SMITH PHD", None).unwrap();
        assert_eq!(parsed.prefix.as_deref(), Some("Dr."));
        assert_eq!(parsed.first, "John");
        assert_eq!(parsed.middle.as_deref(), Some("A"));
        assert_eq!(parsed.last, "Smith");
        assert_eq!(parsed.suffix.as_deref(), Some("PhD"));
    }

    #[test]
    fn test_ordinal_suffix_is_extracted() {
        let parsed = parser(NameOrder::FirstLast).parse("JOHN SMITH 3RD", None).unwrap();
        assert_eq!(parsed.last, "Smith");
        assert_eq!(parsed.suffix.as_deref(), Some("III"));
    }

    #[test]
    fn test_unrecognized_suffix_like_tokens_are_dropped() {
        let parsed = parser(NameOrder::LastFirst).parse("SMITH JOHN VI", None).unwrap();
        assert_eq!(parsed, name("John", None, "Smith"));
    }

    #[test]
    fn test_roll_format_suffix_after_surname() {
        let parsed = parser(NameOrder::LastFirst).parse("SMITH JR JOHN A", None).unwrap();
        assert_eq!(parsed.last, "Smith");
        assert_eq!(parsed.first, "John");
        assert_eq!(parsed.middle.as_deref(), Some("A"));
        assert_eq!(parsed.suffix.as_deref(), Some("Jr."));
    }

    #[test]
    fn test_surname_particles_stay_with_surname() {
        assert_eq!(
            parser(NameOrder::LastFirst).parse("VAN DYKE JOHN", None).unwrap(),
            name("John", None, "Van Dyke")
        );
        assert_eq!(
            parser(NameOrder::FirstLast).parse("MARIA DE LA CRUZ", None).unwrap(),
            name("Maria", None, "De La Cruz")
        );
        // a particle-looking first token still leaves a given name
        assert_eq!(
            parser(NameOrder::LastFirst).parse("LE JOHN", None).unwrap(),
            name("John", None, "Le")
        );
    }

    #[test]
    fn test_auto_conservative_uses_initials() {
        let p = parser(NameOrder::AutoConservative);
        assert_eq!(p.parse("SMITH JOHN A", None).unwrap(), name("John", Some("A"), "Smith"));
        assert_eq!(p.parse("JOHN A SMITH", None).unwrap(), name("John", Some("A"), "Smith"));
        assert_eq!(p.parse("JOHN SMITH", None), Err(InvalidReason::AmbiguousNameOrder));
        assert_eq!(p.parse("JOHN ROBERT SMITH", None), Err(InvalidReason::AmbiguousNameOrder));
        assert_eq!(p.parse("J ROBERT SMITH", None), Err(InvalidReason::AmbiguousNameOrder));
        assert_eq!(p.parse("J SMITH", None).unwrap(), name("J", None, "Smith"));
    }

    #[test]
    fn test_bare_honorific_is_not_a_name() {
        for order in [NameOrder::LastFirst, NameOrder::FirstLast, NameOrder::AutoConservative] {
            let p = parser(order);
            assert_eq!(p.parse("MR", None), Err(InvalidReason::InsufficientNameParts));
            assert_eq!(p.parse("MRS.", Some("Smith")), Err(InvalidReason::InsufficientNameParts));
        }
    }

    #[test]
    fn test_roll_surname_that_looks_like_a_prefix() {
        let p = parser(NameOrder::LastFirst);
        assert_eq!(p.parse("JUDGE MICHAEL", None).unwrap(), name("Michael", None, "Judge"));
        assert_eq!(p.parse("SIR ALAN", None).unwrap(), name("Alan", None, "Sir"));

        let parsed = p.parse("DR SMITH JOHN", None).unwrap();
        assert_eq!(parsed.prefix.as_deref(), Some("Dr."));
        assert_eq!(parsed.last, "Smith");
        assert_eq!(parsed.first, "John");
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(parser(NameOrder::LastFirst).parse("  ", None), Err(InvalidReason::Empty));
    }

    #[test]
    fn test_is_initial() {
        assert!(is_initial("A"));
        assert!(is_initial("A."));
        assert!(!is_initial("AB"));
        assert!(!is_initial("."));
    }
}
