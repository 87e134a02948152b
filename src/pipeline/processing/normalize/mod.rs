//! Text normalization for raw owner strings.
//!
//! [`normalize_text`] is total and idempotent: it never fails, and running it
//! on its own output changes nothing. Letter case is left alone; later stages
//! still need to see whether a string was written in all caps.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tables::ResolverTables;

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*\)|\[[^\[\]]*\]|\{[^{}]*\}").unwrap());
static UNCLOSED_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[(\[{].*$").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,;])").unwrap());
static REPEATED_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([,;&/])(?:\s*[,;&/])+").unwrap());
static DANGLING_CONJUNCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:and|&)(?:\s+|$)|\s+(?:and|&)$").unwrap());

/// Upper bound on normalization passes; real input settles in two
const MAX_PASSES: usize = 16;

/// Characters separating name segments for title-casing
const NAME_SEPARATORS: [char; 5] = [' ', '-', '\'', '.', ','];

/// Normalize one raw owner string: collapse whitespace, drop bracketed and
/// parenthetical noise, strip boilerplate role tokens and dangling punctuation.
/// An empty result means "no owner".
pub fn normalize_text(raw: &str, tables: &ResolverTables) -> String {
    let mut current = normalize_pass(raw, tables);
    for _ in 0..MAX_PASSES {
        let next = normalize_pass(&current, tables);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_pass(text: &str, tables: &ResolverTables) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| match c {
            '"' | '*' | ':' | '|' | '!' | '?' | '#' | '_' | '\u{201c}' | '\u{201d}' => ' ',
            '\u{2018}' | '\u{2019}' => '\'',
            c if c.is_whitespace() || c.is_control() => ' ',
            c => c,
        })
        .collect();

    let mut stripped = cleaned;
    while PARENTHETICAL.is_match(&stripped) {
        stripped = PARENTHETICAL.replace_all(&stripped, " ").into_owned();
    }
    let stripped = UNCLOSED_BRACKET.replace(&stripped, " ");
    let stripped = stripped.replace([')', ']', '}'], " ");

    let without_roles = tables.strip_role_tokens(&stripped);
    let collapsed = collapse_whitespace(&without_roles);
    let tidy = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
    let tidy = REPEATED_PUNCT.replace_all(&tidy, "$1");

    trim_edges(&tidy)
}

/// Trim whitespace, separator punctuation and dangling "AND"/"&" from both ends
fn trim_edges(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let trimmed = current
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '&' | '/' | '-'))
            .to_string();
        let trimmed = DANGLING_CONJUNCTION.replace_all(&trimmed, "").into_owned();
        if trimmed == current {
            return current;
        }
        current = trimmed;
    }
}

/// Single spaces between words, none at the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case a name field: the first letter of each separator-delimited
/// segment upper-cased, the rest lower-cased. Runs of separators collapse to
/// a single separator (a space if the run contains one), and separators never
/// lead or trail.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator: Option<char> = None;
    let mut at_segment_start = true;

    for c in text.chars() {
        if NAME_SEPARATORS.contains(&c) {
            pending_separator = match pending_separator {
                Some(' ') => Some(' '),
                Some(_) if c == ' ' => Some(' '),
                Some(existing) => Some(existing),
                None => Some(c),
            };
            at_segment_start = true;
            continue;
        }

        if let Some(sep) = pending_separator.take() {
            if !out.is_empty() {
                out.push(sep);
            }
        }

        if at_segment_start {
            out.extend(c.to_uppercase());
            at_segment_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}
