//! Lookup tables shared by every stage of owner resolution.
//!
//! The tables are built once and never mutated afterwards. Callers that need
//! jurisdiction-specific keywords build their own [`ResolverTables`] with
//! [`ResolverTables::with_extensions`] and hand it to the resolver; everything
//! else uses [`DEFAULT_TABLES`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ResolverError, Result};

/// Legal-form suffixes and entity words that mark a company.
/// Multi-word entries match with any whitespace between the words.
pub const COMPANY_KEYWORDS: &[&str] = &[
    // legal forms
    "INC", "INCORPORATED", "LLC", "PLLC", "LLP", "LLLP", "LP", "LTD", "LIMITED",
    "CORP", "CORPORATION", "CO", "COMPANY", "TRUST", "TRST", "PC", "REIT", "FSB",
    // entity words
    "ASSOCIATION", "ASSN", "ASSOC", "ASSOCIATES", "BANK", "REALTY", "PROPERTIES",
    "PROPERTY", "HOLDINGS", "HOLDING", "MANAGEMENT", "MGMT", "PARTNERS",
    "PARTNERSHIP", "INVESTMENTS", "INVESTMENT", "ENTERPRISES", "GROUP", "FOUNDATION",
    "CHURCH", "MINISTRIES", "FUND", "CAPITAL", "VENTURES", "DEVELOPMENT", "BUILDERS",
    "HOMES", "ESTATES", "CONDOMINIUM", "HOMEOWNERS", "HOA", "MORTGAGE", "FINANCIAL",
    "SAVINGS", "LENDING", "SERVICES", "SOLUTIONS", "INTERNATIONAL", "AGENCY",
    "SOCIETY", "CLUB", "AUTHORITY", "DISTRICT", "SCHOOL", "UNIVERSITY", "HOSPITAL",
    "CREDIT UNION", "CITY OF", "COUNTY OF", "STATE OF", "UNITED STATES",
];

/// Boilerplate role phrases stripped from owner strings before anything else.
/// Longer phrases are matched first so "AS TRUSTEE" wins over "TRUSTEE".
pub const ROLE_TOKENS: &[&str] = &[
    "C/O", "CO-OWNERS", "CO-OWNER", "SUCCESSOR TRUSTEES",
    "SUCCESSOR TRUSTEE", "AS TRUSTEES", "AS TRUSTEE", "CO-TRUSTEES", "CO-TRUSTEE",
    "TRUSTEES", "TRUSTEE", "TTEES", "TTEE", "ET AL", "ETAL", "ET ALS", "ET UX",
    "ETUX", "ET VIR", "ETVIR", "JTWROS", "JT TEN", "JTRS", "TEN COM",
    "TENANTS IN COMMON", "TEN ENT", "TENANTS BY THE ENTIRETY", "H/W", "H&W", "W/H",
    "HUSB/WIFE", "HUSBAND AND WIFE", "HIS WIFE", "HER HUSBAND", "LIFE ESTATE",
    "LIFE EST", "DECEASED", "DECD", "DEC'D", "ATTN", "POA", "SURVIVOR",
    "A MARRIED COUPLE", "A MARRIED MAN", "A MARRIED WOMAN", "A SINGLE MAN",
    "A SINGLE WOMAN", "AN UNMARRIED MAN", "AN UNMARRIED WOMAN",
];

/// Role phrases that only count at the edge of an owner: the start or end of
/// the string, or next to a joint-owner delimiter. Inside a name they are
/// ordinary words ("REAL ESTATE OF AMERICA LLC").
pub const EDGE_ROLE_TOKENS: &[&str] = &["THE ESTATE OF", "ESTATE OF", "EST OF", "HEIRS OF"];

/// Generational and professional suffixes, keyed without periods
const SUFFIXES: &[(&str, &str)] = &[
    ("JR", "Jr."), ("JNR", "Jr."), ("SR", "Sr."), ("SNR", "Sr."),
    ("II", "II"), ("III", "III"), ("IV", "IV"),
    ("2ND", "II"), ("3RD", "III"), ("4TH", "IV"),
    ("PHD", "PhD"), ("MD", "MD"), ("ESQ", "Esq."), ("ESQUIRE", "Esq."), ("JD", "JD"),
    ("LLM", "LLM"), ("MBA", "MBA"), ("RN", "RN"), ("DDS", "DDS"), ("DVM", "DVM"),
    ("CFA", "CFA"), ("CPA", "CPA"), ("PE", "PE"), ("PMP", "PMP"),
    ("EMERITUS", "Emeritus"), ("RET", "Ret."),
];

/// Honorifics, keyed without periods. "SR" is only ever read as a suffix.
const PREFIXES: &[(&str, &str)] = &[
    ("MR", "Mr."), ("MRS", "Mrs."), ("MS", "Ms."), ("MISS", "Miss"), ("MX", "Mx."),
    ("DR", "Dr."), ("PROF", "Prof."), ("REV", "Rev."), ("FR", "Fr."), ("BR", "Br."),
    ("CAPT", "Capt."), ("COL", "Col."), ("MAJ", "Maj."), ("LT", "Lt."), ("SGT", "Sgt."),
    ("HON", "Hon."), ("JUDGE", "Judge"), ("RABBI", "Rabbi"), ("IMAM", "Imam"),
    ("SHEIKH", "Sheikh"), ("SIR", "Sir"), ("DAME", "Dame"),
];

/// Lower-case words that belong to the surname that follows them
const SURNAME_PARTICLES: &[&str] = &[
    "VAN", "VON", "DE", "DEL", "DELLA", "DER", "DEN", "DI", "DA", "DU", "DOS", "DAS",
    "LA", "LE", "ST", "STE", "MAC", "MC", "TEN", "TER",
];

/// Tokens shaped like a suffix (roman numerals, ordinals) that are not in the
/// suffix table. They are dropped rather than kept as name parts.
static SUFFIX_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[IVX]{2,}|\d+(?:ST|ND|RD|TH))$").unwrap());

/// Process-wide default tables
pub static DEFAULT_TABLES: Lazy<Arc<ResolverTables>> = Lazy::new(|| {
    Arc::new(ResolverTables::builtin().expect("built-in lookup tables must compile"))
});

/// Immutable keyword, role-token, suffix and prefix tables
#[derive(Debug, Clone)]
pub struct ResolverTables {
    company_keywords: Vec<String>,
    role_tokens: Vec<String>,
    suffixes: HashMap<String, String>,
    prefixes: HashMap<String, String>,
    company_pattern: Regex,
    role_pattern: Regex,
    edge_role_pattern: Regex,
}

impl ResolverTables {
    /// Tables containing only the built-in entries
    pub fn builtin() -> Result<Self> {
        Self::with_extensions(&[], &[])
    }

    /// Built-in tables plus extra company keywords and role tokens
    pub fn with_extensions(
        extra_company_keywords: &[String],
        extra_role_tokens: &[String],
    ) -> Result<Self> {
        let company_keywords = merge_entries(COMPANY_KEYWORDS, extra_company_keywords);
        let mut role_tokens = merge_entries(ROLE_TOKENS, extra_role_tokens);
        role_tokens.sort_by(|a, b| b.len().cmp(&a.len()));

        let company_pattern = compile_alternation(&company_keywords)?;
        let role_pattern = compile_alternation(&role_tokens)?;
        let edge_role_pattern = compile_edge_alternation(EDGE_ROLE_TOKENS)?;

        Ok(Self {
            company_keywords,
            role_tokens,
            suffixes: to_lookup(SUFFIXES),
            prefixes: to_lookup(PREFIXES),
            company_pattern,
            role_pattern,
            edge_role_pattern,
        })
    }

    pub fn company_keywords(&self) -> &[String] {
        &self.company_keywords
    }

    pub fn role_tokens(&self) -> &[String] {
        &self.role_tokens
    }

    /// Case-insensitive, word-anchored company keyword match. Periods are
    /// ignored so "L.L.C." and "INC." count.
    pub fn has_company_keyword(&self, text: &str) -> bool {
        let without_periods = text.replace('.', "");
        self.company_pattern.is_match(&without_periods)
    }

    /// Remove every role token from `text`, leaving a space in its place.
    /// Edge-only phrases go when they touch an owner boundary; the delimiter
    /// next to them is kept.
    pub fn strip_role_tokens(&self, text: &str) -> String {
        let without_roles = self.role_pattern.replace_all(text, " ");
        self.edge_role_pattern
            .replace_all(&without_roles, |caps: &Captures| {
                let boundary = caps.name("lead").or_else(|| caps.name("trail"));
                format!(" {} ", boundary.map_or("", |m| m.as_str()))
            })
            .into_owned()
    }

    /// Canonical suffix for a token such as "jr." or "3RD"
    pub fn canonical_suffix(&self, token: &str) -> Option<&str> {
        self.suffixes.get(&lookup_key(token)).map(|s| s.as_str())
    }

    /// Canonical prefix for a token such as "dr" or "MRS."
    pub fn canonical_prefix(&self, token: &str) -> Option<&str> {
        self.prefixes.get(&lookup_key(token)).map(|s| s.as_str())
    }

    pub fn is_surname_particle(&self, token: &str) -> bool {
        SURNAME_PARTICLES.contains(&lookup_key(token).as_str())
    }

    /// True for tokens that look like a suffix but are not recognized
    pub fn is_suffix_like(&self, token: &str) -> bool {
        let key = lookup_key(token);
        !self.suffixes.contains_key(&key) && SUFFIX_LIKE.is_match(&key)
    }
}

fn lookup_key(token: &str) -> String {
    token
        .trim_matches(|c: char| c == ',' || c == '.')
        .replace('.', "")
        .to_uppercase()
}

fn to_lookup(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn merge_entries(builtin: &[&str], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = builtin.iter().map(|s| s.to_string()).collect();
    for entry in extra {
        let entry = entry.trim().to_uppercase();
        if !entry.is_empty() && !merged.contains(&entry) {
            merged.push(entry);
        }
    }
    merged
}

/// `A|B\s+C|...` with every entry escaped
fn alternatives<S: AsRef<str>>(entries: &[S]) -> String {
    entries
        .iter()
        .map(|entry| {
            entry
                .as_ref()
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ResolverError::Config(format!("invalid lookup table entry: {}", e)))
}

/// `(?i)\b(?:A|B\s+C|...)\b`
fn compile_alternation(entries: &[String]) -> Result<Regex> {
    compile_pattern(&format!(r"(?i)\b(?:{})\b", alternatives(entries)))
}

/// Entries preceded by the string start or a delimiter (`lead`), or followed
/// by the string end or a delimiter (`trail`)
fn compile_edge_alternation(entries: &[&str]) -> Result<Regex> {
    let body = alternatives(entries);
    let delimiter = r"[&;/,]|\band\b";
    compile_pattern(&format!(
        r"(?i)(?:(?P<lead>^|{d})\s*(?:{b})\b|\b(?:{b})\s*(?P<trail>{d}|$))",
        d = delimiter,
        b = body
    ))
}
