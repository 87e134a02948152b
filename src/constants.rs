/// Source profile identifiers used in property documents, config files and the CLI

/// All-caps assessor roll exports ("SMITH JOHN A & MARY")
pub const ASSESSOR_ROLL: &str = "assessor_roll";
/// Mixed-case recorder index text ("John A. Smith / Mary Smith")
pub const RECORDER_INDEX: &str = "recorder_index";
/// Deed grantee lines, where any digit left after suffix extraction marks a company
pub const DEED_GRANTEE: &str = "deed_grantee";
/// Accepts plain names only when initials make the token order unambiguous
pub const CONSERVATIVE: &str = "conservative";

/// Profile used when neither the document nor the caller names one
pub const DEFAULT_SOURCE: &str = RECORDER_INDEX;

/// Config file read when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "resolver.toml";

/// Environment variable naming a config file
pub const CONFIG_PATH_ENV: &str = "OWNER_RESOLVER_CONFIG";

/// Prefix of the per-property key in output documents and file names
pub const PROPERTY_KEY_PREFIX: &str = "property_";

/// Get all built-in source profile ids
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![ASSESSOR_ROLL, RECORDER_INDEX, DEED_GRANTEE, CONSERVATIVE]
}

/// Whether `source_id` names a built-in profile
pub fn is_builtin_source(source_id: &str) -> bool {
    get_supported_sources().contains(&source_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_is_builtin() {
        assert!(is_builtin_source(DEFAULT_SOURCE));
        assert!(!is_builtin_source("county_gis"));
        assert_eq!(get_supported_sources().len(), 4);
    }
}
