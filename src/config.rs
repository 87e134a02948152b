use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants;
use crate::error::{ResolverError, Result};
use crate::pipeline::processing::{NameOrder, ResolverTables, DEFAULT_TABLES};
use crate::sources::SourceRegistry;

/// Contents of `resolver.toml`. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub sources: BTreeMap<String, SourceOverride>,
    pub tables: TablesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Profile for documents that do not name their source
    pub default_source: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_source: constants::DEFAULT_SOURCE.to_string(),
        }
    }
}

/// `[sources.<id>]`: fields left out keep the built-in value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceOverride {
    pub name_order: Option<NameOrder>,
    pub split_on_semicolon: Option<bool>,
    pub split_on_slash: Option<bool>,
    pub digits_imply_company: Option<bool>,
    pub date_formats: Option<Vec<String>>,
}

/// `[tables]`: entries added to the built-in lookup tables
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    pub extra_company_keywords: Vec<String>,
    pub extra_role_tokens: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily-rolling JSON log files; console only when unset
    pub directory: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ResolverError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load `path` if given, otherwise `resolver.toml` when it exists, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Built-in tables, extended by `[tables]` when it adds anything
    pub fn build_tables(&self) -> Result<Arc<ResolverTables>> {
        let tables = &self.tables;
        if tables.extra_company_keywords.is_empty() && tables.extra_role_tokens.is_empty() {
            return Ok(DEFAULT_TABLES.clone());
        }

        let tables = ResolverTables::with_extensions(
            &self.tables.extra_company_keywords,
            &self.tables.extra_role_tokens,
        )?;
        Ok(Arc::new(tables))
    }

    pub fn build_registry(&self) -> Result<SourceRegistry> {
        SourceRegistry::from_config(self)
    }
}
