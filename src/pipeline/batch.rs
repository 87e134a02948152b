//! Batch resolution of property documents.
//!
//! Each document is resolved on its own: a hard error on one property becomes
//! an [`ErrorReport`] for that property and the batch moves on. Resolvers only
//! hold immutable state, so nothing leaks from one property into the next.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, info_span};

use crate::apis::{JsonPropertySource, OwnerSource};
use crate::error::{ErrorReport, ResolverError, Result};
use crate::metrics::InputMetrics;
use crate::output::PropertyReport;
use crate::pipeline::processing::ResolverTables;
use crate::pipeline::resolver::OwnerResolver;
use crate::sources::SourceRegistry;

/// Result of one input document
#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub result: std::result::Result<PropertyReport, ErrorReport>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Input documents under `path`: the file itself, or every `*.json` file
/// directly inside a directory, sorted by name
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(ResolverError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input '{}' does not exist", path.display()),
        )));
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        if entry_path.is_file() && entry_path.extension().map_or(false, |ext| ext == "json") {
            inputs.push(entry_path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

pub struct BatchResolver {
    registry: SourceRegistry,
    tables: Arc<ResolverTables>,
    default_source: String,
    forced_source: Option<String>,
    resolvers: HashMap<String, OwnerResolver>,
}

impl BatchResolver {
    /// `forced_source` overrides whatever source a document names
    pub fn new(
        registry: SourceRegistry,
        tables: Arc<ResolverTables>,
        default_source: impl Into<String>,
        forced_source: Option<String>,
    ) -> Result<Self> {
        let default_source = default_source.into();
        registry.get(&default_source)?;
        if let Some(forced) = &forced_source {
            registry.get(forced)?;
        }

        Ok(Self {
            registry,
            tables,
            default_source,
            forced_source,
            resolvers: HashMap::new(),
        })
    }

    /// Resolver for `source_id`, built on first use
    fn resolver_for(&mut self, source_id: &str) -> Result<&OwnerResolver> {
        if !self.resolvers.contains_key(source_id) {
            let profile = self.registry.get(source_id)?.clone();
            self.resolvers
                .insert(source_id.to_string(), OwnerResolver::new(self.tables.clone(), profile));
        }
        self.resolvers
            .get(source_id)
            .ok_or_else(|| ResolverError::UnknownSource(source_id.to_string()))
    }

    /// Resolve one supplier. The source is picked from, in order: the forced
    /// source, the document's own `source`, the default source.
    pub fn resolve_source(&mut self, source: &dyn OwnerSource) -> Result<PropertyReport> {
        let source_id = self
            .forced_source
            .clone()
            .or_else(|| source.source_hint().map(str::to_string))
            .unwrap_or_else(|| self.default_source.clone());

        self.resolver_for(&source_id)?.resolve_property(source)
    }

    pub fn resolve_file(&mut self, path: &Path) -> Result<PropertyReport> {
        let content = fs::read_to_string(path)?;
        InputMetrics::record_document_loaded(content.len());
        let source: JsonPropertySource = content.parse()?;
        self.resolve_source(&source)
    }

    /// Resolve every input; failures are isolated per document
    pub fn run(&mut self, inputs: &[PathBuf]) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(inputs.len());

        for input in inputs {
            let span = info_span!("document", input = %input.display());
            let _enter = span.enter();

            let result = self.resolve_file(input).map_err(|e| {
                error!(kind = e.kind(), "Property aborted: {}", e);
                InputMetrics::record_hard_error(e.kind());
                ErrorReport::from_error(&e, &input.display().to_string())
            });
            outcomes.push(BatchOutcome {
                input: input.clone(),
                result,
            });
        }

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        InputMetrics::record_batch(outcomes.len(), failed);
        info!(documents = outcomes.len(), failed, "Batch finished");

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::InMemoryPropertySource;
    use crate::pipeline::processing::DEFAULT_TABLES;

    fn batch(forced: Option<&str>) -> BatchResolver {
        BatchResolver::new(
            SourceRegistry::new(),
            DEFAULT_TABLES.clone(),
            crate::constants::DEFAULT_SOURCE,
            forced.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_source_selection_order() {
        let roll_doc = InMemoryPropertySource::new("1")
            .with_source("assessor_roll")
            .with_current_owner("SMITH JOHN");

        let report = batch(None).resolve_source(&roll_doc).unwrap();
        assert_eq!(report.source_id, "assessor_roll");
        assert_eq!(report.current_owners()[0].to_string(), "John Smith");

        let report = batch(Some("recorder_index")).resolve_source(&roll_doc).unwrap();
        assert_eq!(report.source_id, "recorder_index");
        assert_eq!(report.current_owners()[0].to_string(), "Smith John");

        let plain = InMemoryPropertySource::new("2").with_current_owner("John Smith");
        assert_eq!(batch(None).resolve_source(&plain).unwrap().source_id, "recorder_index");
    }

    #[test]
    fn test_unknown_sources_are_rejected() {
        let registry = SourceRegistry::new();
        assert!(BatchResolver::new(registry, DEFAULT_TABLES.clone(), "nowhere", None).is_err());

        let doc = InMemoryPropertySource::new("3").with_source("county_gis");
        assert!(matches!(
            batch(None).resolve_source(&doc),
            Err(ResolverError::UnknownSource(_))
        ));
    }

    #[test]
    fn test_failures_are_isolated_per_document() {
        let dir = tempfile::tempdir().unwrap();
        let a = r#"{"property_id": "A", "current_owners": ["ACME LLC"]}"#;
        let c = r#"{"property_id": "C", "current_owners": ["Jane Doe"]}"#;
        fs::write(dir.path().join("a.json"), a).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"current_owners": ["DOE JANE"]}"#).unwrap();
        fs::write(dir.path().join("c.json"), c).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let inputs = collect_inputs(dir.path()).unwrap();
        assert_eq!(inputs.len(), 3);

        let outcomes = batch(None).run(&inputs);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[2].is_ok());

        let report = outcomes[1].result.as_ref().unwrap_err();
        assert_eq!(report.kind, "error");
        assert!(report.path.ends_with("b.json"));
        assert_eq!(report.message, "Missing property identifier");
    }

    #[test]
    fn test_collect_inputs_missing_path() {
        assert!(collect_inputs(Path::new("/no/such/input")).is_err());
    }
}
