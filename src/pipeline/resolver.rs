//! Owner resolution for one property.
//!
//! Every non-blank candidate string ends up either as owners in a timeline
//! bucket or as entries in `invalid_owners`; nothing is dropped without a
//! trace. Hard errors only come from the candidate supplier.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span};

use crate::apis::OwnerSource;
use crate::domain::{Company, InvalidOwnerEntry, InvalidReason, Owner, OwnerCandidate};
use crate::error::Result;
use crate::metrics::ResolverMetrics;
use crate::output::PropertyReport;
use crate::pipeline::processing::{
    normalize_text, split_joint_owners, title_case, validate_person, Classification,
    InvalidCollector, NameOrder, OwnerClassifier, OwnershipTimeline, PersonNameParser,
    ResolverTables, TimelineAssembler,
};
use crate::sources::SourceProfile;

/// Counters for one resolution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub candidates: usize,
    pub persons: usize,
    pub companies: usize,
    pub invalid: usize,
    pub duplicates_dropped: usize,
}

/// Timeline and audit list for one property, before it is wrapped in a report
#[derive(Debug, Clone)]
pub struct ResolvedOwners {
    pub timeline: OwnershipTimeline,
    pub invalid_owners: Vec<InvalidOwnerEntry>,
    pub stats: ResolutionStats,
}

/// Outcome of one fragment before sibling surname inference
enum FragmentOutcome {
    Resolved(Owner),
    NeedsSurname(String),
    Rejected,
}

/// Resolves owner strings under one source profile.
///
/// Holds only immutable state, so one resolver (or many sharing the same
/// `Arc<ResolverTables>`) can serve concurrent property runs.
pub struct OwnerResolver {
    profile: SourceProfile,
    tables: Arc<ResolverTables>,
    classifier: Box<dyn OwnerClassifier>,
    parser: PersonNameParser,
}

impl OwnerResolver {
    pub fn new(tables: Arc<ResolverTables>, profile: SourceProfile) -> Self {
        let classifier = Box::new(profile.classifier(tables.clone()));
        let parser = PersonNameParser::new(tables.clone(), profile.name_order);

        Self {
            profile,
            tables,
            classifier,
            parser,
        }
    }

    /// Swap in another classification strategy
    pub fn with_classifier(mut self, classifier: Box<dyn OwnerClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn profile(&self) -> &SourceProfile {
        &self.profile
    }

    /// Resolve one raw owner string into owners. Rejected fragments go to
    /// `invalid`. A blank string yields nothing and records nothing.
    pub fn resolve_text(&self, raw: &str, invalid: &mut InvalidCollector) -> Vec<Owner> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Vec::new();
        }

        let normalized = normalize_text(raw, &self.tables);
        if normalized.is_empty() {
            self.reject(raw, InvalidReason::Empty, invalid);
            return Vec::new();
        }

        let rules = self.profile.split_rules();
        let fragments = split_joint_owners(&normalized, self.classifier.as_ref(), &rules);
        debug!(
            raw = %raw,
            normalized = %normalized,
            fragments = fragments.len(),
            classifier = self.classifier.name(),
            "Split owner string"
        );

        let outcomes: Vec<FragmentOutcome> = fragments
            .iter()
            .map(|fragment| self.resolve_fragment(fragment, invalid))
            .collect();

        let mut owners = Vec::with_capacity(outcomes.len());
        for (index, outcome) in outcomes.iter().enumerate() {
            match outcome {
                FragmentOutcome::Resolved(owner) => owners.push(owner.clone()),
                FragmentOutcome::Rejected => {}
                FragmentOutcome::NeedsSurname(fragment) => {
                    let parsed = match self.sibling_surname(&outcomes, index) {
                        Some(surname) => self.parser.parse(fragment, Some(surname)),
                        None => Err(InvalidReason::InsufficientNameParts),
                    };
                    match parsed.and_then(validate_person) {
                        Ok(person) => {
                            debug!(
                                fragment = %fragment,
                                last_name = %person.last_name,
                                "Surname inferred from sibling"
                            );
                            ResolverMetrics::record_surname_inferred();
                            owners.push(Owner::Person(person));
                        }
                        Err(reason) => self.reject(fragment, reason, invalid),
                    }
                }
            }
        }

        owners
    }

    fn resolve_fragment(&self, fragment: &str, invalid: &mut InvalidCollector) -> FragmentOutcome {
        match self.classifier.classify(fragment) {
            Classification::Company => {
                debug!(fragment = %fragment, "Classified as company");
                FragmentOutcome::Resolved(Owner::Company(Company::new(title_case(fragment))))
            }
            Classification::Unclassified(reason) => {
                self.reject(fragment, reason, invalid);
                FragmentOutcome::Rejected
            }
            Classification::Person => {
                match self.parser.parse(fragment, None).and_then(validate_person) {
                    Ok(person) => {
                        debug!(fragment = %fragment, order = %self.parser.order(), "Parsed person");
                        FragmentOutcome::Resolved(Owner::Person(person))
                    }
                    Err(InvalidReason::InsufficientNameParts) => {
                        FragmentOutcome::NeedsSurname(fragment.to_string())
                    }
                    Err(reason) => {
                        self.reject(fragment, reason, invalid);
                        FragmentOutcome::Rejected
                    }
                }
            }
        }
    }

    /// Surname of the nearest resolved person sibling. First-last sources
    /// write the shared surname last ("JOHN & MARY SMITH"), so they look
    /// forward first; other orders look back first ("SMITH JOHN & MARY").
    fn sibling_surname<'a>(
        &self,
        outcomes: &'a [FragmentOutcome],
        index: usize,
    ) -> Option<&'a str> {
        let forward = outcomes[index + 1..].iter().find_map(person_surname);
        let backward = outcomes[..index].iter().rev().find_map(person_surname);

        if self.profile.name_order == NameOrder::FirstLast {
            forward.or(backward)
        } else {
            backward.or(forward)
        }
    }

    fn reject(&self, raw: &str, reason: InvalidReason, invalid: &mut InvalidCollector) {
        if invalid.record(raw, reason) {
            ResolverMetrics::record_invalid(reason.as_str());
        }
    }

    /// Build the timeline from the current-owner candidates and one candidate
    /// per historical transaction
    pub fn resolve_candidates(
        &self,
        current: &[OwnerCandidate],
        historical: &[OwnerCandidate],
    ) -> ResolvedOwners {
        let mut invalid = InvalidCollector::new();
        let mut assembler = TimelineAssembler::new(self.profile.date_formats.as_slice());
        let mut stats = ResolutionStats::default();

        for candidate in current {
            stats.candidates += 1;
            let owners = self.resolve_text(&candidate.raw_text, &mut invalid);
            assembler.add_current(owners);
        }

        for candidate in historical {
            stats.candidates += 1;
            let owners = self.resolve_text(&candidate.raw_text, &mut invalid);
            if let Some(key) = assembler.add_transaction(candidate.source_date.as_deref(), owners) {
                debug!(bucket = %key, "Transaction grantees added");
            }
        }

        stats.duplicates_dropped = assembler.duplicates_dropped();
        let timeline = assembler.finish();

        for (_, owners) in timeline.iter() {
            for owner in owners.iter() {
                match owner {
                    Owner::Person(_) => stats.persons += 1,
                    Owner::Company(_) => stats.companies += 1,
                }
            }
        }
        stats.invalid = invalid.len();

        ResolvedOwners {
            timeline,
            invalid_owners: invalid.into_entries(),
            stats,
        }
    }

    /// Resolve one property from its supplier. Only supplier failures are
    /// errors; unresolvable strings end up in the report's `invalid_owners`.
    pub fn resolve_property(&self, source: &dyn OwnerSource) -> Result<PropertyReport> {
        let started = Instant::now();
        let property_id = source.property_id()?;

        let span = info_span!(
            "resolve_property",
            property_id = %property_id,
            source = %self.profile.id
        );
        let _enter = span.enter();

        let current: Vec<OwnerCandidate> = source
            .current_owner_candidates()?
            .into_iter()
            .map(OwnerCandidate::current)
            .collect();

        // a transaction without a grantee has no owners to place
        let historical: Vec<OwnerCandidate> = source
            .historical_transactions()?
            .into_iter()
            .filter_map(|tx| {
                tx.grantee_raw
                    .map(|grantee| OwnerCandidate::dated(grantee, tx.raw_date))
            })
            .collect();

        let resolved = self.resolve_candidates(&current, &historical);
        ResolverMetrics::record_duplicates_dropped(resolved.stats.duplicates_dropped);

        let elapsed = started.elapsed().as_secs_f64();
        ResolverMetrics::record_property_resolved(
            &self.profile.id,
            resolved.stats.candidates,
            resolved.stats.persons,
            resolved.stats.companies,
            elapsed,
        );

        info!(
            candidates = resolved.stats.candidates,
            persons = resolved.stats.persons,
            companies = resolved.stats.companies,
            invalid = resolved.stats.invalid,
            buckets = resolved.timeline.len(),
            "Property resolved"
        );

        Ok(PropertyReport::new(
            property_id,
            self.profile.id.clone(),
            resolved.timeline,
            resolved.invalid_owners,
        ))
    }
}

fn person_surname(outcome: &FragmentOutcome) -> Option<&str> {
    match outcome {
        FragmentOutcome::Resolved(Owner::Person(person)) => Some(person.last_name.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::InMemoryPropertySource;
    use crate::domain::Person;
    use crate::error::ResolverError;
    use crate::pipeline::processing::{DateKey, DEFAULT_TABLES};

    fn resolver(profile: SourceProfile) -> OwnerResolver {
        OwnerResolver::new(DEFAULT_TABLES.clone(), profile)
    }

    fn resolve(profile: SourceProfile, raw: &str) -> (Vec<Owner>, Vec<InvalidOwnerEntry>) {
        let mut invalid = InvalidCollector::new();
        let owners = resolver(profile).resolve_text(raw, &mut invalid);
        (owners, invalid.into_entries())
    }

    #[test]
    fn test_joint_owner_surname_inference_first_last() {
        let (owners, invalid) = resolve(SourceProfile::recorder_index(), "JOHN & MARY SMITH");
        assert!(invalid.is_empty());
        assert_eq!(
            owners,
            vec![
                Owner::Person(Person::new("John", "Smith")),
                Owner::Person(Person::new("Mary", "Smith")),
            ]
        );
    }

    #[test]
    fn test_joint_owner_surname_inference_last_first() {
        let (owners, invalid) = resolve(SourceProfile::assessor_roll(), "SMITH JOHN A & MARY");
        assert!(invalid.is_empty());
        assert_eq!(
            owners,
            vec![
                Owner::Person(Person::new("John", "Smith").with_middle("A")),
                Owner::Person(Person::new("Mary", "Smith")),
            ]
        );
    }

    #[test]
    fn test_bare_honorific_does_not_borrow_a_surname() {
        let (owners, invalid) = resolve(SourceProfile::recorder_index(), "MR & MRS JOHN SMITH");
        assert_eq!(owners, vec![Owner::Person(Person::new("John", "Smith").with_prefix("Mrs."))]);
        assert_eq!(
            invalid,
            vec![InvalidOwnerEntry::new("MR", InvalidReason::InsufficientNameParts)]
        );
    }

    #[test]
    fn test_estate_phrase_inside_company_name_survives() {
        let (owners, invalid) =
            resolve(SourceProfile::recorder_index(), "REAL ESTATE OF AMERICA LLC");
        assert!(invalid.is_empty());
        assert_eq!(owners, vec![Owner::Company(Company::new("Real Estate Of America Llc"))]);

        let (owners, _) = resolve(SourceProfile::assessor_roll(), "ESTATE OF SMITH JOHN");
        assert_eq!(owners, vec![Owner::Person(Person::new("John", "Smith"))]);
    }

    #[test]
    fn test_company_is_kept_whole() {
        let (owners, invalid) =
            resolve(SourceProfile::recorder_index(), "SMITH AND JONES PROPERTIES LLC");
        assert!(invalid.is_empty());
        assert_eq!(owners, vec![Owner::Company(Company::new("Smith And Jones Properties Llc"))]);
    }

    #[test]
    fn test_single_letter_surname_rejected() {
        let (owners, invalid) = resolve(SourceProfile::recorder_index(), "MARY A");
        assert!(owners.is_empty());
        assert_eq!(
            invalid,
            vec![InvalidOwnerEntry::new("MARY A", InvalidReason::InsufficientNameParts)]
        );
    }

    #[test]
    fn test_whole_string_company_and_lone_first_name() {
        // a company keyword anywhere keeps the joint string together
        let (owners, invalid) = resolve(SourceProfile::recorder_index(), "JOHN & ACME LLC");
        assert_eq!(owners, vec![Owner::Company(Company::new("John & Acme Llc"))]);
        assert!(invalid.is_empty());

        let (owners, invalid) = resolve(SourceProfile::recorder_index(), "JOHN");
        assert!(owners.is_empty());
        assert_eq!(invalid[0].reason, InvalidReason::InsufficientNameParts);
    }

    #[test]
    fn test_every_candidate_is_accounted_for() {
        let corpus = [
            "SMITH JOHN & MARY",
            "123 MAIN ST",
            "(UNKNOWN)",
            "ACME HOLDINGS LLC",
            "DOE, JANE A",
            "MARY A",
            "J0HN SM1TH",
        ];
        let resolver = resolver(SourceProfile::assessor_roll());

        for raw in corpus {
            let mut invalid = InvalidCollector::new();
            let owners = resolver.resolve_text(raw, &mut invalid);
            assert!(
                !owners.is_empty() || !invalid.is_empty(),
                "{:?} produced neither owners nor invalid entries",
                raw
            );
        }
    }

    #[test]
    fn test_blank_candidates_are_skipped_silently() {
        let (owners, invalid) = resolve(SourceProfile::recorder_index(), "   ");
        assert!(owners.is_empty());
        assert!(invalid.is_empty());

        let (_, invalid) = resolve(SourceProfile::recorder_index(), "(DECEASED)");
        assert_eq!(invalid, vec![InvalidOwnerEntry::new("(DECEASED)", InvalidReason::Empty)]);
    }

    #[test]
    fn test_digit_rule_runs_after_suffix_extraction() {
        let (owners, _) = resolve(SourceProfile::deed_grantee(), "JOHN SMITH 3RD");
        assert_eq!(owners, vec![Owner::Person(Person::new("John", "Smith").with_suffix("III"))]);

        let (owners, _) = resolve(SourceProfile::deed_grantee(), "Parcel 7 Acquisition");
        assert!(owners[0].is_company());
    }

    #[test]
    fn test_custom_classifier_is_used() {
        struct EverythingIsACompany;
        impl OwnerClassifier for EverythingIsACompany {
            fn classify(&self, _text: &str) -> Classification {
                Classification::Company
            }
            fn name(&self) -> &str {
                "everything_company"
            }
        }

        let resolver = resolver(SourceProfile::recorder_index())
            .with_classifier(Box::new(EverythingIsACompany));
        let mut invalid = InvalidCollector::new();
        let owners = resolver.resolve_text("John Smith", &mut invalid);
        assert_eq!(owners, vec![Owner::Company(Company::new("John Smith"))]);
    }

    #[test]
    fn test_resolve_property_builds_timeline() {
        let source = InMemoryPropertySource::new("77")
            .with_transaction(Some("2015-06-30"), Some("JOHN & MARY SMITH"))
            .with_transaction(Some("1999-01-01"), Some("ACME HOLDINGS LLC"))
            .with_transaction(Some("not a date"), Some("Jane Doe"))
            .with_transaction(Some("2001-01-01"), None);

        let report = resolver(SourceProfile::recorder_index()).resolve_property(&source).unwrap();
        let keys: Vec<String> = report.owners_by_date.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["1999-01-01", "2015-06-30", "unknown_date_1", "current"]);

        // no current owners: falls back to the latest dated transaction
        assert_eq!(report.current_owners().len(), 2);
        assert_eq!(
            report.owners_by_date.get(&DateKey::Unknown(1)).unwrap().as_slice(),
            &[Owner::Person(Person::new("Jane", "Doe"))]
        );
    }

    #[test]
    fn test_resolve_property_dedups_current_bucket() {
        let source = InMemoryPropertySource::new("78")
            .with_current_owner("John Smith")
            .with_current_owner("JOHN SMITH & Mary Smith");

        let report = resolver(SourceProfile::recorder_index()).resolve_property(&source).unwrap();
        assert_eq!(report.current_owners().len(), 2);
    }

    #[test]
    fn test_missing_property_id_is_hard_error() {
        let source = InMemoryPropertySource::without_property_id().with_current_owner("ACME LLC");
        let result = resolver(SourceProfile::recorder_index()).resolve_property(&source);
        assert!(matches!(result, Err(ResolverError::MissingPropertyId)));
    }
}
