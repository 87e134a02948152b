use owner_resolver::domain::{Company, InvalidOwnerEntry, InvalidReason, Owner, Person};
use owner_resolver::pipeline::processing::{
    identity_key, normalize_text, DateKey, InvalidCollector, OwnerSet, OwnershipTimeline,
    DEFAULT_TABLES,
};
use owner_resolver::pipeline::OwnerResolver;
use owner_resolver::sources::{SourceProfile, SourceRegistry};
use owner_resolver::constants;

fn default_resolver() -> OwnerResolver {
    let registry = SourceRegistry::new();
    let profile = registry.get(constants::DEFAULT_SOURCE).unwrap().clone();
    OwnerResolver::new(DEFAULT_TABLES.clone(), profile)
}

fn resolve(raw: &str) -> (Vec<Owner>, Vec<InvalidOwnerEntry>) {
    let mut invalid = InvalidCollector::new();
    let owners = default_resolver().resolve_text(raw, &mut invalid);
    (owners, invalid.into_entries())
}

#[test]
fn test_normalization_is_idempotent() {
    let corpus = [
        "SMITH JOHN A & MARY (H/W)",
        "C/O ESTATE OF JANE DOE",
        "  JONES ROBERT,, TRUSTEE ;; ",
        "[MAILING] ACME HOLDINGS L.L.C. (A DELAWARE LLC",
        "DOE JANE ET AL & & ",
        "\"O'BRIEN\" *PATRICK* / O'BRIEN MAUREEN",
        "AND",
        "",
    ];

    for raw in corpus {
        let once = normalize_text(raw, &DEFAULT_TABLES);
        let twice = normalize_text(&once, &DEFAULT_TABLES);
        assert_eq!(once, twice, "normalization not idempotent for {:?}", raw);
    }
}

#[test]
fn test_classification_totality() {
    let corpus = [
        "JOHN & MARY SMITH",
        "SMITH AND JONES PROPERTIES LLC",
        "DOE, JANE A",
        "MARY A",
        "PO BOX 1234",
        "(ESTATE)",
        "???",
        "John Smith 4",
        "Jane",
    ];
    let resolver = default_resolver();

    for raw in corpus {
        let mut invalid = InvalidCollector::new();
        let owners = resolver.resolve_text(raw, &mut invalid);
        assert!(
            !owners.is_empty() || !invalid.is_empty(),
            "{:?} was dropped without a trace",
            raw
        );
    }
}

#[test]
fn test_dedup_keeps_first_seen_duplicate() {
    let owners: Vec<Owner> = vec![
        Person::new("John", "Smith").with_suffix("Jr.").into(),
        Company::new("Acme Llc").into(),
        Person::new("JOHN", "smith").into(),
        Company::new("ACME  LLC").into(),
    ];

    let set: OwnerSet = owners.into_iter().collect();
    assert_eq!(set.len(), 2);
    assert_eq!(
        set.as_slice()[0],
        Owner::Person(Person::new("John", "Smith").with_suffix("Jr."))
    );
    assert_eq!(identity_key(&set.as_slice()[1]), "acme llc");
}

#[test]
fn test_timeline_ordering() {
    let mut timeline = OwnershipTimeline::new();
    for key in ["2020-05-01", "unknown_date_1", "current", "1999-01-01"] {
        timeline.insert(DateKey::parse_key(key).unwrap(), Vec::<Owner>::new());
    }

    let keys: Vec<String> = timeline.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["1999-01-01", "2020-05-01", "unknown_date_1", "current"]);
}

#[test]
fn test_joint_owner_surname_inference() {
    let (owners, invalid) = resolve("JOHN & MARY SMITH");
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
fn test_company_precedence() {
    let (owners, invalid) = resolve("SMITH AND JONES PROPERTIES LLC");
    assert!(invalid.is_empty());
    assert_eq!(owners, vec![Owner::Company(Company::new("Smith And Jones Properties Llc"))]);
}

#[test]
fn test_comma_form() {
    let (owners, _) = resolve("DOE, JANE A");
    assert_eq!(owners, vec![Owner::Person(Person::new("Jane", "Doe").with_middle("A"))]);
}

#[test]
fn test_suffix_normalization() {
    let (owners, _) = resolve("SMITH JR, JOHN");
    assert_eq!(owners, vec![Owner::Person(Person::new("John", "Smith").with_suffix("Jr."))]);
}

#[test]
fn test_single_letter_surname_rejection() {
    let (owners, invalid) = resolve("MARY A");
    assert!(owners.is_empty());
    assert_eq!(
        invalid,
        vec![InvalidOwnerEntry::new("MARY A", InvalidReason::InsufficientNameParts)]
    );
}

#[test]
fn test_per_source_orders_are_preserved() {
    let mut invalid = InvalidCollector::new();

    let roll = OwnerResolver::new(DEFAULT_TABLES.clone(), SourceProfile::assessor_roll());
    assert_eq!(
        roll.resolve_text("SMITH JOHN", &mut invalid),
        vec![Owner::Person(Person::new("John", "Smith"))]
    );

    let recorder = OwnerResolver::new(DEFAULT_TABLES.clone(), SourceProfile::recorder_index());
    assert_eq!(
        recorder.resolve_text("SMITH JOHN", &mut invalid),
        vec![Owner::Person(Person::new("Smith", "John"))]
    );

    let conservative = OwnerResolver::new(DEFAULT_TABLES.clone(), SourceProfile::conservative());
    assert!(conservative.resolve_text("SMITH JOHN", &mut invalid).is_empty());
    assert_eq!(invalid.entries()[0].reason, InvalidReason::AmbiguousNameOrder);
}
