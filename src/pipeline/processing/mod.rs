// Owner resolution stages: normalize, split, classify, parse, validate, dedup, timeline

pub mod classify;
pub mod dedup;
pub mod invalid;
pub mod normalize;
pub mod person;
pub mod split;
pub mod tables;
pub mod timeline;
pub mod validate;

pub use classify::{Classification, KeywordClassifier, OwnerClassifier};
pub use dedup::{identity_key, OwnerSet};
pub use invalid::InvalidCollector;
pub use normalize::{normalize_text, title_case};
pub use person::{NameOrder, ParsedName, PersonNameParser};
pub use split::{split_joint_owners, SplitRules};
pub use tables::{ResolverTables, DEFAULT_TABLES};
pub use timeline::{DateKey, OwnershipTimeline, TimelineAssembler, DEFAULT_DATE_FORMATS};
pub use validate::validate_person;
