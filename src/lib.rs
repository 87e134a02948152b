pub mod apis;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod sources;

pub use domain::{Company, InvalidOwnerEntry, InvalidReason, Owner, Person};
pub use error::{ErrorReport, ResolverError, Result};
pub use output::PropertyReport;
pub use pipeline::OwnerResolver;
