// Owner resolution pipeline: per-property orchestration, batch runs, and the processing stages

pub mod batch;
pub mod processing;
pub mod resolver;

pub use batch::{collect_inputs, BatchOutcome, BatchResolver};
pub use resolver::{OwnerResolver, ResolutionStats, ResolvedOwners};
