pub mod config;
mod driver;
mod types;

pub use driver::{output_file_name, run_batch};
pub use types::{BatchSummary, NoOpReporter, PipelineStage, ProgressReporter, SkippedUnit, UnitReport};
