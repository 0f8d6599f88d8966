use std::path::PathBuf;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug)]
pub enum PipelineStage {
    Opening,
    Correcting,
    Assembling,
    Writing,
    Cleanup,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opening => write!(f, "Opening source"),
            Self::Correcting => write!(f, "Correcting planes"),
            Self::Assembling => write!(f, "Assembling hyperstack"),
            Self::Writing => write!(f, "Writing output"),
            Self::Cleanup => write!(f, "Cleaning up"),
        }
    }
}

/// Thread-safe progress reporting for the batch driver.
///
/// Implementors can drive progress bars or logging. All methods have
/// default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// in this stage (e.g., plane count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}

    /// A new acquisition unit is being processed.
    fn begin_unit(&self, _name: &str, _index: usize, _total: usize) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// One successfully processed unit and the files it produced.
#[derive(Clone, Debug)]
pub struct UnitReport {
    pub name: String,
    pub outputs: Vec<PathBuf>,
}

/// One unit that was skipped, with the reason it failed.
#[derive(Clone, Debug)]
pub struct SkippedUnit {
    pub name: String,
    pub reason: String,
}

/// Outcome of a whole batch. Skipped units are not errors at the batch
/// level; the driver reports them and moves on.
#[derive(Clone, Debug, Default)]
pub struct BatchSummary {
    pub processed: Vec<UnitReport>,
    pub skipped: Vec<SkippedUnit>,
}

impl BatchSummary {
    pub fn outputs(&self) -> impl Iterator<Item = &PathBuf> {
        self.processed.iter().flat_map(|u| u.outputs.iter())
    }
}
