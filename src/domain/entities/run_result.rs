use crate::domain::value_objects::timestamps::Timestamp;

/// A failed assertion or request error recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub error_name: String,
    pub error_test: String,
    pub error_message: String,
    /// The request (collection item) the failure originated from.
    pub source_name: String,
}

/// An assertion the runner skipped instead of evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAssertion {
    pub item_name: String,
    pub assertion_description: String,
}

/// Structured output of one completed collection run.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRunResult {
    pub collection_name: Option<String>,
    pub environment_name: Option<String>,
    pub iteration_count: u32,
    pub started_at: Timestamp,
    pub completed_at: Timestamp,
    pub average_response_time_ms: f64,
    pub request_count: u64,
    pub assertions_total: u64,
    pub assertions_failed: u64,
    /// In order of occurrence.
    pub failures: Vec<RunFailure>,
    pub skipped: Option<Vec<SkippedAssertion>>,
}

impl RawRunResult {
    /// Wall-clock length of the run; zero when the runner reported inverted timings.
    pub fn elapsed(&self) -> time::Duration {
        self.started_at.elapsed_until(self.completed_at)
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.as_ref().map_or(0, Vec::len)
    }
}
