// Newman JSON reporter export (`--reporter-json-export`) decoding.

use serde::Deserialize;

use crate::domain::entities::run_result::{RawRunResult, RunFailure, SkippedAssertion};
use crate::domain::services::run_executor::RunError;
use crate::domain::value_objects::timestamps::Timestamp;

#[derive(Debug, Deserialize)]
pub struct NewmanExport {
    #[serde(default)]
    pub collection: Option<ExportCollection>,
    #[serde(default)]
    pub environment: Option<ExportEnvironment>,
    pub run: ExportRun,
}

#[derive(Debug, Deserialize)]
pub struct ExportCollection {
    #[serde(default)]
    pub info: Option<ExportInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ExportInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportEnvironment {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRun {
    pub stats: ExportStats,
    pub timings: ExportTimings,
    #[serde(default)]
    pub failures: Vec<ExportFailure>,
    #[serde(default)]
    pub executions: Vec<ExportExecution>,
    /// Set when the run itself aborted (for example an unreadable collection).
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ExportStats {
    #[serde(default)]
    pub iterations: ExportCount,
    #[serde(default)]
    pub requests: ExportCount,
    #[serde(default)]
    pub assertions: ExportCount,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportCount {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub failed: u64,
}

/// Epoch milliseconds.
#[derive(Debug, Deserialize)]
pub struct ExportTimings {
    pub started: i64,
    pub completed: i64,
    #[serde(rename = "responseAverage", default)]
    pub response_average: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExportFailure {
    pub error: ExportFailureError,
    #[serde(default)]
    pub source: Option<ExportNamed>,
}

#[derive(Debug, Deserialize)]
pub struct ExportFailureError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub test: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportNamed {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportExecution {
    #[serde(default)]
    pub item: Option<ExportNamed>,
    #[serde(default)]
    pub assertions: Vec<ExportAssertion>,
}

#[derive(Debug, Deserialize)]
pub struct ExportAssertion {
    #[serde(default)]
    pub assertion: String,
    #[serde(default)]
    pub skipped: bool,
}

impl NewmanExport {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RunError> {
        serde_json::from_slice(bytes).map_err(|e| RunError::Report(e.to_string()))
    }

    /// Convert the export into the runner-agnostic result.
    pub fn into_run_result(self) -> Result<RawRunResult, RunError> {
        let run = self.run;

        // Step 1: A run-level error means there is nothing to summarize.
        if let Some(error) = run.error.filter(|e| !e.is_null()) {
            return Err(RunError::Failed(describe_run_error(&error)));
        }

        // Step 2: Convert timings.
        let started_at = Timestamp::from_unix_millis(run.timings.started)
            .ok_or_else(|| RunError::Report("invalid run start time".to_string()))?;
        let completed_at = Timestamp::from_unix_millis(run.timings.completed)
            .ok_or_else(|| RunError::Report("invalid run completion time".to_string()))?;

        // Step 3: Flatten failures in order of occurrence.
        let failures = run
            .failures
            .into_iter()
            .map(|f| RunFailure {
                error_name: f.error.name.unwrap_or_else(|| "Error".to_string()),
                error_test: f.error.test.unwrap_or_default(),
                error_message: f.error.message.unwrap_or_default(),
                source_name: f.source.and_then(|s| s.name).unwrap_or_default(),
            })
            .collect();

        // Step 4: Collect skipped assertions from every execution.
        let skipped: Vec<SkippedAssertion> = run
            .executions
            .into_iter()
            .flat_map(|execution| {
                let item_name = execution
                    .item
                    .and_then(|i| i.name)
                    .unwrap_or_default();
                execution
                    .assertions
                    .into_iter()
                    .filter(|a| a.skipped)
                    .map(move |a| SkippedAssertion {
                        item_name: item_name.clone(),
                        assertion_description: a.assertion,
                    })
            })
            .collect();

        Ok(RawRunResult {
            collection_name: self.collection.and_then(|c| c.info).and_then(|i| i.name),
            environment_name: self.environment.and_then(|e| e.name),
            iteration_count: u32::try_from(run.stats.iterations.total)
                .unwrap_or(u32::MAX)
                .max(1),
            started_at,
            completed_at,
            average_response_time_ms: run.timings.response_average,
            request_count: run.stats.requests.total,
            assertions_total: run.stats.assertions.total,
            assertions_failed: run.stats.assertions.failed,
            failures,
            skipped: (!skipped.is_empty()).then_some(skipped),
        })
    }
}

fn describe_run_error(error: &serde_json::Value) -> String {
    error
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}
