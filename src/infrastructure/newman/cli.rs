use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::domain::entities::run_result::RawRunResult;
use crate::domain::services::run_executor::{RunError, RunExecutor, RunRequest, RunTarget};
use crate::infrastructure::newman::export::NewmanExport;

const JSON_REPORTER: &str = "json";
const HTML_REPORTER: &str = "htmlextra";
const API_KEY_PARAM: &str = "apikey=";
const REDACTED: &str = "[redacted]";

/// Runs collections by spawning the `newman` CLI and reading its JSON export.
pub struct NewmanCliExecutor {
    bin: String,
    reporters: Vec<String>,
}

impl NewmanCliExecutor {
    pub fn new(bin: impl Into<String>, reporters: Vec<String>) -> Self {
        Self {
            bin: bin.into(),
            reporters,
        }
    }

    /// Command-line arguments for one run, exporting JSON results to `export_path`.
    pub fn command_args(&self, request: &RunRequest, export_path: &Path) -> Vec<String> {
        // Step 1: The JSON reporter is always needed to read results back.
        let mut reporters = self.reporters.clone();
        if !reporters.iter().any(|r| r == JSON_REPORTER) {
            reporters.push(JSON_REPORTER.to_string());
        }
        // Without a report path there is nowhere to write the HTML report.
        if request.report_path.is_none() {
            reporters.retain(|r| r != HTML_REPORTER);
        }

        // Step 2: Target, environment and iteration count.
        let mut args = vec!["run".to_string(), request.collection.as_arg()];
        if let Some(environment) = &request.environment {
            args.push("-e".to_string());
            args.push(environment.as_arg());
        }
        args.push("-n".to_string());
        args.push(request.iterations.max(1).to_string());

        // Step 3: Reporters and their export locations.
        args.push("--reporters".to_string());
        args.push(reporters.join(","));
        args.push("--reporter-json-export".to_string());
        args.push(export_path.to_string_lossy().into_owned());
        if let Some(report_path) = &request.report_path {
            args.push(format!("--reporter-{HTML_REPORTER}-export"));
            args.push(report_path.to_string_lossy().into_owned());
        }

        args
    }
}

#[async_trait]
impl RunExecutor for NewmanCliExecutor {
    #[instrument(skip(self, request), fields(iterations = request.iterations))]
    async fn run(&self, request: &RunRequest) -> Result<RawRunResult, RunError> {
        // Step 1: Reserve a temporary file for the JSON export.
        let export = tempfile::Builder::new()
            .prefix("newman-relay-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| RunError::Spawn(format!("cannot create export file: {e}")))?;

        // Step 2: Make sure the report directory exists.
        let report_dir = request
            .report_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = report_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| RunError::Spawn(format!("cannot create report dir: {e}")))?;
        }

        // Step 3: Run newman to completion. It exits non-zero when assertions fail,
        // so the exit status alone does not decide success.
        let args = self.command_args(request, export.path());
        debug!(bin = %self.bin, "spawning newman");
        let output = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| RunError::Spawn(e.to_string()))?;
        for line in report_lines(&output.stdout) {
            debug!(target: "newman", "{}", redact(request, line));
        }

        // Step 4: Read the export; an empty export means the run never happened.
        let bytes = match tokio::fs::read(export.path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(RunError::Report(format!("cannot read export: {e}"))),
        };
        if bytes.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RunError::Failed(format!(
                "newman exited with {}: {}",
                output.status,
                redact(request, stderr.trim())
            )));
        }

        NewmanExport::from_slice(&bytes)?
            .into_run_result()
            .map_err(|e| match e {
                RunError::Failed(message) => RunError::Failed(redact(request, &message)),
                other => other,
            })
    }
}

/// Non-blank lines of the `cli` reporter output.
fn report_lines(stdout: &[u8]) -> impl Iterator<Item = &str> {
    std::str::from_utf8(stdout)
        .unwrap_or_default()
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
}

/// Remove credentials from runner output before it reaches a log or a chat message.
///
/// Remote targets are swapped for their display form, then any leftover `apikey=`
/// query value is masked.
fn redact(request: &RunRequest, text: &str) -> String {
    let mut text = text.to_string();
    for target in std::iter::once(&request.collection).chain(request.environment.as_ref()) {
        if let RunTarget::Remote(_) = target {
            text = text.replace(&target.as_arg(), &target.to_string());
        }
    }
    mask_query_value(&text, API_KEY_PARAM)
}

fn mask_query_value(text: &str, param: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(param) {
        let value_start = pos + param.len();
        masked.push_str(&rest[..value_start]);
        masked.push_str(REDACTED);
        let value_len = rest[value_start..]
            .find(|c: char| matches!(c, '&' | '"' | '\'' | '#') || c.is_whitespace())
            .unwrap_or(rest.len() - value_start);
        rest = &rest[value_start + value_len..];
    }
    masked.push_str(rest);
    masked
}
