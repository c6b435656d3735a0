use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::run_result::RawRunResult;

/// Something the runner can load: a file on disk or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    File(PathBuf),
    Remote(String),
}

impl RunTarget {
    /// The exact argument handed to the runner.
    pub fn as_arg(&self) -> String {
        match self {
            RunTarget::File(path) => path.to_string_lossy().into_owned(),
            RunTarget::Remote(url) => url.clone(),
        }
    }
}

/// Remote targets may embed credentials in their query string, so it is never displayed.
impl fmt::Display for RunTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunTarget::File(path) => write!(f, "{}", path.display()),
            RunTarget::Remote(url) => {
                let base = url.split_once('?').map_or(url.as_str(), |(base, _)| base);
                f.write_str(base)
            }
        }
    }
}

/// Everything needed to start one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub collection: RunTarget,
    pub environment: Option<RunTarget>,
    pub iterations: u32,
    /// Where the HTML report should be written, when one is wanted.
    pub report_path: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to start newman: {0}")]
    Spawn(String),

    #[error("newman run failed: {0}")]
    Failed(String),

    #[error("unreadable newman report: {0}")]
    Report(String),
}

/// Executes a collection run and returns its structured result.
#[async_trait]
pub trait RunExecutor: Send + Sync {
    async fn run(&self, request: &RunRequest) -> Result<RawRunResult, RunError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_remote_target_with_api_key_when_displayed_should_hide_query() {
        let target = RunTarget::Remote(
            "https://api.getpostman.com/collections/123-abc?apikey=secret".to_string(),
        );

        assert_eq!(
            target.to_string(),
            "https://api.getpostman.com/collections/123-abc"
        );
        assert!(target.as_arg().ends_with("apikey=secret"));
    }

    #[test]
    fn given_file_target_when_converted_should_use_path() {
        let target = RunTarget::File(PathBuf::from("collections/booker.json"));
        assert_eq!(target.as_arg(), "collections/booker.json");
    }
}
