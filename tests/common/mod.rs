#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::extract::Json;
use axum::http::StatusCode;
use axum::routing::post;
use newman_relay::config::{
    Notifications, Observability, Postman, ResolverKind, Runner, Server, Settings,
};
use newman_relay::domain::entities::run_result::{RawRunResult, RunFailure};
use newman_relay::domain::services::run_executor::{RunError, RunExecutor, RunRequest};
use newman_relay::domain::value_objects::timestamps::Timestamp;
use newman_relay::domain::workflows::command_parser::CommandConvention;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn settings(root: &Path) -> Settings {
    Settings {
        server: Server {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        runner: Runner {
            newman_bin: "newman".to_string(),
            collections_dir: root.join("collections"),
            environments_dir: root.join("environments"),
            reports_dir: root.join("reports"),
            report_file: "htmlResults.html".to_string(),
            reporters: vec!["cli".to_string(), "json".to_string(), "htmlextra".to_string()],
            default_iterations: 1,
            default_collection: None,
            convention: CommandConvention::Separated,
            resolver: ResolverKind::Local,
        },
        postman: Postman {
            api_base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
        },
        notifications: Notifications {
            request_timeout_ms: 2_000,
        },
        observability: Observability {
            service_name: "newman-relay-test".to_string(),
            json_logs: false,
            enable_metrics: false,
        },
        public_base_url: Some("http://relay.test".to_string()),
    }
}

/// Workspace with one collection and one environment export on disk.
pub fn workspace() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("collections")).unwrap();
    std::fs::create_dir_all(root.path().join("environments")).unwrap();
    std::fs::create_dir_all(root.path().join("reports")).unwrap();
    std::fs::write(
        root.path().join("collections/Restful_Booker.postman_collection.json"),
        "{}",
    )
    .unwrap();
    std::fs::write(root.path().join("environments/Staging.json"), "{}").unwrap();
    root
}

pub fn run_result(assertions_total: u64, failures: Vec<RunFailure>) -> RawRunResult {
    RawRunResult {
        collection_name: Some("Restful Booker".to_string()),
        environment_name: Some("Staging".to_string()),
        iteration_count: 1,
        started_at: Timestamp::from_unix_millis(1_700_000_000_000).unwrap(),
        completed_at: Timestamp::from_unix_millis(1_700_000_092_400).unwrap(),
        average_response_time_ms: 48.0,
        request_count: 12,
        assertions_total,
        assertions_failed: failures.len() as u64,
        failures,
        skipped: None,
    }
}

pub fn failure(source: &str, test: &str, message: &str) -> RunFailure {
    RunFailure {
        error_name: "AssertionError".to_string(),
        error_test: test.to_string(),
        error_message: message.to_string(),
        source_name: source.to_string(),
    }
}

/// Records requests and answers with a canned result.
pub struct FakeExecutor {
    pub requests: Mutex<Vec<RunRequest>>,
    outcome: Result<RawRunResult, String>,
}

impl FakeExecutor {
    pub fn returning(result: RawRunResult) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Ok(result),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            outcome: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl RunExecutor for FakeExecutor {
    async fn run(&self, request: &RunRequest) -> Result<RawRunResult, RunError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome.clone().map_err(RunError::Failed)
    }
}

/// A local HTTP server standing in for the chat platform's response URL.
pub struct CaptureServer {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl CaptureServer {
    pub async fn spawn() -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let app = Router::new().route(
            "/hook",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(body);
                    StatusCode::OK
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            url: format!("http://{addr}/hook"),
            received,
        }
    }

    /// Wait until at least `count` payloads arrived, then return them.
    pub async fn wait_for(&self, count: usize) -> Vec<Value> {
        for _ in 0..300 {
            {
                let received = self.received.lock().unwrap();
                if received.len() >= count {
                    return received.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} callback payloads");
    }

    pub fn titles(payloads: &[Value]) -> Vec<String> {
        payloads
            .iter()
            .map(|p| p["attachments"][0]["title"].as_str().unwrap_or("").to_string())
            .collect()
    }
}

static NULL: Value = Value::Null;

/// Look up a summary field value by its title.
pub fn field<'a>(payload: &'a Value, title: &str) -> &'a Value {
    payload["attachments"][0]["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["title"] == title))
        .map(|f| &f["value"])
        .unwrap_or(&NULL)
}
