use serde::{Deserialize, Serialize};

/// Slash-command form body. Unknown fields sent by the chat platform are ignored.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub text: Option<String>,
    pub response_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommandAcceptedResponse {
    pub run_id: String,
}
