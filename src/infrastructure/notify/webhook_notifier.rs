use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::services::notification::NotificationPayload;
use crate::domain::services::notifier::{Notifier, NotifyError};

/// Posts notification payloads as JSON to the command's response URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(request_timeout_ms: u64) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(
        &self,
        response_url: &str,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError> {
        // Step 1: Send the payload.
        let response = self
            .client
            .post(response_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        // Step 2: Anything outside 2xx counts as a rejected delivery.
        let status = response.status();
        debug!(status = status.as_u16(), "notification delivered");
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}
