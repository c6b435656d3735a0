use async_trait::async_trait;
use thiserror::Error;

use crate::domain::services::notification::NotificationPayload;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(String),

    #[error("notification rejected with status {0}")]
    Rejected(u16),
}

/// Delivers a payload to the callback URL supplied with a command.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(
        &self,
        response_url: &str,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError>;
}
