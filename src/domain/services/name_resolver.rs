use async_trait::async_trait;
use thiserror::Error;

use crate::domain::services::run_executor::RunTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Collection,
    Environment,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Collection => "Collection",
            ResourceKind::Environment => "Environment",
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{} `{name}` was not found", .kind.as_str())]
    NotFound { kind: ResourceKind, name: String },

    #[error("{} lookup failed: {message}", .kind.as_str())]
    Lookup { kind: ResourceKind, message: String },
}

impl ResolveError {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResolveError::NotFound { kind, .. } | ResolveError::Lookup { kind, .. } => *kind,
        }
    }
}

/// Maps a display name typed in the chat command to something the runner can load.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, kind: ResourceKind, name: &str) -> Result<RunTarget, ResolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_not_found_when_displayed_should_name_resource_kind() {
        let err = ResolveError::NotFound {
            kind: ResourceKind::Collection,
            name: "Bookings".to_string(),
        };

        assert_eq!(err.to_string(), "Collection `Bookings` was not found");
        assert_eq!(err.kind(), ResourceKind::Collection);
    }
}
