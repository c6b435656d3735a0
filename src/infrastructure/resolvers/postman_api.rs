use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::services::name_resolver::{NameResolver, ResolveError, ResourceKind};
use crate::domain::services::run_executor::RunTarget;

#[derive(Debug, Deserialize)]
struct CollectionList {
    #[serde(default)]
    collections: Vec<RemoteResource>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentList {
    #[serde(default)]
    environments: Vec<RemoteResource>,
}

#[derive(Debug, Deserialize)]
struct RemoteResource {
    name: String,
    uid: String,
}

/// Resolves names against the Postman API listing endpoints.
///
/// Newman can run a collection straight from its API URL, so the resolved target
/// is the resource URL with the API key attached as a query parameter.
pub struct PostmanApiResolver {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostmanApiResolver {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn segment(kind: ResourceKind) -> &'static str {
        match kind {
            ResourceKind::Collection => "collections",
            ResourceKind::Environment => "environments",
        }
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<RemoteResource>, ResolveError> {
        let lookup = |message: String| ResolveError::Lookup { kind, message };
        let url = format!("{}/{}", self.base_url, Self::segment(kind));

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| lookup(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(lookup(format!("postman api answered {status}")));
        }

        let resources = match kind {
            ResourceKind::Collection => response
                .json::<CollectionList>()
                .await
                .map(|l| l.collections),
            ResourceKind::Environment => response
                .json::<EnvironmentList>()
                .await
                .map(|l| l.environments),
        };
        resources.map_err(|e| lookup(e.to_string()))
    }
}

#[async_trait]
impl NameResolver for PostmanApiResolver {
    async fn resolve(&self, kind: ResourceKind, name: &str) -> Result<RunTarget, ResolveError> {
        // Step 1: Fetch the workspace listing.
        let resources = self.list(kind).await?;
        debug!(kind = kind.as_str(), count = resources.len(), "postman listing fetched");

        // Step 2: Match by name, ignoring case.
        let wanted = name.trim();
        let found = resources
            .into_iter()
            .find(|r| r.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ResolveError::NotFound {
                kind,
                name: name.to_string(),
            })?;

        // Step 3: Address the resource by uid.
        Ok(RunTarget::Remote(format!(
            "{}/{}/{}?apikey={}",
            self.base_url,
            Self::segment(kind),
            found.uid,
            self.api_key
        )))
    }
}
