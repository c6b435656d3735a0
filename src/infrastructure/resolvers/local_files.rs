use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::services::name_resolver::{NameResolver, ResolveError, ResourceKind};
use crate::domain::services::run_executor::RunTarget;

/// Resolves names to exported collection/environment JSON files on disk.
///
/// A file matches when its stem, compared case-insensitively with spaces treated as
/// underscores, equals the name or starts with the name followed by a dot
/// (`Booker.postman_collection.json` matches `booker`).
pub struct LocalFileResolver {
    collections_dir: PathBuf,
    environments_dir: PathBuf,
}

impl LocalFileResolver {
    pub fn new(collections_dir: PathBuf, environments_dir: PathBuf) -> Self {
        Self {
            collections_dir,
            environments_dir,
        }
    }

    fn dir_for(&self, kind: ResourceKind) -> &Path {
        match kind {
            ResourceKind::Collection => &self.collections_dir,
            ResourceKind::Environment => &self.environments_dir,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

fn stem_matches(file_name: &str, wanted: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".json") else {
        return false;
    };
    let stem = normalize(stem);
    stem == wanted
        || stem
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with('.'))
}

#[async_trait]
impl NameResolver for LocalFileResolver {
    async fn resolve(&self, kind: ResourceKind, name: &str) -> Result<RunTarget, ResolveError> {
        let not_found = || ResolveError::NotFound {
            kind,
            name: name.to_string(),
        };

        // Step 1: Names never address paths outside the configured directory.
        let wanted = normalize(name);
        if wanted.is_empty() || wanted.contains(['/', '\\']) || wanted.contains("..") {
            return Err(not_found());
        }

        // Step 2: Scan the directory for a matching file, in a stable order.
        let dir = self.dir_for(kind);
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| ResolveError::Lookup {
                kind,
                message: format!("cannot read {}: {e}", dir.display()),
            })?;
        let mut matches = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| ResolveError::Lookup {
            kind,
            message: e.to_string(),
        })? {
            let file_name = entry.file_name();
            if stem_matches(&file_name.to_string_lossy(), &wanted) {
                matches.push(entry.path());
            }
        }
        matches.sort();

        // Step 3: Return the first match.
        matches
            .into_iter()
            .next()
            .map(RunTarget::File)
            .ok_or_else(not_found)
    }
}
