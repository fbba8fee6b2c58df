use std::sync::Arc;

use crate::dispatch::provider::{resolve, ResourceProvider};
use crate::http::path::normalized_directory_path;

/// A provider paired with the index path it claimed.
///
/// Produced during one dispatch and dropped with it.
#[derive(Clone)]
pub struct DirectoryIndexDescriptor {
    pub provider: Arc<dyn ResourceProvider>,
    pub index_path: String,
}

impl std::fmt::Debug for DirectoryIndexDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryIndexDescriptor")
            .field("provider", &self.provider.name())
            .field("index_path", &self.index_path)
            .finish()
    }
}

/// Finds the first servable index file below `path`.
///
/// `path` is treated as a directory whether or not it ends in `/`. Index
/// names are tried in order and each candidate goes through ordinary
/// provider resolution.
pub fn resolve_index(
    providers: &[Arc<dyn ResourceProvider>],
    index_names: &[String],
    path: &str,
) -> Option<DirectoryIndexDescriptor> {
    let directory = normalized_directory_path(path);

    index_names.iter().find_map(|name| {
        let candidate = format!("{directory}{name}");
        resolve(providers, &candidate).map(|provider| DirectoryIndexDescriptor {
            provider: Arc::clone(provider),
            index_path: candidate,
        })
    })
}
