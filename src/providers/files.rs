use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::dispatch::provider::{BoxFuture, ResourceProvider};
use crate::error::DispatchError;
use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Serves regular files below a document root.
#[derive(Debug, Clone)]
pub struct FileSystemProvider {
    root: PathBuf,
}

impl FileSystemProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Maps a URL path onto the root. Only normal components are accepted.
    fn map_path(&self, url_path: &str) -> Option<PathBuf> {
        let mut pb = self.root.clone();
        for comp in Path::new(url_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    async fn read(&self, path: &str, response: &mut Response) -> Result<(), DispatchError> {
        let file = self.map_path(path).ok_or_else(|| DispatchError::NotFound {
            path: path.to_string(),
        })?;

        let (bytes, metadata) = match read_file(&file).await {
            Ok(found) => found,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DispatchError::NotFound {
                    path: path.to_string(),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(DispatchError::AccessDenied {
                    path: path.to_string(),
                });
            }
            Err(e) => {
                return Err(DispatchError::Unclassified(
                    anyhow::Error::new(e)
                        .context(format!("Failed to read {}", file.display())),
                ));
            }
        };

        response.set_status(StatusCode::Ok);
        response.set_header("Content-Type", mime::content_type(&file));
        if let Ok(modified) = metadata.modified() {
            response.set_header("Last-Modified", httpdate::fmt_http_date(modified));
        }
        response.set_body(bytes);

        Ok(())
    }
}

async fn read_file(file: &Path) -> io::Result<(Vec<u8>, std::fs::Metadata)> {
    let metadata = tokio::fs::metadata(file).await?;
    let bytes = tokio::fs::read(file).await?;
    Ok((bytes, metadata))
}

impl ResourceProvider for FileSystemProvider {
    fn name(&self) -> &str {
        "files"
    }

    /// Stats the mapped file with blocking `std::fs::metadata`, since
    /// [`ResourceProvider::can_load`] is synchronous. This runs on the runtime
    /// worker once per request and once per directory index candidate.
    fn can_load(&self, path: &str) -> bool {
        self.map_path(path)
            .and_then(|p| std::fs::metadata(p).ok())
            .is_some_and(|m| m.is_file())
    }

    fn load<'a>(
        &'a self,
        path: &'a str,
        _request: &'a Request,
        response: &'a mut Response,
    ) -> BoxFuture<'a, Result<(), DispatchError>> {
        Box::pin(self.read(path, response))
    }
}

/// Reads an error document at startup.
pub fn read_document(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read error document {}", path.display()))
}
