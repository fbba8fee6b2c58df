//! Resource provider capability and first-match resolution.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::DispatchError;
use crate::http::request::Request;
use crate::http::response::Response;

/// Boxed, sendable future returned by provider loads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can answer requests for a set of paths.
///
/// Providers are consulted in configured order and the first one whose
/// [`can_load`](ResourceProvider::can_load) returns true is authoritative.
pub trait ResourceProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this provider serves `path`. Must not have side effects.
    fn can_load(&self, path: &str) -> bool;

    /// Renders `path` into `response`.
    fn load<'a>(
        &'a self,
        path: &'a str,
        request: &'a Request,
        response: &'a mut Response,
    ) -> BoxFuture<'a, Result<(), DispatchError>>;
}

/// First provider in `providers` that claims `path`.
pub fn resolve<'p>(
    providers: &'p [Arc<dyn ResourceProvider>],
    path: &str,
) -> Option<&'p Arc<dyn ResourceProvider>> {
    providers.iter().find(|p| p.can_load(path))
}
