use std::net::SocketAddr;

use crate::error::DispatchError;
use crate::http::request::Method;
use crate::http::response::StatusCode;

/// What the dispatcher knows about a request when it reports on it.
#[derive(Debug, Clone, Default)]
pub struct RequestSummary {
    pub peer: Option<SocketAddr>,
    pub method: Option<Method>,
    pub path: Option<String>,
}

/// Observability boundary for dispatch outcomes.
///
/// Each connection produces exactly one call: `handled` when a response was
/// produced without failure, `failed` otherwise. For logical failures
/// `status` is the error status that was sent. It is `None` for transport
/// faults and for logical failures whose error response could not be written.
pub trait DispatchObserver: Send + Sync {
    fn handled(&self, request: &RequestSummary, status: StatusCode);

    fn failed(&self, request: &RequestSummary, error: &DispatchError, status: Option<StatusCode>);
}

/// Logs outcomes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn handled(&self, request: &RequestSummary, status: StatusCode) {
        tracing::info!(
            peer = ?request.peer,
            method = %display_method(request),
            path = request.path.as_deref().unwrap_or("-"),
            status = status.as_u16(),
            "Handled request"
        );
    }

    fn failed(&self, request: &RequestSummary, error: &DispatchError, status: Option<StatusCode>) {
        let message = failure_message(error, status);
        if error.is_transport() {
            tracing::info!(
                peer = ?request.peer,
                method = %display_method(request),
                path = request.path.as_deref().unwrap_or("-"),
                error = %error,
                "{message}"
            );
        } else {
            tracing::warn!(
                peer = ?request.peer,
                method = %display_method(request),
                path = request.path.as_deref().unwrap_or("-"),
                status = status.map(|s| s.as_u16()),
                kind = error.kind(),
                error = %error,
                "{message}"
            );
        }
    }
}

/// Log line for a failure. The error decides transport vs. logical; a missing
/// status on a logical failure means its error response never went out.
fn failure_message(error: &DispatchError, status: Option<StatusCode>) -> &'static str {
    match (error.is_transport(), status) {
        (true, _) => "Transport fault while handling request",
        (false, Some(_)) => "Request failed",
        (false, None) => "Request failed and the error response was not delivered",
    }
}

fn display_method(request: &RequestSummary) -> &str {
    request.method.as_ref().map(Method::as_str).unwrap_or("-")
}
