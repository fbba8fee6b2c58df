//! Failure taxonomy for connection dispatch.
//!
//! Logical failures are translated into an HTTP error response by the
//! [`ErrorHandlerResolver`](crate::dispatch::errors::ErrorHandlerResolver).
//! Transport faults never are: the peer is unreachable, so the connection is
//! only logged and released.

use crate::http::request::Method;

/// Errors produced while turning raw bytes into a [`Request`](crate::http::request::Request).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    Incomplete,
}

/// A failure raised while dispatching one request.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The requested path contains a disallowed sequence.
    #[error("access denied for path {path}")]
    AccessDenied { path: String },

    /// The method is not in the configured supported set.
    #[error("method {method} not allowed")]
    MethodNotAllowed { method: Method },

    /// Neither a provider nor a directory index resolved.
    #[error("no resource found for {path}")]
    NotFound { path: String },

    /// The request could not be parsed but the stream is still writable.
    #[error("malformed request: {0:?}")]
    BadRequest(ParseError),

    /// The connection itself became unusable.
    #[error("transport fault: {0}")]
    Transport(#[from] std::io::Error),

    /// Anything else, usually raised by a provider while loading.
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl DispatchError {
    /// Whether this failure means no response can reach the peer.
    pub fn is_transport(&self) -> bool {
        matches!(self, DispatchError::Transport(_))
    }

    /// Short kind label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::AccessDenied { .. } => "access_denied",
            DispatchError::MethodNotAllowed { .. } => "method_not_allowed",
            DispatchError::NotFound { .. } => "not_found",
            DispatchError::BadRequest(_) => "bad_request",
            DispatchError::Transport(_) => "transport",
            DispatchError::Unclassified(_) => "unclassified",
        }
    }
}
