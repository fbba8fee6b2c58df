//! Per-connection request lifecycle.
//!
//! ```text
//!   Response created ─► read_request ─► path check ─► method check
//!        ─► default headers ─► provider for path?
//!              yes ─► load
//!              no  ─► directory index?
//!                       none            ─► NotFound
//!                       path ends in /  ─► load index
//!                       otherwise       ─► 301 to path + "/"
//! ```
//!
//! Logical failures are rendered by the error handler resolver and reported
//! to the observer. Transport faults are only reported. The connection is
//! closed on every path.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::ServerConfig;
use crate::dispatch::errors::ErrorHandlerResolver;
use crate::dispatch::index::resolve_index;
use crate::dispatch::observer::{DispatchObserver, RequestSummary};
use crate::dispatch::provider::resolve;
use crate::error::DispatchError;
use crate::http::connection::Connection;
use crate::http::path::{has_illegal_characters, is_directory_path};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};

/// Runs the lifecycle of accepted connections against a shared configuration.
///
/// Cheap to clone; every clone reads the same [`ServerConfig`].
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<ServerConfig>,
    errors: Arc<dyn ErrorHandlerResolver>,
    observer: Arc<dyn DispatchObserver>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        config: Arc<ServerConfig>,
        errors: Arc<dyn ErrorHandlerResolver>,
        observer: Arc<dyn DispatchObserver>,
    ) -> Self {
        Self {
            config,
            errors,
            observer,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handles one connection from first byte to close.
    ///
    /// Returns the failure, if any, after it was rendered and reported.
    pub async fn handle<S>(
        &self,
        mut connection: Connection<S>,
        peer: Option<SocketAddr>,
    ) -> Result<(), DispatchError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let mut summary = RequestSummary {
            peer,
            ..RequestSummary::default()
        };

        // Created before parsing so a malformed request can still be answered.
        let mut response = Response::default();

        let outcome = self
            .serve(&mut connection, &mut response, &mut summary)
            .await;

        let result = match outcome {
            Ok(()) => match connection.send(&mut response).await {
                Ok(()) => {
                    self.observer.handled(&summary, response.status);
                    Ok(())
                }
                Err(e) => {
                    let err = DispatchError::Transport(e);
                    self.observer.failed(&summary, &err, None);
                    Err(err)
                }
            },
            Err(err) if err.is_transport() => {
                self.observer.failed(&summary, &err, None);
                Err(err)
            }
            Err(err) => {
                let status = self.render_failure(&mut connection, &mut response, &err).await;
                self.observer.failed(&summary, &err, status);
                Err(err)
            }
        };

        connection.close().await;
        result
    }

    async fn serve<S>(
        &self,
        connection: &mut Connection<S>,
        response: &mut Response,
        summary: &mut RequestSummary,
    ) -> Result<(), DispatchError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let request = connection.read_request().await?;
        summary.method = Some(request.method.clone());
        summary.path = Some(request.path.clone());

        tracing::debug!(method = %request.method, path = %request.path, "Handling request");

        if request.method == Method::HEAD {
            response.set_include_body(false);
        }

        self.dispatch(&request, response).await
    }

    /// Validates and routes an already parsed request.
    pub async fn dispatch(
        &self,
        request: &Request,
        response: &mut Response,
    ) -> Result<(), DispatchError> {
        let path = request.path.as_str();

        if has_illegal_characters(path) {
            return Err(DispatchError::AccessDenied {
                path: path.to_string(),
            });
        }

        if !self.config.is_method_supported(&request.method) {
            return Err(DispatchError::MethodNotAllowed {
                method: request.method.clone(),
            });
        }

        self.set_default_headers(request, response);

        let providers = self.config.providers();
        if let Some(provider) = resolve(providers, path) {
            tracing::trace!(provider = provider.name(), path, "Resolved provider");
            return provider.load(path, request, response).await;
        }

        let index = resolve_index(providers, self.config.directory_index(), path).ok_or_else(
            || DispatchError::NotFound {
                path: path.to_string(),
            },
        )?;

        if is_directory_path(path) {
            tracing::trace!(
                provider = index.provider.name(),
                index = %index.index_path,
                "Serving directory index"
            );
            index.provider.load(&index.index_path, request, response).await
        } else {
            response.redirect_permanent(&format!("{path}/"));
            Ok(())
        }
    }

    fn set_default_headers(&self, request: &Request, response: &mut Response) {
        response.set_keep_alive(self.config.keep_alive() && request.wants_keep_alive());
        response.set_header("Server", self.config.signature());
        response.set_header("Date", httpdate::fmt_http_date(std::time::SystemTime::now()));
    }

    /// Renders a logical failure and sends it, unless a response already
    /// went out. Returns the status that reached the wire.
    async fn render_failure<S>(
        &self,
        connection: &mut Connection<S>,
        response: &mut Response,
        err: &DispatchError,
    ) -> Option<StatusCode>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        if response.is_committed() {
            return None;
        }

        self.errors.handler(err).serve(response);
        response.set_header("Server", self.config.signature());
        response.set_keep_alive(false);

        match connection.send(response).await {
            Ok(()) => Some(response.status),
            Err(e) => {
                tracing::debug!(error = %e, "Could not deliver error response");
                None
            }
        }
    }
}
