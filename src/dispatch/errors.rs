//! Translation of dispatch failures into HTTP error responses.

use crate::error::DispatchError;
use crate::http::request::Method;
use crate::http::response::{Response, StatusCode};

/// Renders one kind of error response.
pub trait ErrorHandler: Send + Sync {
    /// Writes a complete error response, discarding anything already in
    /// `response`. The response is left ready to send.
    fn serve(&self, response: &mut Response);
}

/// Picks the handler for a failure. Resolution itself never fails: unknown
/// kinds get a generic handler.
pub trait ErrorHandlerResolver: Send + Sync {
    fn handler(&self, error: &DispatchError) -> &dyn ErrorHandler;
}

/// A fixed status with either a configured document or a short default body.
#[derive(Debug, Clone)]
pub struct StatusPage {
    status: StatusCode,
    document: Option<Vec<u8>>,
}

impl StatusPage {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            document: None,
        }
    }

    /// Serves `html` as the body instead of the built-in page.
    pub fn with_document(mut self, html: Vec<u8>) -> Self {
        self.document = Some(html);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn default_body(&self) -> Vec<u8> {
        format!(
            "<html><head><title>{code} {reason}</title></head><body><h1>{code} {reason}</h1></body></html>",
            code = self.status.as_u16(),
            reason = self.status.reason_phrase(),
        )
        .into_bytes()
    }
}

impl ErrorHandler for StatusPage {
    fn serve(&self, response: &mut Response) {
        response.reset();
        response.set_status(self.status);
        response.set_header("Content-Type", "text/html; charset=utf-8");
        response.set_body(self.document.clone().unwrap_or_else(|| self.default_body()));
    }
}

/// 405 page that also advertises the allowed methods.
#[derive(Debug, Clone)]
pub struct MethodNotAllowedPage {
    page: StatusPage,
    allow: String,
}

impl MethodNotAllowedPage {
    pub fn new(supported: &[Method]) -> Self {
        let allow = supported
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            page: StatusPage::new(StatusCode::MethodNotAllowed),
            allow,
        }
    }
}

impl ErrorHandler for MethodNotAllowedPage {
    fn serve(&self, response: &mut Response) {
        self.page.serve(response);
        response.set_header("Allow", self.allow.clone());
    }
}

/// The default resolver: one page per failure kind, 500 for the rest.
#[derive(Debug, Clone)]
pub struct StatusErrorHandlers {
    bad_request: StatusPage,
    forbidden: StatusPage,
    not_found: StatusPage,
    method_not_allowed: MethodNotAllowedPage,
    internal: StatusPage,
}

impl StatusErrorHandlers {
    pub fn new(supported_methods: &[Method]) -> Self {
        Self {
            bad_request: StatusPage::new(StatusCode::BadRequest),
            forbidden: StatusPage::new(StatusCode::Forbidden),
            not_found: StatusPage::new(StatusCode::NotFound),
            method_not_allowed: MethodNotAllowedPage::new(supported_methods),
            internal: StatusPage::new(StatusCode::InternalServerError),
        }
    }

    pub fn with_not_found_document(mut self, html: Vec<u8>) -> Self {
        self.not_found = self.not_found.with_document(html);
        self
    }

    pub fn with_forbidden_document(mut self, html: Vec<u8>) -> Self {
        self.forbidden = self.forbidden.with_document(html);
        self
    }
}

impl ErrorHandlerResolver for StatusErrorHandlers {
    fn handler(&self, error: &DispatchError) -> &dyn ErrorHandler {
        match error {
            DispatchError::AccessDenied { .. } => &self.forbidden,
            DispatchError::MethodNotAllowed { .. } => &self.method_not_allowed,
            DispatchError::NotFound { .. } => &self.not_found,
            DispatchError::BadRequest(_) => &self.bad_request,
            DispatchError::Transport(_) | DispatchError::Unclassified(_) => &self.internal,
        }
    }
}
