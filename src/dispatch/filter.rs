//! URL filter mappings.
//!
//! A [`FilterMapping`] binds a filter identifier to an include pattern and an
//! optional exclude pattern. Patterns are regular expressions matched against
//! the whole path; they are compiled once, when the mapping is built.

use regex::Regex;

use crate::error::DispatchError;
use crate::http::request::Request;
use crate::http::response::Response;

#[derive(Debug, Clone)]
pub struct FilterMapping {
    include: Regex,
    exclude: Option<Regex>,
    filter: String,
}

impl FilterMapping {
    /// Compiles a mapping. Both patterns are anchored to the full path.
    pub fn new(
        include: &str,
        exclude: Option<&str>,
        filter: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            include: anchored(include)?,
            exclude: exclude.map(anchored).transpose()?,
            filter: filter.into(),
        })
    }

    /// Identifier of the filter this mapping applies.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// True iff the include pattern matches and the exclude pattern, if
    /// any, does not.
    pub fn matches(&self, path: &str) -> bool {
        self.include.is_match(path)
            && !self.exclude.as_ref().is_some_and(|re| re.is_match(path))
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// What a filter wants to happen after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    /// Run the next filter, then the handler.
    Continue,
    /// The filter produced the response itself; stop here.
    Stop,
}

/// Cross-cutting behavior applied before a handler.
pub trait Filter: Send + Sync {
    fn apply(
        &self,
        request: &Request,
        response: &mut Response,
    ) -> Result<FilterAction, DispatchError>;
}

impl<F> Filter for F
where
    F: Fn(&Request, &mut Response) -> Result<FilterAction, DispatchError> + Send + Sync,
{
    fn apply(
        &self,
        request: &Request,
        response: &mut Response,
    ) -> Result<FilterAction, DispatchError> {
        self(request, response)
    }
}
