use std::collections::HashMap;
use std::sync::Arc;

use anyhow::bail;

use crate::dispatch::filter::{Filter, FilterAction, FilterMapping};
use crate::dispatch::provider::{BoxFuture, ResourceProvider};
use crate::error::DispatchError;
use crate::http::request::Request;
use crate::http::response::Response;

/// A dynamic handler bound to one exact path.
pub type Handler = Arc<dyn Fn(&Request, &mut Response) -> Result<(), DispatchError> + Send + Sync>;

/// Serves registered handlers, running mapped filters first.
///
/// Filters are registered under an identifier and attached to paths through
/// [`FilterMapping`]s. For each request every mapping that matches the path
/// runs its filter, in mapping order, before the handler. A filter that
/// returns [`FilterAction::Stop`] ends the chain.
#[derive(Default)]
pub struct HandlerProvider {
    handlers: HashMap<String, Handler>,
    filters: HashMap<String, Arc<dyn Filter>>,
    mappings: Vec<FilterMapping>,
}

impl HandlerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for exactly `path`.
    pub fn route<F>(mut self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        self.handlers.insert(path.into(), Arc::new(handler));
        self
    }

    /// Registers a filter under `id`.
    pub fn filter<F>(mut self, id: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> Result<FilterAction, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.filters.insert(id.into(), Arc::new(filter));
        self
    }

    /// Attaches mappings. Every mapping must name a registered filter.
    pub fn with_filter_mappings<I>(mut self, mappings: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = FilterMapping>,
    {
        for mapping in mappings {
            if !self.filters.contains_key(mapping.filter()) {
                bail!("Filter mapping refers to unknown filter {:?}", mapping.filter());
            }
            self.mappings.push(mapping);
        }
        Ok(self)
    }

    /// Mappings that apply to `path`, in order.
    pub fn mappings_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FilterMapping> {
        self.mappings.iter().filter(move |m| m.matches(path))
    }

    fn run(
        &self,
        path: &str,
        request: &Request,
        response: &mut Response,
    ) -> Result<(), DispatchError> {
        let handler = self.handlers.get(path).ok_or_else(|| DispatchError::NotFound {
            path: path.to_string(),
        })?;

        for mapping in self.mappings_for(path) {
            let Some(filter) = self.filters.get(mapping.filter()) else {
                continue;
            };

            if filter.apply(request, response)? == FilterAction::Stop {
                tracing::debug!(filter = mapping.filter(), path, "Filter stopped the chain");
                return Ok(());
            }
        }

        handler(request, response)
    }
}

impl ResourceProvider for HandlerProvider {
    fn name(&self) -> &str {
        "handlers"
    }

    fn can_load(&self, path: &str) -> bool {
        self.handlers.contains_key(path)
    }

    fn load<'a>(
        &'a self,
        path: &'a str,
        request: &'a Request,
        response: &'a mut Response,
    ) -> BoxFuture<'a, Result<(), DispatchError>> {
        Box::pin(async move { self.run(path, request, response) })
    }
}
