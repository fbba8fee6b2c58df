//! Network listener and server assembly.

pub mod listener;

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::config::{ServerConfigBuilder, Settings};
use crate::dispatch::{Dispatcher, StatusErrorHandlers, TracingObserver};
use crate::providers::files::read_document;
use crate::providers::{FileSystemProvider, HandlerProvider};

/// Builds a dispatcher from file settings.
///
/// `handlers` is consulted first and receives the configured filter
/// mappings; a file provider for `document_root` follows when one is set.
pub fn dispatcher_from_settings(settings: &Settings, handlers: HandlerProvider) -> Result<Dispatcher> {
    let handlers = handlers.with_filter_mappings(settings.filter_mappings()?)?;

    let mut builder = ServerConfigBuilder::from_settings(settings)?.provider(Arc::new(handlers));
    if let Some(root) = &settings.document_root {
        builder = builder.provider(Arc::new(FileSystemProvider::new(root)));
    }
    let config = builder.build();

    let mut errors = StatusErrorHandlers::new(config.supported_methods());
    if let Some(path) = &settings.error_documents.not_found {
        errors = errors.with_not_found_document(read_document(path)?);
    }
    if let Some(path) = &settings.error_documents.forbidden {
        errors = errors.with_forbidden_document(read_document(path)?);
    }

    Ok(Dispatcher::new(
        Arc::new(config),
        Arc::new(errors),
        Arc::new(TracingObserver),
    ))
}

/// Builds the dispatcher run by the `wicket` binary.
///
/// The binary registers no handlers and no filters, so any configured filter
/// mapping is rejected with a message pointing at the embedding API rather
/// than failing on an unknown filter id.
pub fn standalone_dispatcher(settings: &Settings) -> Result<Dispatcher> {
    if let Some(mapping) = settings.filters.first() {
        bail!(
            "Configuration maps filter {:?} for {:?}, but the standalone server has no filters; \
             filters must be registered on a HandlerProvider passed to dispatcher_from_settings \
             by an application embedding wicket",
            mapping.filter,
            mapping.include
        );
    }

    dispatcher_from_settings(settings, HandlerProvider::new())
}
