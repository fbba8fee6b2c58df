//! Request dispatch: validation, provider resolution, directory index
//! fallback and failure translation.

pub mod dispatcher;
pub mod errors;
pub mod filter;
pub mod index;
pub mod observer;
pub mod provider;

pub use dispatcher::Dispatcher;
pub use errors::{ErrorHandler, ErrorHandlerResolver, StatusErrorHandlers};
pub use filter::{Filter, FilterAction, FilterMapping};
pub use index::{resolve_index, DirectoryIndexDescriptor};
pub use observer::{DispatchObserver, RequestSummary, TracingObserver};
pub use provider::{resolve, BoxFuture, ResourceProvider};
