//! Built-in resource providers.

pub mod files;
pub mod handlers;

pub use files::FileSystemProvider;
pub use handlers::{Handler, HandlerProvider};
