//! Wicket - embeddable HTTP server core
//!
//! Parses one request per accepted connection, resolves the resource
//! provider that answers it, falls back to directory indexes, maps failures
//! to HTTP error responses and always releases the connection.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod providers;
pub mod server;
