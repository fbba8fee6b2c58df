//! HTTP message plumbing around the dispatcher.
//!
//! - **`connection`**: exclusive owner of one accepted stream; reads a request, sends a response, closes once
//! - **`parser`**: parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and query decoding
//! - **`response`**: mutable HTTP response with builder pattern
//! - **`headers`**: case-insensitive header map
//! - **`writer`**: serializes and writes HTTP responses to the client
//! - **`path`**: path checks used during dispatch
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection lifecycle
//!
//! ```text
//!   accept ─► Connection::new
//!               │
//!               ├─ Response created (before parsing, so parse errors can be answered)
//!               ├─ read_request ── transport fault ──────────────┐
//!               ├─ dispatch (validate, resolve, load)            │
//!               ├─ send(response)                                │
//!               ▼                                                ▼
//!             close  ◄───────────────────────────────────────────┘
//! ```

pub mod connection;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod writer;
