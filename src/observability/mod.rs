//! Observability for formcraft
//!
//! Structured logging through `tracing`. Request spans come from `tower-http`'s
//! `TraceLayer` in the HTTP server; everything else logs with the `tracing` macros.

mod logging;

pub use logging::{init_tracing, resolve_filter, LOG_ENV};
