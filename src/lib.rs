//! formcraft - form builder service with shared schema validation
//!
//! The same validator runs in the editing client, the CLI and the server; the server's
//! run is authoritative.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod forms;
pub mod http_server;
pub mod observability;
pub mod rules;
