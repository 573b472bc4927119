//! HTTP client for the form builder API
//!
//! Used by editing front-ends and by the CLI. Auth state lives in an explicit
//! [`ClientSession`] owned by the caller.

mod api;
mod errors;
mod session;

pub use api::ApiClient;
pub use errors::{ClientError, ClientResult};
pub use session::ClientSession;
