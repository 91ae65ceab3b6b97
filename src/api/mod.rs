//! HTTP plumbing shared by the session store and the CLI. One configured client,
//! one request description, and one error type; callers decide how to recover.

pub mod client;
pub mod config;
pub mod errors;

pub use self::client::{ApiClient, ApiRequest, Body, REQUEST_ID_HEADER};
pub use self::config::ApiConfig;
pub use self::errors::ApiError;
