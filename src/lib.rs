//! # Subgate (session client for subscription-gated products)
//!
//! `subgate` owns the client side of a bearer-token session: it signs users in,
//! keeps the access/refresh token pair persisted between runs, silently refreshes
//! an expired access token, and decides where a navigation may go.
//!
//! ## Session lifecycle
//!
//! - **Login:** credentials are posted as a form; the returned user must pass the
//!   authorization policy before any token is stored.
//! - **Lookup:** `GET /users/me` with the access token. A `401` triggers a single
//!   refresh with the refresh token; concurrent lookups share that refresh.
//! - **Fallback:** a failed refresh clears both tokens and flags the session as
//!   needing login. Other failures leave the session untouched and are reported
//!   as an explicit "unavailable" outcome.
//!
//! ## Authorization
//!
//! Users holding the `admin` or `editor` role are always authorized. Everyone else
//! is authorized unless the account is flagged `restricted`.
//!
//! ## Navigation
//!
//! The route guard resolves the current user before each navigation and sends
//! users without an active subscription to `/subscribe`.

pub mod api;
pub mod cli;
pub mod dialog;
pub mod guard;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
