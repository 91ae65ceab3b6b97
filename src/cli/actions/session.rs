//! Session subcommands. Results are printed to stdout as JSON.

use crate::cli::globals::GlobalArgs;
use crate::guard::Navigation;
use crate::session::{is_authorized, UserLookup};
use anyhow::{bail, Result};
use secrecy::SecretString;
use serde_json::{json, Value};

/// JSON report describing the outcome of a user lookup.
#[must_use]
pub fn lookup_report(lookup: &UserLookup, needs_login: bool) -> Value {
    match lookup {
        UserLookup::Authenticated(user) => json!({
            "status": "authenticated",
            "authorized": is_authorized(user),
            "subscribed": user.has_subscription(),
            "user": user,
        }),
        UserLookup::NeedsLogin => json!({
            "status": "needs_login",
            "needsLogin": true,
        }),
        UserLookup::SignedOut => json!({
            "status": "signed_out",
            "needsLogin": needs_login,
        }),
        UserLookup::Unavailable(err) => json!({
            "status": "unavailable",
            "error": err.to_string(),
        }),
    }
}

#[must_use]
pub fn navigation_report(navigation: &Navigation) -> Value {
    match navigation {
        Navigation::Proceed => json!({ "navigation": "proceed" }),
        Navigation::Redirect(to) => json!({ "navigation": "redirect", "to": to }),
    }
}

pub(crate) fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn finish(lookup: &UserLookup, needs_login: bool) -> Result<()> {
    print_json(&lookup_report(lookup, needs_login))?;

    if let UserLookup::Unavailable(err) = lookup {
        bail!("current user unavailable: {err}");
    }

    Ok(())
}

/// # Errors
/// Returns an error if sign-in fails or the session cannot be persisted.
pub async fn login(globals: &GlobalArgs, email: &str, password: &SecretString) -> Result<()> {
    let store = globals.open_session()?;
    let lookup = store.login(email, password).await?;
    finish(&lookup, store.needs_login())
}

/// # Errors
/// Returns an error if the tokens cannot be persisted.
pub async fn sso(
    globals: &GlobalArgs,
    access_token: SecretString,
    refresh_token: SecretString,
) -> Result<()> {
    let store = globals.open_session()?;
    let lookup = store.set_sso_creds(access_token, refresh_token).await?;
    finish(&lookup, store.needs_login())
}

/// # Errors
/// Returns an error if the session file is unreadable or the user lookup is unavailable.
pub async fn whoami(globals: &GlobalArgs) -> Result<()> {
    let store = globals.open_session()?;
    let lookup = store.get_user().await;
    finish(&lookup, store.needs_login())
}

/// # Errors
/// Returns an error if the session file is unreadable.
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let store = globals.open_session()?;
    let navigation = store.logout().await;
    print_json(&navigation_report(&navigation))
}

/// # Errors
/// Returns an error if the email is malformed or the request fails.
pub async fn begin_reset(globals: &GlobalArgs, email: &str) -> Result<()> {
    let store = globals.open_session()?;
    store.begin_reset_password(email).await?;
    print_json(&json!({ "status": "code_sent", "email": email }))
}

/// # Errors
/// Returns an error if the email is malformed or the request fails.
pub async fn finish_reset(
    globals: &GlobalArgs,
    email: &str,
    code: &str,
    password: &SecretString,
) -> Result<()> {
    let store = globals.open_session()?;
    store.reset_password(email, code, password).await?;
    print_json(&json!({ "status": "password_reset", "email": email }))
}
