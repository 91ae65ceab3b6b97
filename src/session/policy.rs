//! Access policy applied to resolved users, plus the input checks run before
//! credentials leave the client.

use super::types::User;
use regex::Regex;

pub const ADMIN_ROLE: &str = "admin";
pub const EDITOR_ROLE: &str = "editor";

/// Elevated roles always pass; everyone else passes unless flagged `restricted`.
#[must_use]
pub fn is_authorized(user: &User) -> bool {
    user.has_role(ADMIN_ROLE) || user.has_role(EDITOR_ROLE) || !user.restricted
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}
