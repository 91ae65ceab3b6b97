use crate::cli::actions::session::{navigation_report, print_json};
use crate::cli::globals::GlobalArgs;
use crate::guard::RouteGuard;
use anyhow::Result;

/// Runs the route guard for `path` against the persisted session.
///
/// # Errors
/// Returns an error if the session file is unreadable.
pub async fn execute(globals: &GlobalArgs, path: &str) -> Result<()> {
    let store = globals.open_session()?;
    let guard = RouteGuard::new(Some(store));
    let navigation = guard.before_each(path).await;
    print_json(&navigation_report(&navigation))
}
