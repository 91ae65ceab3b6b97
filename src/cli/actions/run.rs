use crate::cli::actions::{dialog, navigate, session, Action};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Login { email, password } => session::login(globals, &email, &password).await,
        Action::Sso {
            access_token,
            refresh_token,
        } => session::sso(globals, access_token, refresh_token).await,
        Action::Whoami => session::whoami(globals).await,
        Action::Logout => session::logout(globals).await,
        Action::BeginPasswordReset { email } => session::begin_reset(globals, &email).await,
        Action::FinishPasswordReset {
            email,
            code,
            password,
        } => session::finish_reset(globals, &email, &code, &password).await,
        Action::Navigate { path } => navigate::execute(globals, &path).await,
        Action::ConfirmDelete { title, description } => {
            dialog::confirm_delete(&title, &description)
        }
    }
}
