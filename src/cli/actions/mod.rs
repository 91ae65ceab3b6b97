pub mod dialog;
pub mod navigate;
pub mod session;

mod run;

use crate::cli::globals::GlobalArgs;
use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Sso {
        access_token: SecretString,
        refresh_token: SecretString,
    },
    Whoami,
    Logout,
    BeginPasswordReset {
        email: String,
    },
    FinishPasswordReset {
        email: String,
        code: String,
        password: SecretString,
    },
    Navigate {
        path: String,
    },
    ConfirmDelete {
        title: String,
        description: String,
    },
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
