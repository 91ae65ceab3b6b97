//! Maps validated CLI matches to an [`Action`] plus the settings every action shares.

use crate::api::ApiConfig;
use crate::cli::actions::Action;
use crate::cli::commands::{api, session};
use crate::cli::globals::GlobalArgs;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

/// Build the settings shared by every action.
///
/// # Errors
/// Returns an error if a defaulted argument is missing.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let options = api::Options::parse(matches)?;

    Ok(GlobalArgs::new(
        ApiConfig {
            api_base: options.api_base,
            origin: options.origin,
            timeout: options.timeout,
        },
        options.session_file,
    ))
}

/// Map the chosen subcommand to an action.
///
/// # Errors
/// Returns an error if the subcommand is unknown or a required argument is missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub_m)) => Ok(Action::Login {
            email: string(sub_m, session::ARG_EMAIL)?,
            password: secret(sub_m, session::ARG_PASSWORD)?,
        }),
        Some(("sso", sub_m)) => Ok(Action::Sso {
            access_token: secret(sub_m, session::ARG_ACCESS_TOKEN)?,
            refresh_token: secret(sub_m, session::ARG_REFRESH_TOKEN)?,
        }),
        Some(("whoami", _)) => Ok(Action::Whoami),
        Some(("logout", _)) => Ok(Action::Logout),
        Some(("password-reset", sub_m)) => match sub_m.subcommand() {
            Some(("begin", reset_m)) => Ok(Action::BeginPasswordReset {
                email: string(reset_m, session::ARG_EMAIL)?,
            }),
            Some(("finish", reset_m)) => Ok(Action::FinishPasswordReset {
                email: string(reset_m, session::ARG_EMAIL)?,
                code: string(reset_m, session::ARG_CODE)?,
                password: secret(reset_m, session::ARG_PASSWORD)?,
            }),
            _ => Err(anyhow!("unknown password-reset subcommand")),
        },
        Some(("navigate", sub_m)) => Ok(Action::Navigate {
            path: string(sub_m, "path")?,
        }),
        Some(("confirm-delete", sub_m)) => Ok(Action::ConfirmDelete {
            title: string(sub_m, "title")?,
            description: string(sub_m, "description")?,
        }),
        _ => Err(anyhow!("unknown subcommand")),
    }
}

fn string(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: {name}"))
}

fn secret(matches: &ArgMatches, name: &str) -> Result<SecretString> {
    string(matches, name).map(SecretString::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;
    use std::time::Duration;

    fn matches(args: &[&str]) -> ArgMatches {
        commands::new().get_matches_from(args)
    }

    #[test]
    fn login_action() {
        temp_env::with_vars(
            [("SUBGATE_EMAIL", None::<&str>), ("SUBGATE_PASSWORD", None)],
            || {
                let action = handler(&matches(&[
                    "subgate",
                    "login",
                    "--email",
                    "ada@example.com",
                    "--password",
                    "hunter2",
                ]))
                .unwrap();

                match action {
                    Action::Login { email, password } => {
                        assert_eq!(email, "ada@example.com");
                        assert_eq!(password.expose_secret(), "hunter2");
                    }
                    other => panic!("unexpected action: {other:?}"),
                }
            },
        );
    }

    #[test]
    fn password_reset_finish_action() {
        temp_env::with_vars(
            [("SUBGATE_EMAIL", Some("ada@example.com")), ("SUBGATE_PASSWORD", Some("n3w"))],
            || {
                let action = handler(&matches(&[
                    "subgate",
                    "password-reset",
                    "finish",
                    "--code",
                    "123456",
                ]))
                .unwrap();

                match action {
                    Action::FinishPasswordReset {
                        email,
                        code,
                        password,
                    } => {
                        assert_eq!(email, "ada@example.com");
                        assert_eq!(code, "123456");
                        assert_eq!(password.expose_secret(), "n3w");
                    }
                    other => panic!("unexpected action: {other:?}"),
                }
            },
        );
    }

    #[test]
    fn navigate_and_dialog_actions() {
        assert!(matches!(
            handler(&matches(&["subgate", "navigate", "/dashboard"])).unwrap(),
            Action::Navigate { path } if path == "/dashboard"
        ));
        assert!(matches!(
            handler(&matches(&["subgate", "confirm-delete", "Delete", "Gone for good"])).unwrap(),
            Action::ConfirmDelete { title, description }
                if title == "Delete" && description == "Gone for good"
        ));
        assert!(matches!(
            handler(&matches(&["subgate", "whoami"])).unwrap(),
            Action::Whoami
        ));
    }

    #[test]
    fn globals_from_flags() {
        temp_env::with_vars(
            [
                ("SUBGATE_API_BASE", None::<&str>),
                ("SUBGATE_ORIGIN", None),
                ("SUBGATE_TIMEOUT_SECONDS", None),
            ],
            || {
                let globals = globals(&matches(&[
                    "subgate",
                    "--origin",
                    "https://app.example.com",
                    "--timeout-seconds",
                    "5",
                    "--session-file",
                    "/tmp/s.json",
                    "logout",
                ]))
                .unwrap();

                assert_eq!(globals.api.api_base, "/api");
                assert_eq!(globals.api.origin, "https://app.example.com");
                assert_eq!(globals.api.timeout, Duration::from_secs(5));
                assert_eq!(globals.session_file, std::path::PathBuf::from("/tmp/s.json"));
            },
        );
    }
}
