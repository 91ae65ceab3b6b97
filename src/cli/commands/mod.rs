pub mod api;
pub mod logging;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("subgate")
        .about("Session client for subscription-gated products")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(session::subcommands());

    let command = api::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "subgate");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Session client for subscription-gated products"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("SUBGATE_API_BASE", None::<&str>),
                ("SUBGATE_ORIGIN", None),
                ("SUBGATE_TIMEOUT_SECONDS", None),
                ("SUBGATE_SESSION_FILE", None),
                ("HOME", Some("/home/ada")),
            ],
            || {
                let matches = new().get_matches_from(vec!["subgate", "whoami"]);
                let options = api::Options::parse(&matches).unwrap();

                assert_eq!(options.api_base, "/api");
                assert_eq!(options.origin, "http://127.0.0.1:3040");
                assert_eq!(options.timeout, Duration::from_secs(10));
                assert_eq!(
                    options.session_file,
                    PathBuf::from("/home/ada/.subgate/session.json")
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SUBGATE_API_BASE", Some("https://api.example.com")),
                ("SUBGATE_TIMEOUT_SECONDS", Some("3")),
                ("SUBGATE_SESSION_FILE", Some("/tmp/subgate.json")),
                ("SUBGATE_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["subgate", "logout"]);
                let options = api::Options::parse(&matches).unwrap();

                assert_eq!(options.api_base, "https://api.example.com");
                assert_eq!(options.timeout, Duration::from_secs(3));
                assert_eq!(options.session_file, PathBuf::from("/tmp/subgate.json"));
                assert_eq!(
                    matches
                        .get_one::<u8>(logging::ARG_VERBOSITY)
                        .map(|s| *s),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        temp_env::with_vars([("SUBGATE_API_BASE", None::<&str>)], || {
            let matches = new().get_matches_from(vec![
                "subgate",
                "whoami",
                "--api-base",
                "http://localhost:8040",
            ]);
            let options = api::Options::parse(&matches).unwrap();
            assert_eq!(options.api_base, "http://localhost:8040");
        });
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = new().try_get_matches_from(vec![
            "subgate",
            "whoami",
            "--timeout-seconds",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_login_requires_credentials() {
        temp_env::with_vars(
            [
                ("SUBGATE_EMAIL", None::<&str>),
                ("SUBGATE_PASSWORD", None),
            ],
            || {
                let result = new().try_get_matches_from(vec!["subgate", "login"]);
                assert!(result.is_err());
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("SUBGATE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["subgate".to_string(), "whoami".to_string()];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches
                        .get_one::<u8>(logging::ARG_VERBOSITY)
                        .map(|s| *s),
                    Some(u8::try_from(index).unwrap())
                );
            });
        }
    }

    #[test]
    fn test_log_format() {
        temp_env::with_vars([("SUBGATE_LOG_FORMAT", Some("json"))], || {
            let matches = new().get_matches_from(vec!["subgate", "whoami"]);
            assert_eq!(
                logging::format(&matches),
                crate::cli::telemetry::LogFormat::Json
            );
        });

        let result =
            new().try_get_matches_from(vec!["subgate", "whoami", "--log-format", "xml"]);
        assert!(result.is_err());
    }
}
