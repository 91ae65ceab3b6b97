use clap::{Arg, Command};

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CODE: &str = "code";
pub const ARG_ACCESS_TOKEN: &str = "access-token";
pub const ARG_REFRESH_TOKEN: &str = "refresh-token";

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .long(ARG_EMAIL)
        .help("Account email address")
        .env("SUBGATE_EMAIL")
        .required(true)
}

fn password_arg(help: &'static str) -> Arg {
    Arg::new(ARG_PASSWORD)
        .long(ARG_PASSWORD)
        .help(help)
        .env("SUBGATE_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new("login")
            .about("Sign in with email and password")
            .arg(email_arg())
            .arg(password_arg("Account password")),
        Command::new("sso")
            .about("Adopt tokens obtained from an external identity provider")
            .arg(
                Arg::new(ARG_ACCESS_TOKEN)
                    .long(ARG_ACCESS_TOKEN)
                    .help("Access token")
                    .env("SUBGATE_ACCESS_TOKEN")
                    .hide_env_values(true)
                    .required(true),
            )
            .arg(
                Arg::new(ARG_REFRESH_TOKEN)
                    .long(ARG_REFRESH_TOKEN)
                    .help("Refresh token")
                    .env("SUBGATE_REFRESH_TOKEN")
                    .hide_env_values(true)
                    .required(true),
            ),
        Command::new("whoami").about("Resolve the current user, refreshing the session if needed"),
        Command::new("logout").about("Clear the session and notify the server"),
        Command::new("password-reset")
            .about("Reset a forgotten password")
            .subcommand_required(true)
            .subcommand(
                Command::new("begin")
                    .about("Mail a reset code to the account")
                    .arg(email_arg()),
            )
            .subcommand(
                Command::new("finish")
                    .about("Set a new password with the mailed code")
                    .arg(email_arg())
                    .arg(
                        Arg::new(ARG_CODE)
                            .long(ARG_CODE)
                            .help("Verification code from the reset email")
                            .required(true),
                    )
                    .arg(password_arg("New password")),
            ),
        Command::new("navigate")
            .about("Run the route guard for a target path")
            .arg(
                Arg::new("path")
                    .help("Route path, e.g. /dashboard")
                    .required(true),
            ),
        Command::new("confirm-delete")
            .about("Print the dialog descriptor for a delete confirmation")
            .arg(Arg::new("title").help("Dialog title").required(true))
            .arg(
                Arg::new("description")
                    .help("Dialog description")
                    .required(true),
            ),
    ]
}
