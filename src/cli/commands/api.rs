use crate::api::config::{DEFAULT_API_BASE, DEFAULT_ORIGIN};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::{env, path::PathBuf, time::Duration};

pub const ARG_API_BASE: &str = "api-base";
pub const ARG_ORIGIN: &str = "origin";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";
pub const ARG_SESSION_FILE: &str = "session-file";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE)
                .long(ARG_API_BASE)
                .help("API base URL, absolute or relative to --origin")
                .env("SUBGATE_API_BASE")
                .default_value(DEFAULT_API_BASE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ORIGIN)
                .long(ARG_ORIGIN)
                .help("Origin a relative API base is resolved against")
                .env("SUBGATE_ORIGIN")
                .default_value(DEFAULT_ORIGIN)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long(ARG_TIMEOUT_SECONDS)
                .help("Per-request timeout in seconds")
                .env("SUBGATE_TIMEOUT_SECONDS")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long(ARG_SESSION_FILE)
                .help("File holding the persisted session (default: ~/.subgate/session.json)")
                .env("SUBGATE_SESSION_FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub api_base: String,
    pub origin: String,
    pub timeout: Duration,
    pub session_file: PathBuf,
}

impl Options {
    /// # Errors
    /// Returns an error if a defaulted argument is unexpectedly missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let api_base = matches
            .get_one::<String>(ARG_API_BASE)
            .cloned()
            .context("missing required argument: --api-base")?;
        let origin = matches
            .get_one::<String>(ARG_ORIGIN)
            .cloned()
            .context("missing required argument: --origin")?;
        let timeout = matches
            .get_one::<u64>(ARG_TIMEOUT_SECONDS)
            .copied()
            .map(Duration::from_secs)
            .context("missing required argument: --timeout-seconds")?;
        let session_file = matches
            .get_one::<PathBuf>(ARG_SESSION_FILE)
            .cloned()
            .unwrap_or_else(default_session_file);

        Ok(Self {
            api_base,
            origin,
            timeout,
            session_file,
        })
    }
}

fn default_session_file() -> PathBuf {
    env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".subgate")
        .join("session.json")
}
