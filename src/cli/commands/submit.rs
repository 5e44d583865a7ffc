use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::time::Duration;

pub const NAME: &str = "submit";
pub const ARG_URL: &str = "url";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_INSECURE: &str = "insecure";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(NAME)
        .about("Read passwords from stdin and submit them, encrypted, to a starter")
        .arg(
            Arg::new(ARG_URL)
                .short('u')
                .long(ARG_URL)
                .help("Starter URL, key and pass resolve relative to it")
                .env("SSLSTARTER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds")
                .default_value("30")
                .env("SSLSTARTER_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_INSECURE)
                .short('k')
                .long(ARG_INSECURE)
                .help("Accept any TLS certificate, needed for a starter running with --tls")
                .action(ArgAction::SetTrue),
        )
}

#[derive(Debug)]
pub struct Options {
    pub url: String,
    pub timeout: Duration,
    pub insecure: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if `--url` is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_URL)
            .cloned()
            .context("missing required argument: --url")?;
        let timeout = matches.get_one::<u64>(ARG_TIMEOUT).copied().unwrap_or(30);

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout),
            insecure: matches.get_flag(ARG_INSECURE),
        })
    }
}
