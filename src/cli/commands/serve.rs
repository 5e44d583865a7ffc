use crate::crypto::{DEFAULT_KEY_BITS, MAX_KEY_BITS, MIN_KEY_BITS};
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{net::IpAddr, path::PathBuf};

pub const NAME: &str = "serve";
pub const ARG_LISTEN: &str = "listen";
pub const ARG_PORT: &str = "port";
pub const ARG_KEY_SIZE: &str = "key-size";
pub const ARG_SITE: &str = "site";
pub const ARG_TLS: &str = "tls";
pub const ARG_TLS_NAME: &str = "tls-name";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(NAME)
        .about("Wait for a password and write it to stdout")
        .arg(
            Arg::new(ARG_LISTEN)
                .short('l')
                .long(ARG_LISTEN)
                .help("Address to listen on")
                .default_value("::")
                .env("SSLSTARTER_LISTEN")
                .value_parser(clap::value_parser!(IpAddr)),
        )
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("8080")
                .env("SSLSTARTER_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_KEY_SIZE)
                .long(ARG_KEY_SIZE)
                .help("Size in bits of the one-shot RSA keys")
                .default_value("2048")
                .env("SSLSTARTER_KEY_SIZE")
                .value_parser(clap::value_parser!(u64).range(MIN_KEY_BITS as u64..=MAX_KEY_BITS as u64)),
        )
        .arg(
            Arg::new(ARG_SITE)
                .long(ARG_SITE)
                .help("Directory with the unlock page, served at /")
                .env("SSLSTARTER_SITE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_TLS)
                .long(ARG_TLS)
                .help("Serve HTTPS with a self-signed certificate generated at startup")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_TLS_NAME)
                .long(ARG_TLS_NAME)
                .help("Host name or address the certificate is issued for (default: localhost)")
                .env("SSLSTARTER_TLS_NAME")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .requires(ARG_TLS),
        )
}

#[derive(Debug)]
pub struct Options {
    pub listen: IpAddr,
    pub port: u16,
    pub key_bits: usize,
    pub site: Option<PathBuf>,
    /// Certificate names when serving HTTPS
    pub tls: Option<Vec<String>>,
}

impl Options {
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let listen = matches
            .get_one::<IpAddr>(ARG_LISTEN)
            .copied()
            .context("missing required argument: --listen")?;
        let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
        let key_bits = matches
            .get_one::<u64>(ARG_KEY_SIZE)
            .map_or(Ok(DEFAULT_KEY_BITS), |&bits| usize::try_from(bits))
            .context("invalid --key-size")?;

        let tls = matches.get_flag(ARG_TLS).then(|| {
            matches
                .get_many::<String>(ARG_TLS_NAME)
                .map(|names| names.cloned().collect())
                .unwrap_or_default()
        });

        Ok(Self {
            listen,
            port,
            key_bits,
            site: matches.get_one::<PathBuf>(ARG_SITE).cloned(),
            tls,
        })
    }
}
