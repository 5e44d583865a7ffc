//! Map validated CLI matches to the action to run.

use crate::cli::actions::{serve, submit, Action};
use crate::cli::commands;
use anyhow::{anyhow, Result};

/// # Errors
/// Returns an error if the subcommand is unknown or its arguments are inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((commands::serve::NAME, sub)) => {
            let opts = commands::serve::Options::parse(sub)?;
            Ok(Action::Serve(serve::Args {
                listen: opts.listen,
                port: opts.port,
                key_bits: opts.key_bits,
                site: opts.site,
                tls: opts.tls,
            }))
        }
        Some((commands::submit::NAME, sub)) => {
            let opts = commands::submit::Options::parse(sub)?;
            Ok(Action::Submit(submit::Args {
                url: opts.url,
                timeout: opts.timeout,
                insecure: opts.insecure,
            }))
        }
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_serve_action() {
        temp_env::with_vars(
            [
                ("SSLSTARTER_KEY_SIZE", Some("3072")),
                ("SSLSTARTER_SITE", None::<&str>),
            ],
            || {
                let matches =
                    commands::new().get_matches_from(vec!["sslstarter", "serve", "-p", "9000"]);
                match handler(&matches).unwrap() {
                    Action::Serve(args) => {
                        assert_eq!(args.port, 9000);
                        assert_eq!(args.key_bits, 3072);
                        assert!(args.site.is_none());
                        assert!(args.tls.is_none());
                    }
                    other => panic!("unexpected action: {other:?}"),
                }
            },
        );
    }

    #[test]
    fn test_submit_action() {
        temp_env::with_vars([("SSLSTARTER_TIMEOUT", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "sslstarter",
                "submit",
                "--url",
                "http://127.0.0.1:8080/",
            ]);
            match handler(&matches).unwrap() {
                Action::Submit(args) => {
                    assert_eq!(args.url, "http://127.0.0.1:8080/");
                    assert_eq!(args.timeout, Duration::from_secs(30));
                    assert!(!args.insecure);
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn test_serve_tls_action() {
        temp_env::with_vars([("SSLSTARTER_TLS_NAME", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec!["sslstarter", "serve", "--tls"]);
            match handler(&matches).unwrap() {
                Action::Serve(args) => assert_eq!(args.tls, Some(Vec::new())),
                other => panic!("unexpected action: {other:?}"),
            }

            let matches = commands::new().get_matches_from(vec![
                "sslstarter",
                "serve",
                "--tls",
                "--tls-name",
                "starter.local,10.0.0.1",
            ]);
            match handler(&matches).unwrap() {
                Action::Serve(args) => assert_eq!(
                    args.tls,
                    Some(vec!["starter.local".to_string(), "10.0.0.1".to_string()])
                ),
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn test_submit_insecure_action() {
        let matches = commands::new().get_matches_from(vec![
            "sslstarter",
            "submit",
            "-k",
            "--url",
            "https://127.0.0.1:8443/",
        ]);
        match handler(&matches).unwrap() {
            Action::Submit(args) => assert!(args.insecure),
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
