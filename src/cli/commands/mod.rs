pub mod logging;
pub mod serve;
pub mod submit;

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

    let command = Command::new("sslstarter")
        .about("Collect a server password over HTTP, RSA-encrypted by the client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(serve::subcommand())
        .subcommand(submit::subcommand());

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::path::PathBuf;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "sslstarter");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Collect a server password over HTTP, RSA-encrypted by the client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_serve_defaults() {
        temp_env::with_vars(
            [
                ("SSLSTARTER_LISTEN", None::<&str>),
                ("SSLSTARTER_PORT", None),
                ("SSLSTARTER_KEY_SIZE", None),
                ("SSLSTARTER_SITE", None),
                ("SSLSTARTER_TLS_NAME", None),
            ],
            || {
                let matches = new().get_matches_from(vec!["sslstarter", "serve"]);
                let (name, sub) = matches.subcommand().unwrap();
                assert_eq!(name, serve::NAME);
                assert_eq!(
                    sub.get_one::<IpAddr>(serve::ARG_LISTEN).copied(),
                    Some("::".parse().unwrap())
                );
                assert_eq!(sub.get_one::<u16>(serve::ARG_PORT).copied(), Some(8080));
                assert_eq!(sub.get_one::<u64>(serve::ARG_KEY_SIZE).copied(), Some(2048));
                assert_eq!(sub.get_one::<PathBuf>(serve::ARG_SITE), None);
                assert!(!sub.get_flag(serve::ARG_TLS));
            },
        );
    }

    #[test]
    fn test_serve_args() {
        let matches = new().get_matches_from(vec![
            "sslstarter",
            "serve",
            "--listen",
            "127.0.0.1",
            "--port",
            "8443",
            "--key-size",
            "4096",
            "--site",
            "/srv/unlock",
        ]);
        let sub = matches.subcommand_matches(serve::NAME).unwrap();

        assert_eq!(
            sub.get_one::<IpAddr>(serve::ARG_LISTEN).copied(),
            Some("127.0.0.1".parse().unwrap())
        );
        assert_eq!(sub.get_one::<u16>(serve::ARG_PORT).copied(), Some(8443));
        assert_eq!(sub.get_one::<u64>(serve::ARG_KEY_SIZE).copied(), Some(4096));
        assert_eq!(
            sub.get_one::<PathBuf>(serve::ARG_SITE).cloned(),
            Some(PathBuf::from("/srv/unlock"))
        );
    }

    #[test]
    fn test_serve_key_size_bounds() {
        for size in ["512", "8192", "big"] {
            let result = new().try_get_matches_from(vec!["sslstarter", "serve", "--key-size", size]);
            assert!(result.is_err(), "key size {size} should be rejected");
        }
    }

    #[test]
    fn test_serve_tls_name_requires_tls() {
        let result = new().try_get_matches_from(vec![
            "sslstarter",
            "serve",
            "--tls-name",
            "starter.local",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_submit_requires_url() {
        temp_env::with_vars([("SSLSTARTER_URL", None::<&str>)], || {
            let result = new().try_get_matches_from(vec!["sslstarter", "submit"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_submit_env() {
        temp_env::with_vars(
            [
                ("SSLSTARTER_URL", Some("https://starter.tld:8443/")),
                ("SSLSTARTER_TIMEOUT", Some("5")),
                ("SSLSTARTER_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["sslstarter", "submit"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );

                let sub = matches.subcommand_matches(submit::NAME).unwrap();
                assert_eq!(
                    sub.get_one::<String>(submit::ARG_URL).cloned(),
                    Some("https://starter.tld:8443/".to_string())
                );
                assert_eq!(sub.get_one::<u64>(submit::ARG_TIMEOUT).copied(), Some(5));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("SSLSTARTER_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["sslstarter", "serve"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("SSLSTARTER_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["sslstarter".to_string(), "serve".to_string()];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
