use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Accepted by `SSLSTARTER_LOG_LEVEL`, indexed by verbosity count.
const LEVELS: [(&str, Level); 5] = [
    ("error", Level::ERROR),
    ("warn", Level::WARN),
    ("info", Level::INFO),
    ("debug", Level::DEBUG),
    ("trace", Level::TRACE),
];

fn parse_level(value: &str) -> Result<u8, String> {
    let value = value.trim().to_ascii_lowercase();

    let count = LEVELS
        .iter()
        .position(|(name, _)| *name == value)
        .or_else(|| {
            value
                .parse::<usize>()
                .ok()
                .filter(|count| *count < LEVELS.len())
        });

    count
        .and_then(|count| u8::try_from(count).ok())
        .ok_or_else(|| {
            let names: Vec<&str> = LEVELS.iter().map(|(name, _)| *name).collect();
            format!("invalid log level {value:?}, expected 0-4 or one of {}", names.join(", "))
        })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Log more to stderr, repeat up to -vvvv (default: errors only)")
            .env("SSLSTARTER_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(ValueParser::from(parse_level)),
    )
}

/// Level requested with `-v` or `SSLSTARTER_LOG_LEVEL`; `None` when neither
/// raised it above errors.
#[must_use]
pub fn level(matches: &ArgMatches) -> Option<Level> {
    let count = usize::from(matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0));
    if count == 0 {
        return None;
    }

    LEVELS
        .get(count.min(LEVELS.len() - 1))
        .map(|(_, level)| *level)
}
