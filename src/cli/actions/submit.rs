use crate::client::{api::KeyServer, Form, Key, Outcome, Submitter};
use anyhow::{anyhow, Context, Result};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub url: String,
    pub timeout: Duration,
    pub insecure: bool,
}

/// Prompt for passwords on stdin until the starter accepts one.
/// # Errors
/// Returns an error if the URL is invalid or stdin closes before completion.
pub async fn execute(args: Args) -> Result<()> {
    let server = if args.insecure {
        warn!("TLS certificate verification is disabled");
        KeyServer::insecure(&args.url, args.timeout)
    } else {
        KeyServer::new(&args.url, args.timeout)
    }
    .with_context(|| format!("invalid starter url: {}", args.url))?;

    info!("Submitting passwords to {}", server.pass_url());

    let mut submitter = Submitter::new(Form::new(), server);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("Password: ");

        let Some(line) = lines.next_line().await.context("failed to read password")? else {
            return Err(anyhow!("input closed before the starter accepted a password"));
        };

        submitter.page_mut().type_password(line);

        match submitter.on_keypress(Key::Enter).await {
            Outcome::Complete => {
                eprintln!("Password accepted");
                return Ok(());
            }
            Outcome::Continue => eprintln!("Password not accepted, try again"),
            Outcome::Ignored => {}
            Outcome::Unexpected(result) => {
                eprintln!("Unexpected answer from the starter ({result}), try again");
            }
            Outcome::KeyUnavailable | Outcome::SendFailed => {
                eprintln!("Could not reach the starter, try again");
            }
        }
    }
}
