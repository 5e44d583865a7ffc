use crate::starter::{Config, Starter};
use anyhow::{anyhow, Context, Result};
use secrecy::ExposeSecret;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub listen: IpAddr,
    pub port: u16,
    pub key_bits: usize,
    pub site: Option<PathBuf>,
    pub tls: Option<Vec<String>>,
}

/// Run the starter and write the received password to stdout.
/// # Errors
/// Returns an error if the starter cannot bind, fails, is interrupted, or stdout is closed.
pub async fn execute(args: Args) -> Result<()> {
    let config = Config::new(SocketAddr::new(args.listen, args.port))
        .with_key_bits(args.key_bits)
        .with_site(args.site)
        .with_tls(args.tls);

    debug!("Starter config: {:?}", config);

    let starter = Starter::bind(config).await?;

    let password = tokio::select! {
        password = starter.run() => password?,
        _ = tokio::signal::ctrl_c() => return Err(anyhow!("interrupted before a password was received")),
    };

    info!("Password received, handing it over");

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(password.expose_secret().as_bytes())
        .await
        .context("failed to write password to stdout")?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;

    Ok(())
}
