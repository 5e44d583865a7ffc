//! HTTP calls against a starter: fetch the one-shot key, post the ciphertext.
//!
//! Endpoints resolve relative to the base URL the way a browser resolves them
//! relative to the page, so `http://host/unlock/` talks to `/unlock/key` while
//! `http://host/unlock` talks to `/key`.

use crate::{crypto::PublicKey, protocol::ServerResult, APP_USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Default request timeout applied to both calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum number of error body characters kept in [`Error::Http`].
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("unable to reach the server: {0}")]
    Network(reqwest::Error),
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Parse(reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct KeyServer {
    http: Client,
    key_url: Url,
    pass_url: Url,
}

impl KeyServer {
    /// # Errors
    /// Returns an error if `base` is not a valid URL or the HTTP client cannot be built.
    pub fn new(base: &str, timeout: Duration) -> Result<Self, Error> {
        Self::build(base, timeout, false)
    }

    /// Like [`KeyServer::new`] but trusts any certificate, for starters that
    /// serve HTTPS with a self-signed one.
    ///
    /// # Errors
    /// Returns an error if `base` is not a valid URL or the HTTP client cannot be built.
    pub fn insecure(base: &str, timeout: Duration) -> Result<Self, Error> {
        Self::build(base, timeout, true)
    }

    fn build(base: &str, timeout: Duration, accept_invalid_certs: bool) -> Result<Self, Error> {
        let base = Url::parse(base.trim())?;
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            http,
            key_url: base.join("key")?,
            pass_url: base.join("pass")?,
        })
    }

    #[must_use]
    pub fn key_url(&self) -> &Url {
        &self.key_url
    }

    #[must_use]
    pub fn pass_url(&self) -> &Url {
        &self.pass_url
    }

    /// `GET key`
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-2xx status, or an undecodable body.
    #[instrument(skip(self), fields(url = %self.key_url))]
    pub async fn fetch_key(&self) -> Result<PublicKey, Error> {
        let response = self
            .http
            .get(self.key_url.clone())
            .send()
            .await
            .map_err(map_request_error)?;

        handle_json_response(response).await
    }

    /// `POST pass` with the form body `password=<ciphertext>`.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-2xx status, or an undecodable body.
    #[instrument(skip(self, ciphertext), fields(url = %self.pass_url))]
    pub async fn send_password(&self, ciphertext: &str) -> Result<ServerResult, Error> {
        let response = self
            .http
            .post(self.pass_url.clone())
            .form(&[("password", ciphertext)])
            .send()
            .await
            .map_err(map_request_error)?;

        handle_json_response(response).await
    }
}

fn map_request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(err)
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    debug!(%status, "response received");

    if status.is_success() {
        response.json::<T>().await.map_err(|err| {
            if err.is_timeout() {
                Error::Timeout
            } else {
                Error::Parse(err)
            }
        })
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(Error::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
