//! The encrypt-and-submit handler.
//!
//! One cycle disables the submit control, takes the password out of its input,
//! fetches a fresh key, encrypts and posts the password, then either marks the
//! page done (`complete`) or re-enables the control for another attempt.
//! Failures are never retried: each one is logged once and leaves the control
//! enabled again.

pub mod api;
pub mod page;

pub use self::api::KeyServer;
pub use self::page::{Form, Page};

use crate::{crypto, protocol::ResultCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

/// Keyboard code of the Enter key.
pub const ENTER: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other(u32),
}

impl From<u32> for Key {
    fn from(code: u32) -> Self {
        if code == ENTER {
            Self::Enter
        } else {
            Self::Other(code)
        }
    }
}

/// How a trigger was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The trigger did not start a cycle
    Ignored,
    Continue,
    Complete,
    /// The server answered with an unknown result code
    Unexpected(String),
    /// The key could not be fetched or used, nothing was posted
    KeyUnavailable,
    /// The password could not be delivered
    SendFailed,
}

#[derive(Debug)]
pub struct Submitter<P> {
    page: P,
    server: KeyServer,
}

impl<P: Page> Submitter<P> {
    pub const fn new(page: P, server: KeyServer) -> Self {
        Self { page, server }
    }

    pub const fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn into_page(self) -> P {
        self.page
    }

    /// Click on the submit control. A disabled control does not react.
    pub async fn on_click(&mut self) -> Outcome {
        if self.page.submit_disabled() {
            debug!("click ignored, submit is disabled");
            return Outcome::Ignored;
        }

        self.submit().await
    }

    /// Key pressed in the password input: Enter submits while the control is enabled.
    pub async fn on_keypress(&mut self, key: impl Into<Key>) -> Outcome {
        if key.into() != Key::Enter || self.page.submit_disabled() {
            return Outcome::Ignored;
        }

        self.submit().await
    }

    #[instrument(skip(self))]
    async fn submit(&mut self) -> Outcome {
        self.page.set_submit_disabled(true);

        let password = self.page.password();
        self.page.clear_password();

        let outcome = self.exchange(password).await;

        if outcome == Outcome::Complete {
            // submit stays disabled for good
            self.page.mark_done();
        } else {
            self.page.set_submit_disabled(false);
        }

        outcome
    }

    async fn exchange(&self, password: SecretString) -> Outcome {
        let key = match self.server.fetch_key().await {
            Ok(key) => key,
            Err(e) => {
                warn!("Unable to get key: {e}");
                return Outcome::KeyUnavailable;
            }
        };

        let ciphertext = match key
            .to_rsa()
            .and_then(|key| crypto::encrypt(&key, password.expose_secret()))
        {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                warn!("Unable to encrypt password: {e}");
                return Outcome::KeyUnavailable;
            }
        };

        match self.server.send_password(&ciphertext).await {
            Ok(reply) => match reply.code() {
                ResultCode::Complete => Outcome::Complete,
                ResultCode::Continue => Outcome::Continue,
                ResultCode::Other(result) => {
                    warn!(?reply, "Unexpected result from server");
                    Outcome::Unexpected(result)
                }
            },
            Err(e) => {
                warn!("Unable to send password: {e}");
                Outcome::SendFailed
            }
        }
    }
}
