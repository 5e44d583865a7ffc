pub mod health;
pub use self::health::health;

pub mod key;
pub use self::key::key;

pub mod pass;
pub use self::pass::pass;

use axum::{
    http::{Method, StatusCode},
    response::IntoResponse,
};
use rsa::RsaPrivateKey;
use secrecy::SecretString;
use tokio::sync::{oneshot, Mutex};

/// Shared by the handlers of one starter.
pub struct State {
    key_bits: usize,
    // NOTE: only the last key handed out is kept, concurrent operators race
    pending: Mutex<Option<RsaPrivateKey>>,
    delivery: Mutex<Option<oneshot::Sender<SecretString>>>,
}

impl State {
    #[must_use]
    pub fn new(key_bits: usize, delivery: oneshot::Sender<SecretString>) -> Self {
        Self {
            key_bits,
            pending: Mutex::new(None),
            delivery: Mutex::new(Some(delivery)),
        }
    }

    #[must_use]
    pub const fn key_bits(&self) -> usize {
        self.key_bits
    }
}

// everything but the API and the site files
pub async fn fallback(method: Method) -> impl IntoResponse {
    if method == Method::GET || method == Method::HEAD {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::METHOD_NOT_ALLOWED
    }
}
