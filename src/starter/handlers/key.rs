use super::State;
use crate::crypto::{self, PublicKey};
use axum::{
    extract::Extension,
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[utoipa::path(
    get,
    path= "/key",
    responses (
        (status = 200, description = "Public half of a fresh one-shot key", body = PublicKey, content_type = "application/json"),
        (status = 500, description = "Key generation failed"),
    ),
    tag= "starter"
)]
/// Generate a key pair, keep the private half and answer with the public one.
///
/// Every call replaces the pending key, so ciphertexts made with an older key
/// no longer decrypt.
#[instrument(skip(state))]
pub async fn key(Extension(state): Extension<Arc<State>>) -> impl IntoResponse {
    let bits = state.key_bits();

    let private = match tokio::task::spawn_blocking(move || crypto::generate(bits)).await {
        Ok(Ok(private)) => private,
        Ok(Err(e)) => {
            error!("Exception caught generating RSA keypair: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(e) => {
            error!("RSA keypair generation task failed: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let public = PublicKey::from_rsa(&private.to_public_key());
    *state.pending.lock().await = Some(private);

    debug!(bits, "new key handed out");

    (
        StatusCode::OK,
        [(CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(public),
    )
        .into_response()
}
