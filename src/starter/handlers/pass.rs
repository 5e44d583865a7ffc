use super::State;
use crate::{
    crypto,
    protocol::{PasswordForm, ResultCode, ServerResult},
};
use anyhow::{anyhow, Context, Result};
use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[utoipa::path(
    post,
    path= "/pass",
    request_body(content = PasswordForm, content_type = "application/x-www-form-urlencoded"),
    responses (
        (status = 200, description = "`complete` when the password was accepted, `continue` otherwise", body = ServerResult, content_type = "application/json"),
        (status = 405, description = "Only POST is allowed"),
    ),
    tag= "starter"
)]
/// Decrypt the submitted password with the pending key and hand it over.
///
/// Any failure answers `continue` so the client can fetch a new key and retry.
#[instrument(skip_all)]
pub async fn pass(
    Extension(state): Extension<Arc<State>>,
    payload: Result<Form<PasswordForm>, FormRejection>,
) -> Json<ServerResult> {
    let code = match accept(&state, payload).await {
        Ok(()) => {
            info!("Password received");
            ResultCode::Complete
        }
        Err(e) => {
            error!("Exception caught handling password: {e:#}");
            ResultCode::Continue
        }
    };

    Json(ServerResult::new(&code))
}

async fn accept(state: &State, payload: Result<Form<PasswordForm>, FormRejection>) -> Result<()> {
    let Form(form) = payload.context("invalid form body")?;
    if form.password.trim().is_empty() {
        return Err(anyhow!("missing password"));
    }

    let mut pending = state.pending.lock().await;
    let key = pending
        .clone()
        .ok_or_else(|| anyhow!("no key was handed out"))?;

    // the lock stays held so only one submission per key decrypts at a time
    let password = tokio::task::spawn_blocking(move || crypto::decrypt(&key, &form.password))
        .await
        .context("decryption task failed")?
        .context("failed to decrypt password")?;

    let delivery = state
        .delivery
        .lock()
        .await
        .take()
        .ok_or_else(|| anyhow!("password already delivered"))?;

    delivery
        .send(password)
        .map_err(|_| anyhow!("nobody is waiting for the password"))?;

    // single use
    pending.take();

    Ok(())
}
