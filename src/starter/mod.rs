//! The starter: a throwaway HTTP service that collects one password.
//!
//! It runs before the server that needs the password, hands out one-shot RSA
//! keys on `GET /key`, decrypts `POST /pass` submissions and returns the first
//! password that decrypts. Once the `complete` answer has been sent it stops
//! accepting connections and gives open ones a short grace period.

use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use rustls::ServerConfig;
use secrecy::SecretString;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, services::ServeDir, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, debug_span, info, warn, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;
pub mod site;
pub mod tls;

use self::handlers::State;
use crate::crypto::DEFAULT_KEY_BITS;

/// How long open connections may take to finish once the password arrived.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(OpenApi)]
#[openapi(
    paths(handlers::key::key, handlers::pass::pass, handlers::health::health),
    components(schemas(
        crate::crypto::PublicKey,
        crate::protocol::PasswordForm,
        crate::protocol::ServerResult,
        handlers::health::Health
    )),
    tags((name = "starter", description = "One-shot key exchange and password submission"))
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub key_bits: usize,
    /// Directory of static files served instead of the built-in unlock page,
    /// `/` maps to `index.html`
    pub site: Option<PathBuf>,
    /// Serve HTTPS with a self-signed certificate for these names
    pub tls: Option<Vec<String>>,
    pub shutdown_grace: Duration,
}

impl Config {
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            key_bits: DEFAULT_KEY_BITS,
            site: None,
            tls: None,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    #[must_use]
    pub const fn with_key_bits(mut self, key_bits: usize) -> Self {
        self.key_bits = key_bits;
        self
    }

    #[must_use]
    pub fn with_site(mut self, site: Option<PathBuf>) -> Self {
        self.site = site;
        self
    }

    #[must_use]
    pub fn with_tls(mut self, names: Option<Vec<String>>) -> Self {
        self.tls = names;
        self
    }

    #[must_use]
    pub const fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}

/// Build the starter router around `state`.
///
/// Without a `site` directory the built-in unlock page is served at `/`.
pub fn router(state: Arc<State>, site: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/key", get(handlers::key))
        .route("/pass", post(handlers::pass))
        .route("/health", get(handlers::health));

    let router = match site {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router
            .route("/", get(site::index))
            .route("/index.html", get(site::index))
            .route("/index.js", get(site::script))
            .fallback(handlers::fallback),
    };

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(Extension(state)),
    )
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let method = request.method().as_str();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", method, path, request_id)
}

/// A bound starter, ready to serve.
#[derive(Debug)]
pub struct Starter {
    listener: TcpListener,
    config: Config,
    tls: Option<Arc<ServerConfig>>,
}

impl Starter {
    /// # Errors
    /// Returns an error if the address cannot be bound or the self-signed
    /// certificate cannot be generated.
    pub async fn bind(config: Config) -> Result<Self> {
        let tls = config
            .tls
            .as_deref()
            .map(tls::self_signed)
            .transpose()?
            .map(Arc::new);

        let listener = TcpListener::bind(config.addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.addr))?;

        Ok(Self {
            listener,
            config,
            tls,
        })
    }

    /// # Errors
    /// Returns an error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until a password decrypts and return it.
    ///
    /// The server is asked to stop as soon as the password is received; it
    /// gets `shutdown_grace` to finish open requests and is dropped after that.
    ///
    /// # Errors
    /// Returns an error if the server fails before a password was received.
    pub async fn run(self) -> Result<SecretString> {
        let (password_tx, password_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let addr = self.local_addr()?;
        let Self {
            listener,
            config,
            tls,
        } = self;
        let grace = config.shutdown_grace;

        let state = Arc::new(State::new(config.key_bits, password_tx));
        let app = router(state, config.site.as_deref());

        let mut server: JoinHandle<std::io::Result<()>> = match tls {
            None => {
                info!("Listening on http://{addr}");
                tokio::spawn(serve_plain(listener, app, stop_rx))
            }
            Some(tls) => {
                info!("Listening on https://{addr}");
                tokio::spawn(serve_tls(listener, app, tls, stop_rx, grace))
            }
        };

        // the sender lives in the router, so this also ends if the server dies
        let Ok(password) = password_rx.await else {
            server
                .await
                .context("starter task failed")?
                .context("starter server failed")?;
            return Err(anyhow!("starter stopped before a password was received"));
        };

        let _ = stop_tx.send(());

        match tokio::time::timeout(grace, &mut server).await {
            Ok(Ok(Ok(()))) => debug!("starter stopped"),
            Ok(Ok(Err(e))) => warn!("Starter server failed after the password was received: {e}"),
            Ok(Err(e)) => warn!("Starter task failed after the password was received: {e}"),
            Err(_) => {
                warn!("Connections still open after {grace:?}, dropping them");
                server.abort();
            }
        }

        Ok(password)
    }
}

async fn serve_plain(
    listener: TcpListener,
    app: Router,
    stop: oneshot::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = stop.await;
            info!("Gracefully shutdown");
        })
        .await
}

async fn serve_tls(
    listener: TcpListener,
    app: Router,
    tls: Arc<ServerConfig>,
    stop: oneshot::Receiver<()>,
    grace: Duration,
) -> std::io::Result<()> {
    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        let _ = stop.await;
        info!("Gracefully shutdown");
        shutdown.graceful_shutdown(Some(grace));
    });

    axum_server::from_tcp_rustls(listener.into_std()?, RustlsConfig::from_config(tls))
        .handle(handle)
        .serve(app.into_make_service())
        .await
}
