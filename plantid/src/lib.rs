//! # plantid: identify plants from uploaded photos
//!
//! `plantid` serves a single web form. A user uploads a photo of a plant, the image is stored on
//! local disk, sent to the [plant.id](https://plant.id) identification API, and the returned
//! suggestions are rendered back on the same page.
//!
//! ## Request Flow
//!
//! `POST /` with a multipart `file` field goes through
//! [`api::handlers::identify::identify_upload`]: the file name is sanitised, the bytes are written
//! to the upload directory, [`identification::IdentificationClient`] posts the base64-encoded
//! image upstream, and [`format::format_results`] turns the suggestions into the HTML fragment
//! shown on the page.
//!
//! Any failure along the way (no file, no API key, upstream error, unparsable response) becomes an
//! [`errors::Error`]. Converting it into a response redirects back to the form with a one-shot
//! [`flash`] message that the next `GET /` displays.
//!
//! There is no other state: no database, no cache, no background tasks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use plantid::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = plantid::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     plantid::telemetry::init_telemetry(config.debug)?;
//!
//!     Application::new(config)
//!         .await?
//!         .serve(async {
//!             tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!         })
//!         .await
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod config;
pub mod errors;
pub mod flash;
pub mod format;
pub mod identification;
pub mod telemetry;
pub mod templates;
pub mod uploads;

#[cfg(test)]
pub mod test_utils;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use bon::Builder;
pub use config::Config;
use identification::IdentificationClient;
use std::sync::Arc;
use templates::Templates;
use tokio::net::TcpListener;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};

/// URL prefix uploaded images are served under
pub const STATIC_PREFIX: &str = "/static";

/// Application state shared across all request handlers.
///
/// Everything here is read-only after startup; cloning is cheap.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub client: IdentificationClient,
    pub templates: Arc<Templates>,
}

/// Install the process-wide rustls crypto provider.
///
/// reqwest is built without a bundled provider, so this has to run before the first client is
/// built. Safe to call more than once.
pub fn install_crypto_provider() {
    // Err only means a provider is already installed
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// Build the application router with all routes and middleware.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> Router {
    let body_limit = match state.config.uploads.max_size {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };
    let uploads = ServeDir::new(&state.config.uploads.dir);

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route(
            "/",
            get(api::handlers::identify::show_form)
                .post(api::handlers::identify::identify_upload)
                .layer(body_limit),
        )
        .nest_service(STATIC_PREFIX, uploads)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns the router and configuration.
///
/// 1. **Create**: [`Application::new`] prepares the upload directory, the HTTP client and the
///    templates
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles requests until the
///    shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting plantid with configuration: {:#?}", config);

        install_crypto_provider();

        tokio::fs::create_dir_all(&config.uploads.dir).await.map_err(|e| {
            anyhow::anyhow!("Failed to create upload directory {}: {}", config.uploads.dir.display(), e)
        })?;

        let state = AppState::builder()
            .client(IdentificationClient::new(&config.identification)?)
            .templates(Arc::new(Templates::new()?))
            .config(config.clone())
            .build();

        let router = build_router(state);

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "plantid listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
