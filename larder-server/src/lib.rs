//! Larder Server - HTTP API over the recipe feasibility engine
//!
//! Serves the product list, per-product units and recipe suggestions from a
//! catalog loaded once at startup.

pub mod health;
pub mod metrics;
pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use larder_catalog::Larder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use metrics::ServerMetrics;

/// Shared, read-only request state.
pub struct AppState {
    pub larder: Larder,
    pub metrics: ServerMetrics,
}

impl AppState {
    pub fn new(larder: Larder) -> Self {
        Self {
            larder,
            metrics: ServerMetrics::new(),
        }
    }
}

/// Options for starting the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerOpts {
    pub bind_host: String,
    pub port: u16,
    /// Value for `Access-Control-Allow-Origin`.
    pub http_origin: Option<String>,
    /// Allow any origin.
    pub debug: bool,
    /// PEM certificate chain; serve HTTPS together with `tls_key_file`.
    pub tls_cert_file: Option<PathBuf>,
    pub tls_key_file: Option<PathBuf>,
}

impl ServerOpts {
    /// Certificate and key paths, when TLS is configured.
    pub fn tls_files(&self) -> anyhow::Result<Option<(&PathBuf, &PathBuf)>> {
        match (&self.tls_cert_file, &self.tls_key_file) {
            (Some(cert), Some(key)) => Ok(Some((cert, key))),
            (None, None) => Ok(None),
            _ => anyhow::bail!("TLS needs both a certificate file and a key file"),
        }
    }
}

fn cors_layer(opts: &ServerOpts) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if opts.debug {
        return Ok(cors.allow_origin(Any));
    }
    match &opts.http_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid HTTP origin '{}'", origin))?;
            Ok(cors.allow_origin(origin))
        }
        None => Ok(cors),
    }
}

/// Build the full application router.
pub fn app(state: Arc<AppState>, opts: &ServerOpts) -> anyhow::Result<Router> {
    Ok(Router::new()
        .merge(routes::api_router(state.clone()))
        .merge(health::health_router(state))
        .layer(cors_layer(opts)?)
        .layer(TraceLayer::new_for_http()))
}

/// Serve the API until the listener shuts down.
pub async fn start_server(larder: Larder, opts: ServerOpts) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", opts.bind_host, opts.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", opts.bind_host, opts.port))?;

    let tls = opts.tls_files()?;
    let state = Arc::new(AppState::new(larder));
    let app = app(state, &opts)?;

    match tls {
        Some((cert, key)) => {
            let config = RustlsConfig::from_pem_file(cert, key)
                .await
                .with_context(|| format!("Failed to load TLS files {:?} and {:?}", cert, key))?;
            info!("Starting Larder server on https://{}", addr);
            axum_server::bind_rustls(addr, config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("Starting Larder server on {}", addr);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
