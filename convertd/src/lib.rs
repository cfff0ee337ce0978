//! # convertd: TXT to DOCX conversion service
//!
//! `convertd` is a small HTTP service that turns plain text into a Word-processing
//! (DOCX) document. Clients either upload a `.txt` file or submit an inline text
//! field; the service responds with a generated DOCX attachment containing one
//! paragraph per input line.
//!
//! ## Overview
//!
//! The whole system is a single request/response contract. A conversion request
//! carries exactly one text payload (file upload taking precedence over inline
//! text when both are present). The handler validates the input, splits it on
//! newline boundaries, appends each line as a paragraph to a fresh document, and
//! streams the serialized package back with a derived filename. Every entity is
//! request-scoped: there is no persistence and no shared mutable state, so
//! concurrent invocations are fully independent.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the
//! HTTP layer. The [`api`] module holds the handlers and their request/response
//! models, [`docx`] owns document assembly and filename derivation, and
//! [`errors`] translates every internal failure into a structured JSON error
//! response at the handler boundary. Configuration ([`config`]) is loaded from
//! YAML with environment overrides, and [`telemetry`] wires up structured
//! logging with optional OTLP export.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use convertd::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = convertd::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     convertd::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod docx;
pub mod errors;
mod openapi;
pub mod telemetry;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::{
    Router,
    routing::{get, post},
};
pub use config::Config;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// The service holds no connections or caches; the immutable configuration is
/// the only shared resource.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            // Origin headers never carry a path, so serialize just the URL origin
            // (Url::as_str would append a trailing slash that never matches)
            CorsOrigin::Url(url) => url.origin().ascii_serialization().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new().allow_origin(origins).allow_credentials(config.cors.allow_credentials);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// This constructs the complete Axum router with:
/// - The base API endpoints (`/api`, `/api/index`) for liveness checks
/// - The conversion endpoint (`/api/convert-txt-to-docx`) with its body limit
/// - OpenAPI documentation at `/docs` and `/api-docs/openapi.json`
/// - CORS configuration
/// - Tracing middleware
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    // API routes. The conversion endpoint gets a custom body limit since it
    // accepts file uploads; the others use the default.
    let api_routes = Router::new()
        .route("/api", get(api::handlers::status::index))
        .route("/api/index", get(api::handlers::status::index))
        .route(
            "/api/convert-txt-to-docx",
            post(api::handlers::convert::convert_txt_to_docx)
                .layer(DefaultBodyLimit::max(state.config.limits.max_upload_bytes as usize)),
        )
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Create CORS layer from config and apply it to the whole router
    let cors_layer = create_cors_layer(&state.config)?;
    let router = router.layer(cors_layer);

    // Add tracing layer
    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns the router and configuration.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] validates the configuration and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles requests
/// 3. **Shutdown**: when the shutdown signal resolves, in-flight requests drain and
///    telemetry is flushed
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with the router fully configured
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let state = AppState { config: config.clone() };
        let router = build_router(&state)?;
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
            "convertd listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        // Shutdown telemetry
        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::StatusCode;

    fn test_server() -> axum_test::TestServer {
        Application::new(Config::default()).expect("Failed to build application").into_test_server()
    }

    #[test_log::test(tokio::test)]
    async fn healthz_returns_ok() {
        let server = test_server();
        let response = server.get("/healthz").await;
        response.assert_status(StatusCode::OK);
        assert_eq!(response.text(), "OK");
    }

    #[test_log::test(tokio::test)]
    async fn openapi_spec_is_served() {
        let server = test_server();
        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status(StatusCode::OK);

        let spec: serde_json::Value = response.json();
        assert!(spec["paths"]["/api/convert-txt-to-docx"].is_object());
    }

    #[test_log::test(tokio::test)]
    async fn cors_headers_are_applied_to_allowed_origins() {
        let server = test_server();
        let response = server.get("/api").add_header("origin", "http://localhost:7700").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.header("access-control-allow-origin").to_str().unwrap(),
            "http://localhost:7700"
        );
    }
}
