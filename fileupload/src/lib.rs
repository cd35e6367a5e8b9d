//! # fileupload: named binary object storage over HTTP
//!
//! A small REST service that stores files (a name, the raw bytes and a content type) and
//! serves them back. Two independent collections are exposed:
//!
//! - **File contents** (`/api/file-contents`): created by multipart upload. The part's filename
//!   is sanitized before it becomes the record name.
//! - **Files** (`/api/files`): created from a JSON body through [`service::FileService`].
//!
//! Both support listing (optionally sorted), lookup by id, full-overwrite update and idempotent
//! delete. Mutating responses carry `x-fileuploadapp-*` alert headers, see [`api::headers`].
//!
//! ## Storage
//!
//! Records live behind the [`db::handlers::Repository`] trait. The `memory` database mode keeps
//! them in a concurrent map; the `external` mode uses PostgreSQL and runs the embedded migrations
//! on startup.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fileupload::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let app = Application::new(config).await?;
//!     app.serve(async { tokio::signal::ctrl_c().await.ok(); }).await
//! }
//! ```
//!
//! ## Other Endpoints
//!
//! - `GET /healthz`: liveness check
//! - `GET /api/docs`: interactive OpenAPI documentation
//! - `GET /internal/metrics`: Prometheus metrics, when `enable_metrics` is set

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod service;
pub mod telemetry;
pub mod types;
pub mod upload;

#[cfg(test)]
pub mod test_utils;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    api::handlers::{file_contents, files},
    config::{CorsOrigin, DatabaseConfig},
    db::{
        handlers::{InMemoryRepository, PgRepository, Repository},
        models::{file_contents::FileContentRecord, files::FileRecord},
    },
    openapi::ApiDoc,
    service::{FileService, FileServiceImpl},
};

pub use config::Config;

/// Shared state handed to every handler.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .file_contents(Arc::new(InMemoryRepository::<FileContentRecord>::new()))
///     .files(Arc::new(FileServiceImpl::new(Arc::new(InMemoryRepository::<FileRecord>::new()))))
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub file_contents: Arc<dyn Repository<FileContentRecord>>,
    pub files: Arc<dyn FileService>,
}

/// Get the database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect the configured store and build the application state.
///
/// Returns the pool as well when PostgreSQL is used, so it can be closed on shutdown.
pub async fn setup_storage(config: &Config) -> anyhow::Result<(AppState, Option<PgPool>)> {
    let (file_contents, file_repository, pool): (
        Arc<dyn Repository<FileContentRecord>>,
        Arc<dyn Repository<FileRecord>>,
        Option<PgPool>,
    ) = match &config.database {
        DatabaseConfig::Memory => {
            info!("Using in-memory storage; records are lost on restart");
            (
                Arc::new(InMemoryRepository::<FileContentRecord>::new()),
                Arc::new(InMemoryRepository::<FileRecord>::new()),
                None,
            )
        }
        DatabaseConfig::External { url, pool: settings } => {
            info!("Connecting to external PostgreSQL database");
            let pool = PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .min_connections(settings.min_connections)
                .acquire_timeout(settings.acquire_timeout())
                .idle_timeout(settings.idle_timeout())
                .max_lifetime(settings.max_lifetime())
                .connect(url)
                .await?;
            migrator().run(&pool).await?;
            (
                Arc::new(PgRepository::<FileContentRecord>::new(pool.clone())),
                Arc::new(PgRepository::<FileRecord>::new(pool.clone())),
                Some(pool),
            )
        }
    };

    let state = AppState::builder()
        .config(config.clone())
        .file_contents(file_contents)
        .files(Arc::new(FileServiceImpl::new(file_repository)) as Arc<dyn FileService>)
        .build();

    Ok((state, pool))
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins: Vec<HeaderValue> = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Url serializes a bare origin with a trailing slash, browsers send none
                origins.push(url.as_str().trim_end_matches('/').parse()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut exposed = vec![
        header::LOCATION,
        api::headers::ALERT_HEADER.clone(),
        api::headers::ERROR_HEADER.clone(),
        api::headers::PARAMS_HEADER.clone(),
    ];
    for name in &cors_config.exposed_headers {
        exposed.push(name.parse::<HeaderName>()?);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(cors_config.allow_credentials)
        .expose_headers(exposed);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

fn body_limit(config: &Config) -> DefaultBodyLimit {
    match config.limits.max_upload_size {
        0 => DefaultBodyLimit::disable(),
        max => DefaultBodyLimit::max(usize::try_from(max).unwrap_or(usize::MAX)),
    }
}

/// Build the application router with all endpoints and middleware.
///
/// Routes live under `/api`, next to `/healthz`, the OpenAPI UI at `/api/docs` and, when enabled,
/// `/internal/metrics`. The upload limit applies to every `/api` route since JSON bodies carry
/// content inline as base64.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route(
            "/api/file-contents",
            get(file_contents::list_file_contents)
                .post(file_contents::create_file_content)
                .put(file_contents::update_file_content),
        )
        .route(
            "/api/file-contents/{id}",
            get(file_contents::get_file_content).delete(file_contents::delete_file_content),
        )
        .route("/api/files", get(files::list_files).post(files::create_file).put(files::update_file))
        .route("/api/files/{id}", get(files::get_file).delete(files::delete_file))
        .layer(body_limit(&state.config))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(api_routes)
        .merge(Scalar::with_url("/api/docs", ApiDoc::openapi()));

    let mut router = router.layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A configured server, ready to listen.
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Connect storage and build the router
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting fileupload with configuration: {:#?}", config);
        let (state, pool) = setup_storage(&config).await?;
        let router = build_router(&state)?;
        Ok(Self { router, config, pool })
    }

    /// Build around an existing state, e.g. one holding pre-seeded repositories
    pub fn with_state(state: AppState) -> anyhow::Result<Self> {
        let router = build_router(&state)?;
        Ok(Self {
            router,
            config: state.config,
            pool: None,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "fileupload listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use axum::http::StatusCode;

    #[test_log::test(tokio::test)]
    async fn test_healthz() {
        let (server, _state) = create_test_app();
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[test_log::test(tokio::test)]
    async fn test_docs_are_served() {
        let (server, _state) = create_test_app();
        server.get("/api/docs").await.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_cors_exposes_alert_headers() {
        let (server, _state) = create_test_app();

        let response = server
            .get("/api/files")
            .add_header("origin", "https://app.example.com")
            .await;

        response.assert_status_ok();
        let exposed = response.header("access-control-expose-headers");
        let exposed = exposed.to_str().unwrap().to_ascii_lowercase();
        assert!(exposed.contains("location"));
        assert!(exposed.contains("x-fileuploadapp-alert"));
    }

    #[test_log::test(tokio::test)]
    async fn test_unknown_route_is_not_found() {
        let (server, _state) = create_test_app();
        server.get("/api/nothing-here").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_rejects_invalid_exposed_header() {
        let mut config = create_test_config();
        config.cors.exposed_headers = vec!["not a header".to_string()];
        assert!(create_cors_layer(&config).is_err());
    }
}
