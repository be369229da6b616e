//! # drctl: Doctor Profile Management Service
//!
//! `drctl` is a small web service for managing doctor profiles at a clinic or
//! hospital network. It provides JSON endpoints for creating, viewing,
//! editing, and deleting doctor records, plus case-insensitive search over
//! names, specializations, and hospital affiliations.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses SQLite for persistence, so a single binary and a
//! single file on disk is a complete deployment. Three layers:
//!
//! - The **API layer** ([`api`]) exposes the resource routes under
//!   `/doctors/*` plus health and diagnostics endpoints. Handlers parse
//!   requests, call the service, and shape responses.
//! - The **service layer** ([`service`]) owns the business rules: form
//!   validation, email uniqueness on create and update, and search dispatch.
//! - The **database layer** ([`db`]) uses the repository pattern to abstract
//!   data access; the doctors repository handles all queries and mutations
//!   against the `doctors` table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use drctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = drctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     drctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod service;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use crate::openapi::ApiDoc;
use axum::{
    Json, Router,
    http::HeaderValue,
    response::Redirect,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use service::DoctorService;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::DoctorId;

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub doctors: DoctorService,
}

/// Get the drctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to the configured database and run migrations.
async fn setup_database(config: &Config) -> anyhow::Result<SqlitePool> {
    let settings = config.database.pool_settings();
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&config.database.connection_string())
        .await?;

    migrator().run(&pool).await?;
    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = if config.cors_allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors_allowed_origins {
            origins.push(origin.parse::<HeaderValue>()?);
        }
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Build the application router with all endpoints and middleware.
///
/// The doctor resource lives under `/doctors/*`; the bare `/` redirects to
/// the listing. `/health` and `/test-db` sit at the root for monitors, and
/// the OpenAPI document is served at `/api-docs/openapi.json` with an
/// interactive reference at `/docs`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let doctor_routes = Router::new()
        .route("/", get(api::handlers::doctors::list_doctors))
        .route("/list", get(api::handlers::doctors::list_doctors))
        .route("/new", get(api::handlers::doctors::new_doctor_form))
        .route("/save", post(api::handlers::doctors::save_doctor))
        .route("/view/{id}", get(api::handlers::doctors::view_doctor))
        .route("/edit/{id}", get(api::handlers::doctors::edit_doctor))
        .route("/delete/{id}", get(api::handlers::doctors::delete_doctor))
        .route("/search", get(api::handlers::doctors::search_doctors));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/", get(|| async { Redirect::to("/doctors/list") }))
        .route("/health", get(api::handlers::health::health))
        .route("/test-db", get(api::handlers::health::test_db))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/doctors", doctor_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = setup_database(&config).await?;
        Self::from_pool(config, pool)
    }

    /// Create an application on an existing pool, skipping database setup.
    ///
    /// The pool is assumed to already have migrations applied.
    pub fn new_with_pool(config: Config, pool: SqlitePool) -> anyhow::Result<Self> {
        Self::from_pool(config, pool)
    }

    fn from_pool(config: Config, pool: SqlitePool) -> anyhow::Result<Self> {
        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .doctors(DoctorService::new(pool.clone()))
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
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
            "Doctor management service listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
