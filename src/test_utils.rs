//! Shared helpers for integration tests.

use axum_test::TestServer;
use sqlx::SqlitePool;

/// Build a test server on top of a migrated pool.
///
/// `#[sqlx::test]` hands each test its own pool with migrations already
/// applied, so the application is constructed directly on it rather than
/// going through database setup.
pub async fn create_test_app(pool: SqlitePool) -> TestServer {
    let config = create_test_config();

    crate::Application::new_with_pool(config, pool)
        .expect("Failed to create application")
        .into_test_server()
}

pub fn create_test_config() -> crate::config::Config {
    crate::config::Config {
        database: crate::config::DatabaseConfig::Memory,
        ..Default::default()
    }
}
