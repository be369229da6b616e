//! Service health and database diagnostics.

use crate::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::{error, instrument};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status: `UP` when every component is healthy
    pub status: String,
    pub database: ComponentHealth,
    pub service: ComponentHealth,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DbConnectivityResponse {
    pub sqlite_version: String,
    pub doctor_count: i64,
}

/// Report service and database health.
///
/// Always answers 200; a broken database shows up as a `DOWN` component
/// inside the body rather than as a transport-level failure, so monitors
/// can distinguish "service dead" from "database unreachable".
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Component health report", body = HealthResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.doctors.count().await {
        Ok(count) => ComponentHealth {
            status: "UP".to_string(),
            detail: Some(format!("{count} doctors registered")),
        },
        Err(e) => {
            error!("Database health check failed: {e}");
            ComponentHealth {
                status: "DOWN".to_string(),
                detail: Some(e.to_string()),
            }
        }
    };

    let status = if database.status == "UP" { "UP" } else { "DEGRADED" };
    Json(HealthResponse {
        status: status.to_string(),
        database,
        service: ComponentHealth {
            status: "UP".to_string(),
            detail: None,
        },
    })
}

/// Exercise database connectivity and report what we are connected to.
#[utoipa::path(
    get,
    path = "/test-db",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = DbConnectivityResponse),
        (status = 500, description = "Database unreachable")
    )
)]
#[instrument(skip(state))]
pub async fn test_db(
    State(state): State<AppState>,
) -> Result<Json<DbConnectivityResponse>, StatusCode> {
    let row = sqlx::query("SELECT sqlite_version() AS version")
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!("Database connectivity check failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let version: String = row.try_get("version").map_err(|e| {
        error!("Database connectivity check failed: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let doctor_count = state.doctors.count().await.map_err(|e| {
        error!("Database connectivity check failed: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(DbConnectivityResponse {
        sqlite_version: version,
        doctor_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app;
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_health_reports_up_with_count(pool: SqlitePool) {
        let server = create_test_app(pool).await;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: HealthResponse = response.json();
        assert_eq!(body.status, "UP");
        assert_eq!(body.database.status, "UP");
        assert_eq!(body.database.detail.as_deref(), Some("0 doctors registered"));
        assert_eq!(body.service.status, "UP");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_db_connectivity_reports_version_and_count(pool: SqlitePool) {
        let server = create_test_app(pool).await;

        let response = server.get("/test-db").await;
        response.assert_status_ok();

        let body: DbConnectivityResponse = response.json();
        assert!(!body.sqlite_version.is_empty());
        assert_eq!(body.doctor_count, 0);
    }
}
