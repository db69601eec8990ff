use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::log_error_chain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub message: String,
    pub status: ConnectionStatus,
}

/// Always answers `200 OK`; a failed connection is reported in the body.
#[tracing::instrument(level = "info", name = "test database connection", skip(db_pool))]
pub async fn test_db_connection(State(db_pool): State<PgPool>) -> Json<ConnectionReport> {
    let report = match db_pool.acquire().await {
        Ok(_connection) => ConnectionReport {
            message: "Database connection successful".to_string(),
            status: ConnectionStatus::Success,
        },
        Err(err) => {
            log_error_chain(&err);
            ConnectionReport {
                message: err.to_string(),
                status: ConnectionStatus::Error,
            }
        }
    };
    Json(report)
}
