use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use super::log_error_chain;
use crate::domain::DataRow;

const SELECT_ROWS: &str = "SELECT * FROM mytable";

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),
    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        log_error_chain(&self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[tracing::instrument(level = "info", name = "dump data rows", skip(db_pool))]
pub async fn get_data(State(db_pool): State<PgPool>) -> Result<Json<Vec<DataRow>>, DataError> {
    let mut connection = db_pool.acquire().await.map_err(DataError::Connection)?;
    let rows = sqlx::query_as::<_, DataRow>(SELECT_ROWS)
        .fetch_all(&mut connection)
        .await?;
    Ok(Json(rows))
}
