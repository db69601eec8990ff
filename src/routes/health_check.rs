use http::StatusCode;

/// Liveness probe; touches neither the database nor the broker.
pub async fn health_check() -> StatusCode {
    StatusCode::NO_CONTENT
}
