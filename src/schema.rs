use sqlx::PgPool;

/// Table backing the `User` entity. Uniqueness of `username` is left to the
/// database constraint.
pub const CREATE_USERS: &str = r#"CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(80) NOT NULL UNIQUE
)"#;

/// Creates every table the service declares. Safe to run more than once.
#[tracing::instrument(level = "info", name = "create database schema", skip(db_pool))]
pub async fn create_all(db_pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query(CREATE_USERS)
        .execute(db_pool)
        .await
        .map_err(|err| {
            tracing::error!("failed to create schema: {:?}", err);
            err
        })?;
    Ok(())
}
