use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// One row of `mytable` as returned by `GET /data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRow {
    pub id: i64,
    pub name: Option<String>,
}

/// Columns are read by position: the first is the identifier, the second the
/// name, whatever they are called. Any integer width is accepted for the id.
impl<'r> FromRow<'r, PgRow> for DataRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id = match row.try_get::<i64, _>(0) {
            Ok(id) => id,
            Err(sqlx::Error::ColumnDecode { .. }) => match row.try_get::<i32, _>(0) {
                Ok(id) => i64::from(id),
                Err(sqlx::Error::ColumnDecode { .. }) => i64::from(row.try_get::<i16, _>(0)?),
                Err(err) => return Err(err),
            },
            Err(err) => return Err(err),
        };
        let name = row.try_get(1)?;
        Ok(Self { id, name })
    }
}
