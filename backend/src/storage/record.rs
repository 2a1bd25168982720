//! Generic persistence for every [`Resource`] that lives in its own table.

use std::marker::PhantomData;
use std::str::FromStr;

use anyhow::Result;
use shared::{ParseEnumError, Resource};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite};

use crate::storage::DbConnection;

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Columns every record table starts with, in this order.
const META_COLUMNS: [&str; 4] = ["id", "user_id", "created_at", "updated_at"];

/// A [`Resource`] mapped onto a SQLite table.
pub trait Record: Resource {
    const TABLE: &'static str;
    /// Domain columns after the meta columns. `bind_columns` binds them in
    /// exactly this order.
    const COLUMNS: &'static [&'static str];
    /// Newest first. `rowid` breaks ties between equal timestamps.
    const ORDER_BY: &'static str;

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// Reads a text column into one of the shared string enums.
pub fn text_enum<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e| decode_error(column, e))
}

pub fn optional_text_enum<T>(row: &SqliteRow, column: &str) -> Result<Option<T>, sqlx::Error>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| value.parse().map_err(|e| decode_error(column, e)))
        .transpose()
}

pub fn decode_error<E>(column: &str, source: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

/// CRUD over one record table, always scoped to the owning user.
#[derive(Clone)]
pub struct RecordRepository<R> {
    db: DbConnection,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordRepository<R> {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    fn select_columns() -> String {
        META_COLUMNS
            .iter()
            .chain(R::COLUMNS.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn decode_all(rows: Vec<SqliteRow>) -> Result<Vec<R>> {
        let records = rows
            .iter()
            .map(R::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// All of a user's records, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = ? ORDER BY {}",
            Self::select_columns(),
            R::TABLE,
            R::ORDER_BY
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?;
        Self::decode_all(rows)
    }

    /// A single record. Records owned by another user are not found.
    pub async fn get(&self, user_id: &str, id: &str) -> Result<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ? AND user_id = ?",
            Self::select_columns(),
            R::TABLE
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.as_ref().map(R::from_row).transpose()?)
    }

    /// The newest of a user's records matching every `(column, value)` pair.
    /// Column names come from code, never from a request.
    pub async fn latest_where(&self, user_id: &str, filters: &[(&str, &str)]) -> Result<Option<R>> {
        let conditions: String = filters
            .iter()
            .map(|(column, _)| format!(" AND {} = ?", column))
            .collect();
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = ?{} ORDER BY {} LIMIT 1",
            Self::select_columns(),
            R::TABLE,
            conditions,
            R::ORDER_BY
        );
        let mut query = sqlx::query(&sql).bind(user_id);
        for (_, value) in filters {
            query = query.bind(*value);
        }
        let row = query.fetch_optional(self.db.pool()).await?;
        Ok(row.as_ref().map(R::from_row).transpose()?)
    }

    pub async fn insert(&self, record: &R) -> Result<()> {
        let columns = Self::select_columns();
        let placeholders = vec!["?"; META_COLUMNS.len() + R::COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            R::TABLE,
            columns,
            placeholders
        );
        let query = sqlx::query(&sql)
            .bind(record.id())
            .bind(record.user_id())
            .bind(record.created_at())
            .bind(record.updated_at());
        record.bind_columns(query).execute(self.db.pool()).await?;
        Ok(())
    }

    /// Writes every domain column plus `updated_at`. Returns false when no
    /// row matched.
    pub async fn update(&self, record: &R) -> Result<bool> {
        let assignments = R::COLUMNS
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {}, updated_at = ? WHERE id = ? AND user_id = ?",
            R::TABLE,
            assignments
        );
        let result = record
            .bind_columns(sqlx::query(&sql))
            .bind(record.updated_at())
            .bind(record.id())
            .bind(record.user_id())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no row matched.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ? AND user_id = ?", R::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
