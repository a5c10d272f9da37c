use super::select::COUNT_ALIAS;
use super::{Limit, QueryBuilder};
use crate::client::Executor;
use crate::error::{DbError, DbResult};
use crate::record::Record;
use crate::row::{FromRow, Row};

impl<E: Executor> QueryBuilder<'_, E> {
    /// Return the first matching row, or `None` when nothing matched.
    ///
    /// Overwrites the limit slot with `LIMIT 0, 1` regardless of any earlier `limit`.
    pub async fn find(&mut self) -> DbResult<Option<Row>> {
        self.limit = Some(Limit::FIRST);
        let stmt = self.compile_select()?;
        let rows = self.conn.fetch(&stmt).await?;
        Ok(rows.into_iter().next())
    }

    /// [`QueryBuilder::find`] mapped through [`FromRow`].
    pub async fn find_as<T: FromRow>(&mut self) -> DbResult<Option<T>> {
        let row = self.find().await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Return every matching row.
    pub async fn select(&self) -> DbResult<Vec<Row>> {
        let stmt = self.compile_select()?;
        self.conn.fetch(&stmt).await
    }

    /// [`QueryBuilder::select`] mapped through [`FromRow`].
    pub async fn select_as<T: FromRow>(&self) -> DbResult<Vec<T>> {
        let rows = self.select().await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Count rows matching the WHERE/GROUP BY/HAVING state.
    ///
    /// Reads the total from the first returned row; no row counts as 0.
    pub async fn count(&self) -> DbResult<u64> {
        let stmt = self.compile_count()?;
        let rows = self.conn.fetch(&stmt).await?;
        let Some(row) = rows.first() else {
            return Ok(0);
        };
        let total: i64 = row.try_get(COUNT_ALIAS)?;
        u64::try_from(total).map_err(|e| DbError::decode(COUNT_ALIAS, e.to_string()))
    }

    /// Update matching rows with `data`; returns the affected-row count.
    pub async fn save(&self, data: &Record) -> DbResult<u64> {
        let stmt = self.compile_update(data)?;
        self.conn.run(&stmt).await
    }

    /// Delete matching rows; returns the affected-row count.
    pub async fn delete(&self) -> DbResult<u64> {
        let stmt = self.compile_delete()?;
        self.conn.run(&stmt).await
    }

    /// Insert one row from `data` (null values skipped); returns the affected-row count.
    pub async fn insert(&self, data: &Record) -> DbResult<u64> {
        let stmt = self.compile_insert(data)?;
        self.conn.run(&stmt).await
    }
}
