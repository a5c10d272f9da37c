//! PostgreSQL executor implementations.
//!
//! Statements are rendered with [`Statement::to_postgres`] and their [`Value`]s are bound
//! as parameters. Result rows are decoded into [`Row`]s column by column.

use crate::client::Executor;
use crate::error::{DbError, DbResult};
use crate::row::Row;
use crate::statement::Statement;
use crate::value::Value;
use tokio_postgres::types::{FromSql, ToSql, Type};

fn bind_params(stmt: &Statement) -> Vec<&(dyn ToSql + Sync)> {
    stmt.params()
        .iter()
        .map(|v| v as &(dyn ToSql + Sync))
        .collect()
}

fn get<'a, T>(row: &'a tokio_postgres::Row, idx: usize, column: &str) -> DbResult<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get(idx)
        .map_err(|e| DbError::decode(column, e.to_string()))
}

fn decode_column(
    row: &tokio_postgres::Row,
    idx: usize,
    column: &str,
    ty: &Type,
) -> DbResult<Value> {
    let value = match *ty {
        Type::BOOL => get::<bool>(row, idx, column)?.into(),
        Type::INT2 => get::<i16>(row, idx, column)?.into(),
        Type::INT4 => get::<i32>(row, idx, column)?.into(),
        Type::INT8 => get::<i64>(row, idx, column)?.into(),
        Type::OID => get::<u32>(row, idx, column)?.into(),
        Type::FLOAT4 => get::<f32>(row, idx, column)?.into(),
        Type::FLOAT8 => get::<f64>(row, idx, column)?.into(),
        Type::NUMERIC => get::<rust_decimal::Decimal>(row, idx, column)?.into(),
        Type::UUID => get::<uuid::Uuid>(row, idx, column)?
            .map(|u| u.to_string())
            .into(),
        Type::DATE => get::<chrono::NaiveDate>(row, idx, column)?
            .map(|d| d.to_string())
            .into(),
        Type::TIMESTAMP => get::<chrono::NaiveDateTime>(row, idx, column)?
            .map(|t| t.to_string())
            .into(),
        Type::TIMESTAMPTZ => get::<chrono::DateTime<chrono::Utc>>(row, idx, column)?
            .map(|t| t.to_rfc3339())
            .into(),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx, column)?
            .map(|j| j.to_string())
            .into(),
        _ if <String as FromSql<'_>>::accepts(ty) => get::<String>(row, idx, column)?.into(),
        _ => {
            return Err(DbError::decode(
                column,
                format!("unsupported column type {ty}"),
            ));
        }
    };
    Ok(value)
}

/// Decode a driver row into a [`Row`].
pub fn decode_row(row: &tokio_postgres::Row) -> DbResult<Row> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let value = decode_column(row, idx, col.name(), col.type_())?;
            Ok((col.name().to_string(), value))
        })
        .collect()
}

impl Executor for tokio_postgres::Client {
    async fn query(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        let sql = stmt.to_postgres();
        let params = bind_params(stmt);
        let rows = tokio_postgres::Client::query(self, sql.as_str(), &params).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let sql = stmt.to_postgres();
        let params = bind_params(stmt);
        Ok(tokio_postgres::Client::execute(self, sql.as_str(), &params).await?)
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn query(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper -> tokio_postgres::Client).
        let client: &tokio_postgres::Client = self;
        Executor::query(client, stmt).await
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let client: &tokio_postgres::Client = self;
        Executor::execute(client, stmt).await
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Pool {
    async fn query(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        let client = self.get().await?;
        Executor::query(&client, stmt).await
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let client = self.get().await?;
        Executor::execute(&client, stmt).await
    }
}
