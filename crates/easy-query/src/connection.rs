//! Connection handle: owns the executor and mints statement builders.

use crate::builder::QueryBuilder;
use crate::client::Executor;
use crate::error::DbResult;
use crate::row::Row;
use crate::statement::Statement;

/// Default cap (in bytes) on logged SQL text.
pub const DEFAULT_MAX_LOGGED_SQL: usize = 1024;

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A long-lived handle around an [`Executor`] plus the debug flag.
///
/// # Example
///
/// ```ignore
/// use easy_query::{ConnectOptions, Connection};
///
/// let conn = Connection::connect(&ConnectOptions::new("127.0.0.1", "root", "test").debug(true))?;
/// let first = conn.table("profile").field("id,name").order("id desc").find().await?;
/// ```
#[derive(Debug)]
pub struct Connection<E> {
    executor: E,
    debug: bool,
    max_logged_sql: Option<usize>,
}

#[cfg(feature = "pool")]
impl Connection<deadpool_postgres::Pool> {
    /// Build a pooled PostgreSQL connection handle from options.
    ///
    /// Fails with [`crate::DbError::Connection`] when the pool cannot be constructed.
    pub fn connect(options: &crate::config::ConnectOptions) -> DbResult<Self> {
        let pool = crate::pool::create_pool(options)?;
        Ok(Self::new(pool).debug(options.debug))
    }
}

impl<E> Connection<E> {
    /// Wrap an executor. Debug logging starts disabled.
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            debug: false,
            max_logged_sql: Some(DEFAULT_MAX_LOGGED_SQL),
        }
    }

    /// Log every compiled statement under the `easy_query::sql` target.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Truncate logged SQL to `len` bytes. `None` disables truncation.
    pub fn max_logged_sql(mut self, len: Option<usize>) -> Self {
        self.max_logged_sql = len;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Start a statement builder bound to `name`. No schema lookup is performed.
    pub fn table(&self, name: &str) -> QueryBuilder<'_, E> {
        QueryBuilder::new(self, name)
    }

    pub(crate) fn log(&self, stmt: &Statement) {
        if !self.debug {
            return;
        }
        let sql = stmt.sql();
        let shown = match self.max_logged_sql {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(&sql, max)),
            _ => sql,
        };
        tracing::info!(
            target: "easy_query::sql",
            kind = stmt.kind().as_str(),
            sql = %shown,
            params = ?stmt.params(),
            "[easy_query]"
        );
    }
}

impl<E: Executor> Connection<E> {
    /// Run hand-written SQL that returns rows. The text is not inspected.
    pub async fn raw_query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.fetch(&Statement::raw(sql)).await
    }

    /// Run hand-written SQL and return the affected-row count.
    pub async fn raw_execute(&self, sql: &str) -> DbResult<u64> {
        self.run(&Statement::raw(sql)).await
    }

    pub(crate) async fn fetch(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        self.log(stmt);
        self.executor.query(stmt).await
    }

    pub(crate) async fn run(&self, stmt: &Statement) -> DbResult<u64> {
        self.log(stmt);
        self.executor.execute(stmt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundary() {
        let sql = "SELECT 'é'";
        // 'é' is two bytes starting at index 8
        assert_eq!(truncate_sql_bytes(sql, 9), "SELECT '");
        assert_eq!(truncate_sql_bytes(sql, 100), sql);
    }

    #[test]
    fn table_binds_name() {
        let conn = Connection::new(()).debug(true);
        assert!(conn.is_debug());
        assert_eq!(conn.table("profile").table_name(), "profile");
    }
}
