//! Executor trait: the capability that runs compiled statements.

use crate::error::DbResult;
use crate::row::Row;
use crate::statement::Statement;

/// A trait that unifies anything able to run a [`Statement`].
///
/// Implemented for `tokio_postgres::Client` and, with the `pool` feature, for
/// `deadpool_postgres::Pool` / `deadpool_postgres::Client`. Tests and alternative drivers
/// implement it directly. Failures are returned unchanged to the caller.
pub trait Executor: Send + Sync {
    /// Run a statement that returns rows.
    fn query(
        &self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = DbResult<Vec<Row>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, stmt: &Statement)
    -> impl std::future::Future<Output = DbResult<u64>> + Send;
}

impl<E: Executor> Executor for &E {
    async fn query(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        (**self).query(stmt).await
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        (**self).execute(stmt).await
    }
}

impl<E: Executor> Executor for std::sync::Arc<E> {
    async fn query(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        (**self).query(stmt).await
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        (**self).execute(stmt).await
    }
}
