use super::{Limit, QueryBuilder};
use crate::error::DbResult;
use crate::record::Record;
use crate::statement::Statement;

/// Returned by [`CompileOnly::page`]: pagination needs a live count and never compiles
/// to a single statement.
pub const PAGE_COMPILE_ONLY_DIAGNOSTIC: &str =
    "page() needs two round trips and cannot run in compile-only mode";

/// A builder in compile-only mode.
///
/// Terminal operations compile and log exactly like [`QueryBuilder`]'s, then return the
/// [`Statement`] instead of running it. `Display` on the statement gives the SQL text
/// with literals inlined.
///
/// ```
/// use easy_query::Connection;
///
/// let conn = Connection::new(());
/// let stmt = conn
///     .table("profile")
///     .field("gender,count(1) as cnt")
///     .where_("id", "<", 400)
///     .group("gender")
///     .having("cnt", ">", 150)
///     .compile_only()
///     .select()?;
///
/// assert_eq!(
///     stmt.to_string(),
///     "SELECT gender,count(1) as cnt FROM `profile` WHERE id < 400 GROUP BY gender HAVING cnt > 150"
/// );
/// # Ok::<(), easy_query::DbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CompileOnly<'c, E> {
    inner: QueryBuilder<'c, E>,
}

impl<'c, E> CompileOnly<'c, E> {
    pub(super) fn new(inner: QueryBuilder<'c, E>) -> Self {
        Self { inner }
    }

    /// Leave compile-only mode, keeping the accumulated state.
    pub fn into_inner(self) -> QueryBuilder<'c, E> {
        self.inner
    }

    /// Borrow the underlying builder.
    pub fn builder(&self) -> &QueryBuilder<'c, E> {
        &self.inner
    }

    fn logged(&self, stmt: DbResult<Statement>) -> DbResult<Statement> {
        let stmt = stmt?;
        self.inner.conn.log(&stmt);
        Ok(stmt)
    }

    /// The SELECT with `LIMIT 0, 1` forced into the limit slot.
    pub fn find(&mut self) -> DbResult<Statement> {
        self.inner.limit = Some(Limit::FIRST);
        self.logged(self.inner.compile_select())
    }

    pub fn select(&self) -> DbResult<Statement> {
        self.logged(self.inner.compile_select())
    }

    pub fn count(&self) -> DbResult<Statement> {
        self.logged(self.inner.compile_count())
    }

    pub fn save(&self, data: &Record) -> DbResult<Statement> {
        self.logged(self.inner.compile_update(data))
    }

    pub fn delete(&self) -> DbResult<Statement> {
        self.logged(self.inner.compile_delete())
    }

    pub fn insert(&self, data: &Record) -> DbResult<Statement> {
        self.logged(self.inner.compile_insert(data))
    }

    /// Pagination is rejected in compile-only mode: always returns
    /// [`PAGE_COMPILE_ONLY_DIAGNOSTIC`] without compiling or running anything.
    pub fn page(&self, _page_size: u64, _page_number: u64) -> &'static str {
        PAGE_COMPILE_ONLY_DIAGNOSTIC
    }
}
