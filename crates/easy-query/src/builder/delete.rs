use super::QueryBuilder;
use crate::error::DbResult;
use crate::predicate::append_clause;
use crate::statement::{Statement, StatementKind};

impl<E> QueryBuilder<'_, E> {
    /// Compile `DELETE FROM <table> [WHERE ...]`.
    ///
    /// Without predicates every row is deleted; this is allowed and logged as a warning.
    pub(crate) fn compile_delete(&self) -> DbResult<Statement> {
        self.validate()?;

        let mut stmt = Statement::new(StatementKind::Delete);
        stmt.push("DELETE FROM ").push_ident(&self.table);

        if self.conditions.is_empty() {
            tracing::warn!(
                target: "easy_query::sql",
                table = %self.table,
                "DELETE without WHERE affects every row"
            );
        }
        append_clause(&mut stmt, "WHERE", &self.conditions);

        Ok(stmt)
    }
}
