use super::QueryBuilder;
use crate::error::{DbError, DbResult};
use crate::predicate::append_clause;
use crate::record::Record;
use crate::statement::{Statement, StatementKind};

impl<E> QueryBuilder<'_, E> {
    /// Compile `UPDATE <table> SET c1 = v1,c2 = v2 [WHERE ...]`.
    ///
    /// Without predicates every row is updated; this is allowed and logged as a warning.
    pub(crate) fn compile_update(&self, data: &Record) -> DbResult<Statement> {
        self.validate()?;

        if data.is_empty() {
            return Err(DbError::validation(format!(
                "UPDATE `{}` requires at least one column to set",
                self.table
            )));
        }

        let mut stmt = Statement::new(StatementKind::Update);
        stmt.push("UPDATE ").push_ident(&self.table).push(" SET ");

        for (i, (column, value)) in data.iter().enumerate() {
            if i > 0 {
                stmt.push(",");
            }
            stmt.push(column).push(" = ").push_bind(value.clone());
        }

        if self.conditions.is_empty() {
            tracing::warn!(
                target: "easy_query::sql",
                table = %self.table,
                "UPDATE without WHERE affects every row"
            );
        }
        append_clause(&mut stmt, "WHERE", &self.conditions);

        Ok(stmt)
    }
}
