use super::QueryBuilder;
use crate::error::{DbError, DbResult};
use crate::record::Record;
use crate::statement::{Statement, StatementKind};

impl<E> QueryBuilder<'_, E> {
    /// Compile ``INSERT INTO `table`(`k1`,`k2`) VALUES(v1,v2)``.
    ///
    /// Columns whose value is `Null` are skipped entirely, leaving them to the column
    /// default. Remaining columns keep the record's order.
    pub(crate) fn compile_insert(&self, data: &Record) -> DbResult<Statement> {
        self.validate()?;

        let entries: Vec<_> = data.iter().filter(|(_, v)| !v.is_null()).collect();
        if entries.is_empty() {
            return Err(DbError::validation(format!(
                "INSERT INTO `{}` requires at least one non-null column",
                self.table
            )));
        }

        let mut stmt = Statement::new(StatementKind::Insert);
        stmt.push("INSERT INTO ").push_ident(&self.table).push("(");
        for (i, (column, _)) in entries.iter().enumerate() {
            if i > 0 {
                stmt.push(",");
            }
            stmt.push_ident(column);
        }

        stmt.push(") VALUES(");
        for (i, (_, value)) in entries.iter().enumerate() {
            if i > 0 {
                stmt.push(",");
            }
            stmt.push_bind((*value).clone());
        }
        stmt.push(")");

        Ok(stmt)
    }
}
