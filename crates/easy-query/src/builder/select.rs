use super::QueryBuilder;
use crate::error::DbResult;
use crate::predicate::append_clause;
use crate::statement::{Statement, StatementKind};

/// Column alias the COUNT statement reads its total from.
pub const COUNT_ALIAS: &str = "total";

impl<E> QueryBuilder<'_, E> {
    /// Compile the SELECT statement.
    pub(crate) fn compile_select(&self) -> DbResult<Statement> {
        self.validate()?;

        let mut stmt = Statement::new(StatementKind::Select);
        stmt.push("SELECT ")
            .push(self.fields.as_deref().unwrap_or("*"))
            .push(" FROM ")
            .push_ident(&self.table);

        if let Some(join) = &self.join {
            stmt.push(" ")
                .push(join.kind.as_str())
                .push(" JOIN ")
                .push(&join.table)
                .push(" ON ")
                .push(&join.on);
        }

        self.append_filters(&mut stmt);

        if let Some(order) = &self.order {
            stmt.push(" ORDER BY ").push(order);
        }

        if let Some(limit) = self.limit {
            stmt.push(" ").push_limit(limit.offset, limit.count);
        }

        Ok(stmt)
    }

    /// Compile the COUNT statement: same filters as SELECT, no join/order/limit.
    pub(crate) fn compile_count(&self) -> DbResult<Statement> {
        self.validate()?;

        let mut stmt = Statement::new(StatementKind::Count);
        stmt.push("SELECT count(1) AS ")
            .push(COUNT_ALIAS)
            .push(" FROM ")
            .push_ident(&self.table);

        self.append_filters(&mut stmt);

        Ok(stmt)
    }

    /// WHERE, GROUP BY and HAVING (HAVING only alongside GROUP BY).
    fn append_filters(&self, stmt: &mut Statement) {
        append_clause(stmt, "WHERE", &self.conditions);

        match &self.group {
            Some(group) => {
                stmt.push(" GROUP BY ").push(group);
                append_clause(stmt, "HAVING", &self.having);
            }
            None if !self.having.is_empty() => {
                tracing::debug!(
                    target: "easy_query::sql",
                    table = %self.table,
                    dropped = self.having.len(),
                    "HAVING predicates ignored without GROUP BY"
                );
            }
            None => {}
        }
    }
}
