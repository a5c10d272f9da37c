//! Filter predicates for WHERE and HAVING.

use crate::statement::Statement;
use crate::value::Value;

/// One `column operator literal` fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column op value`; the value is bound, never concatenated.
    Compare {
        column: String,
        op: String,
        value: Value,
    },
    /// Pre-formatted SQL used verbatim.
    ///
    /// **Warning**: This bypasses parameter binding. Only use with trusted SQL.
    Raw(String),
    /// SQL with `?` markers bound to `values` in order.
    Template { template: String, values: Vec<Value> },
}

impl Predicate {
    pub fn compare(
        column: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Predicate::Compare {
            column: column.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Predicate::Raw(sql.into())
    }

    pub fn append_to(&self, stmt: &mut Statement) {
        match self {
            Predicate::Compare { column, op, value } => {
                stmt.push(column).push(" ").push(op).push(" ");
                stmt.push_bind(value.clone());
            }
            Predicate::Raw(sql) => {
                stmt.push(sql);
            }
            Predicate::Template { template, values } => {
                stmt.push_template(template, values);
            }
        }
    }
}

/// Append `keyword` followed by `predicates` joined by `" AND "`; no-op when empty.
pub(crate) fn append_clause(stmt: &mut Statement, keyword: &str, predicates: &[Predicate]) {
    if predicates.is_empty() {
        return;
    }
    stmt.push(" ").push(keyword).push(" ");
    for (i, p) in predicates.iter().enumerate() {
        if i > 0 {
            stmt.push(" AND ");
        }
        p.append_to(stmt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::StatementKind;

    #[test]
    fn compare_binds_value() {
        let mut stmt = Statement::new(StatementKind::Select);
        Predicate::compare("gender", "=", "female").append_to(&mut stmt);
        assert_eq!(stmt.sql(), "gender = ?");
        assert_eq!(stmt.to_string(), "gender = 'female'");
    }

    #[test]
    fn clause_joins_with_and() {
        let mut stmt = Statement::new(StatementKind::Select);
        stmt.push("SELECT 1");
        append_clause(
            &mut stmt,
            "WHERE",
            &[
                Predicate::compare("id", "<", 400),
                Predicate::raw("id BETWEEN 30 AND 300"),
            ],
        );
        assert_eq!(
            stmt.to_string(),
            "SELECT 1 WHERE id < 400 AND id BETWEEN 30 AND 300"
        );
    }

    #[test]
    fn empty_clause_is_omitted() {
        let mut stmt = Statement::new(StatementKind::Select);
        stmt.push("SELECT 1");
        append_clause(&mut stmt, "WHERE", &[]);
        assert_eq!(stmt.sql(), "SELECT 1");
    }
}
