//! Fluent statement builder.
//!
//! A [`QueryBuilder`] is minted by [`Connection::table`] and accumulates clause
//! fragments through consuming, chainable methods. A terminal operation (`find`,
//! `select`, `count`, `save`, `delete`, `insert`, `page`) compiles the accumulated
//! state into a [`Statement`](crate::Statement) and runs it through the connection's
//! executor.
//!
//! ## Design
//!
//! - Clause order is fixed: projection, FROM, join, WHERE, GROUP BY, HAVING, ORDER BY,
//!   LIMIT.
//! - WHERE and HAVING predicates are append-only; join, group, order and limit are
//!   single slots where the last call wins.
//! - Every literal is a bound parameter. Only projection, join, group, order and the
//!   `map_*` fragments are verbatim SQL.
//! - Terminal operations borrow the builder, so its state survives for reuse.

mod compile_only;
mod delete;
mod exec;
mod insert;
mod page;
mod select;
mod update;

pub use compile_only::{CompileOnly, PAGE_COMPILE_ONLY_DIAGNOSTIC};
pub use page::{Page, total_pages};
pub use select::COUNT_ALIAS;

use crate::connection::Connection;
use crate::error::{DbError, DbResult};
use crate::predicate::Predicate;
use crate::statement::template_markers;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Join flavor for [`QueryBuilder::join_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinType {
    type Err = DbError;

    fn from_str(s: &str) -> DbResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            other => Err(DbError::validation(format!("unknown join type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Join {
    kind: JoinType,
    table: String,
    on: String,
}

/// The `LIMIT offset, count` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: u64,
    pub count: u64,
}

impl Limit {
    /// The slot `find` forces: first row only.
    pub const FIRST: Limit = Limit { offset: 0, count: 1 };
}

/// Per-statement accumulator of clause fragments, bound to one table.
pub struct QueryBuilder<'c, E> {
    conn: &'c Connection<E>,
    table: String,
    fields: Option<String>,
    conditions: Vec<Predicate>,
    having: Vec<Predicate>,
    join: Option<Join>,
    group: Option<String>,
    order: Option<String>,
    limit: Option<Limit>,
    /// Build error (reported by the terminal operation)
    build_error: Option<String>,
}

impl<E> Clone for QueryBuilder<'_, E> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            table: self.table.clone(),
            fields: self.fields.clone(),
            conditions: self.conditions.clone(),
            having: self.having.clone(),
            join: self.join.clone(),
            group: self.group.clone(),
            order: self.order.clone(),
            limit: self.limit,
            build_error: self.build_error.clone(),
        }
    }
}

impl<E> fmt::Debug for QueryBuilder<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("table", &self.table)
            .field("fields", &self.fields)
            .field("conditions", &self.conditions)
            .field("having", &self.having)
            .field("join", &self.join)
            .field("group", &self.group)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<'c, E> QueryBuilder<'c, E> {
    pub(crate) fn new(conn: &'c Connection<E>, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
            fields: None,
            conditions: Vec::new(),
            having: Vec::new(),
            join: None,
            group: None,
            order: None,
            limit: None,
            build_error: None,
        }
    }

    /// The table this builder is bound to.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Current pagination slot.
    pub fn current_limit(&self) -> Option<Limit> {
        self.limit
    }

    /// Set the projection, inserted verbatim after `SELECT` (e.g. `"id,name"`).
    pub fn field(mut self, columns: &str) -> Self {
        self.fields = Some(columns.to_string());
        self
    }

    /// Append a `column op value` predicate. Named `where_` since `where` is reserved.
    pub fn where_(mut self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Predicate::compare(column, op, value));
        self
    }

    /// Append a predicate template whose `?` markers are bound to `values` in order.
    ///
    /// A `?` inside a single-quoted literal is plain text. Every other `?` is a marker,
    /// including PostgreSQL's jsonb `?`, `?|` and `?&` operators; use `jsonb_exists` and
    /// friends in templates instead.
    ///
    /// A marker/value count mismatch leaves the builder unchanged and is reported as
    /// [`DbError::Validation`] by the terminal operation.
    pub fn where_bind<I>(mut self, template: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let markers = template_markers(template).len();
        if markers != values.len() {
            self.build_error = Some(format!(
                "where_bind mismatch: template '{}' has {} '?', but {} values provided",
                template,
                markers,
                values.len()
            ));
            return self;
        }
        self.conditions.push(Predicate::Template {
            template: template.to_string(),
            values,
        });
        self
    }

    /// Append pre-formatted predicates verbatim (e.g. `"id BETWEEN 30 AND 300"`).
    ///
    /// **Warning**: fragments bypass parameter binding. Only use with trusted SQL.
    pub fn map_conditions<I>(mut self, fragments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.conditions
            .extend(fragments.into_iter().map(|f| Predicate::Raw(f.into())));
        self
    }

    /// Set `ORDER BY <expression>` (e.g. `"id desc"`).
    pub fn order(mut self, expression: &str) -> Self {
        self.order = Some(expression.to_string());
        self
    }

    /// Set `LIMIT 0, <count>`.
    pub fn limit(self, count: u64) -> Self {
        self.limit_offset(count, 0)
    }

    /// Set `LIMIT <offset>, <count>`.
    pub fn limit_offset(mut self, count: u64, offset: u64) -> Self {
        self.limit = Some(Limit { offset, count });
        self
    }

    /// Set an `INNER JOIN <table> ON <on>` clause.
    pub fn join(self, table: &str, on: &str) -> Self {
        self.join_with(JoinType::Inner, table, on)
    }

    /// Set a `<kind> JOIN <table> ON <on>` clause, replacing any previous join.
    pub fn join_with(mut self, kind: JoinType, table: &str, on: &str) -> Self {
        self.join = Some(Join {
            kind,
            table: table.to_string(),
            on: on.to_string(),
        });
        self
    }

    /// Set the `GROUP BY` field.
    pub fn group(mut self, field: &str) -> Self {
        self.group = Some(field.to_string());
        self
    }

    /// Append a `HAVING` predicate. Only emitted when [`QueryBuilder::group`] is set.
    pub fn having(mut self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.having.push(Predicate::compare(column, op, value));
        self
    }

    /// Append pre-formatted `HAVING` fragments verbatim.
    pub fn map_having<I>(mut self, fragments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.having
            .extend(fragments.into_iter().map(|f| Predicate::Raw(f.into())));
        self
    }

    /// Switch to compile-only mode: terminals return the statement instead of running it.
    pub fn compile_only(self) -> CompileOnly<'c, E> {
        CompileOnly::new(self)
    }

    fn validate(&self) -> DbResult<()> {
        if let Some(err) = &self.build_error {
            return Err(DbError::Validation(err.clone()));
        }
        Ok(())
    }
}
