//! Compiled statement representation.
//!
//! A [`Statement`] keeps SQL text, identifiers, bound values and the pagination slot as
//! separate fragments. One formatter renders them in three forms:
//!
//! - [`Statement::sql`]: canonical text with `` `ident` `` quoting, `?` placeholders and
//!   `LIMIT offset, count`
//! - [`Statement::to_postgres`]: `"ident"` quoting, `$1, $2, ...` placeholders and
//!   `LIMIT count OFFSET offset`
//! - `Display`: canonical text with every bound value inlined as a literal
//!
//! # Example
//!
//! ```
//! use easy_query::{Statement, StatementKind, Value};
//!
//! let mut stmt = Statement::new(StatementKind::Select);
//! stmt.push("SELECT * FROM ")
//!     .push_ident("profile")
//!     .push(" WHERE gender = ")
//!     .push_bind(Value::from("female"));
//!
//! assert_eq!(stmt.sql(), "SELECT * FROM `profile` WHERE gender = ?");
//! assert_eq!(stmt.to_postgres(), r#"SELECT * FROM "profile" WHERE gender = $1"#);
//! assert_eq!(stmt.to_string(), "SELECT * FROM `profile` WHERE gender = 'female'");
//! ```

use crate::value::Value;
use std::fmt;

/// The kind of statement, used for logging and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Count,
    Insert,
    Update,
    Delete,
    /// Hand-written SQL passed through unchanged.
    Raw,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Count => "count",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Raw => "raw",
        }
    }

    /// Whether the statement returns rows (as opposed to an affected-row count).
    pub fn returns_rows(self) -> bool {
        matches!(self, StatementKind::Select | StatementKind::Count)
    }
}

/// Byte offsets of the `?` markers in `template`, skipping any inside single-quoted
/// literals. An escaped quote (`''`) toggles twice and stays inside the literal.
pub fn template_markers(template: &str) -> Vec<usize> {
    let mut in_literal = false;
    template
        .char_indices()
        .filter_map(|(i, c)| match c {
            '\'' => {
                in_literal = !in_literal;
                None
            }
            '?' if !in_literal => Some(i),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    Raw(String),
    Ident(String),
    Param,
    Limit { offset: u64, count: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Canonical,
    Postgres,
    Inline,
}

/// A compiled SQL statement with its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    fragments: Vec<Fragment>,
    params: Vec<Value>,
}

impl Statement {
    /// Create an empty statement.
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            fragments: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Wrap hand-written SQL. The text is used verbatim in every rendering.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            kind: StatementKind::Raw,
            fragments: vec![Fragment::Raw(sql.into())],
            params: Vec::new(),
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Bound values, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.fragments.last_mut() {
            Some(Fragment::Raw(last)) => last.push_str(sql),
            _ => self.fragments.push(Fragment::Raw(sql.to_string())),
        }
        self
    }

    /// Append a quoted identifier (table or column name).
    pub fn push_ident(&mut self, name: &str) -> &mut Self {
        self.fragments.push(Fragment::Ident(name.to_string()));
        self
    }

    /// Append a value.
    ///
    /// `Null` is written as the bare `NULL` token so that `IS NULL` style predicates
    /// stay valid; every other value becomes a placeholder.
    pub fn push_bind(&mut self, value: Value) -> &mut Self {
        if value.is_null() {
            return self.push("NULL");
        }
        self.fragments.push(Fragment::Param);
        self.params.push(value);
        self
    }

    /// Append a template whose `?` markers are bound, in order, to `values`.
    ///
    /// Markers inside single-quoted literals are left as text (see [`template_markers`]).
    /// The caller guarantees the marker count matches `values.len()`.
    pub fn push_template(&mut self, template: &str, values: &[Value]) -> &mut Self {
        let mut values = values.iter();
        let mut start = 0;
        for pos in template_markers(template) {
            self.push(&template[start..pos]);
            if let Some(v) = values.next() {
                self.push_bind(v.clone());
            }
            start = pos + 1;
        }
        self.push(&template[start..])
    }

    /// Append the pagination slot.
    pub fn push_limit(&mut self, offset: u64, count: u64) -> &mut Self {
        self.fragments.push(Fragment::Limit { offset, count });
        self
    }

    /// Canonical SQL text with `?` placeholders.
    pub fn sql(&self) -> String {
        self.render(Style::Canonical).0
    }

    /// Byte offsets of every `?` placeholder within [`Statement::sql`].
    pub fn placeholders(&self) -> Vec<usize> {
        self.render(Style::Canonical).1
    }

    /// SQL text for PostgreSQL: numbered placeholders and double-quoted identifiers.
    pub fn to_postgres(&self) -> String {
        self.render(Style::Postgres).0
    }

    fn render(&self, style: Style) -> (String, Vec<usize>) {
        let mut out = String::new();
        let mut positions = Vec::with_capacity(self.params.len());
        let mut params = self.params.iter();

        for fragment in &self.fragments {
            match fragment {
                Fragment::Raw(s) => out.push_str(s),
                Fragment::Ident(name) => match style {
                    Style::Postgres => {
                        out.push('"');
                        out.push_str(&name.replace('"', "\"\""));
                        out.push('"');
                    }
                    Style::Canonical | Style::Inline => {
                        out.push('`');
                        out.push_str(&name.replace('`', "``"));
                        out.push('`');
                    }
                },
                Fragment::Param => {
                    positions.push(out.len());
                    match style {
                        Style::Canonical => out.push('?'),
                        Style::Postgres => {
                            out.push('$');
                            out.push_str(&positions.len().to_string());
                        }
                        Style::Inline => {
                            let literal = params.next().map_or_else(
                                || "NULL".to_string(),
                                Value::to_literal,
                            );
                            out.push_str(&literal);
                        }
                    }
                }
                Fragment::Limit { offset, count } => match style {
                    Style::Postgres => {
                        out.push_str(&format!("LIMIT {count} OFFSET {offset}"));
                    }
                    Style::Canonical | Style::Inline => {
                        out.push_str(&format!("LIMIT {offset}, {count}"));
                    }
                },
            }
        }

        (out, positions)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Style::Inline).0)
    }
}
