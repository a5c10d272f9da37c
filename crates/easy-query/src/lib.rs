//! # easy-query
//!
//! A fluent SQL statement builder with a pluggable executor.
//!
//! ## Features
//!
//! - **Fluent builder**: bind a table, chain clause methods, finish with a terminal operation
//! - **Parameter-safe**: every literal is a bound value, never concatenated into SQL text
//! - **Pluggable execution**: anything implementing [`Executor`] can run statements
//! - **Compile-only mode**: return the compiled [`Statement`] instead of running it
//! - **Pagination**: `page()` returns totals plus one page of rows
//! - **Debug logging**: compiled statements are traced under `easy_query::sql`
//!
//! ## Usage
//!
//! ```ignore
//! use easy_query::{ConnectOptions, Connection, Record};
//!
//! let conn = Connection::connect(&ConnectOptions::from_env()?)?;
//!
//! // SELECT ... LIMIT 0, 1
//! let first = conn.table("profile").field("id,name").order("id desc").find().await?;
//!
//! // SELECT count(1) AS total ...
//! let total = conn.table("profile").where_("gender", "=", "female").count().await?;
//!
//! // UPDATE
//! conn.table("profile")
//!     .where_("id", "=", 1)
//!     .save(&Record::new().set("name", "y"))
//!     .await?;
//!
//! // Pagination
//! let page = conn.table("profile").order("id").page(20, 3).await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod predicate;
pub mod record;
pub mod row;
pub mod statement;
pub mod value;

mod pg;

pub use builder::{
    COUNT_ALIAS, CompileOnly, JoinType, Limit, PAGE_COMPILE_ONLY_DIAGNOSTIC, Page, QueryBuilder,
    total_pages,
};
pub use client::Executor;
pub use config::ConnectOptions;
pub use connection::{Connection, DEFAULT_MAX_LOGGED_SQL};
pub use error::{DbError, DbResult};
pub use pg::decode_row;
pub use predicate::Predicate;
pub use record::Record;
pub use row::{FromRow, Row};
pub use statement::{Statement, StatementKind};
pub use value::{FromValue, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::create_pool;
