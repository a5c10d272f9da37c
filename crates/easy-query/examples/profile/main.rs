//! Walk through every terminal operation against a `profile` table.
//!
//! Run with:
//!   cargo run --example profile -p easy-query
//!
//! Connection options come from `.env` or the environment:
//!   EASY_QUERY_HOST=127.0.0.1
//!   EASY_QUERY_USER=postgres
//!   EASY_QUERY_DATABASE=easy_query_example
//!   EASY_QUERY_PASSWORD=postgres
//!   EASY_QUERY_DEBUG=true
//!
//! Set `RUST_LOG=easy_query=debug` to see the compiled statements.

use easy_query::{ConnectOptions, Connection, DbResult, FromRow, JoinType, Record, Row};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
#[allow(dead_code)]
struct Profile {
    id: i64,
    name: String,
    gender: String,
}

impl FromRow for Profile {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            gender: row.try_get("gender")?,
        })
    }
}

#[tokio::main]
async fn main() -> DbResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("easy_query=info")),
        )
        .init();

    let conn = Connection::connect(&ConnectOptions::from_env()?)?;

    conn.raw_execute(
        "CREATE TABLE IF NOT EXISTS profile (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            gender TEXT NOT NULL DEFAULT 'female',
            remark TEXT
        )",
    )
    .await?;
    conn.raw_execute("DELETE FROM profile").await?;

    // ============================================
    // insert: null values are left to the column default
    // ============================================
    println!("=== insert ===");
    for id in 1..=45_i64 {
        let gender = if id % 3 == 0 { "male" } else { "female" };
        let record = Record::new()
            .set("id", id)
            .set("name", format!("user{id}"))
            .set("gender", gender)
            .set("remark", Option::<&str>::None);
        conn.table("profile").insert(&record).await?;
    }

    // ============================================
    // find: always LIMIT 0, 1
    // ============================================
    println!("=== find ===");
    let newest: Option<Profile> = conn
        .table("profile")
        .field("id,name,gender")
        .order("id desc")
        .find_as()
        .await?;
    println!("{newest:?}");

    // ============================================
    // select with GROUP BY / HAVING
    // ============================================
    println!("=== select ===");
    let groups = conn
        .table("profile")
        .field("gender,count(1) as cnt")
        .where_("id", "<", 400)
        .group("gender")
        .map_having(["count(1) > 10"])
        .select()
        .await?;
    for row in &groups {
        println!("{}", row.to_json());
    }

    // ============================================
    // compile only: inspect the statement without running it
    // ============================================
    println!("=== compile_only ===");
    let stmt = conn
        .table("profile")
        .where_("gender", "=", "female")
        .where_bind("id BETWEEN ? AND ?", [30, 300])
        .limit(3)
        .compile_only()
        .select()?;
    println!("{stmt}");

    // ============================================
    // save / count / page / delete
    // ============================================
    println!("=== save ===");
    let updated = conn
        .table("profile")
        .where_("gender", "=", "female")
        .where_("id", "<", 30)
        .save(&Record::new().set("remark", "early"))
        .await?;
    println!("updated {updated} rows");

    println!("=== count ===");
    let total = conn
        .table("profile")
        .where_("id", "<", 400)
        .where_("gender", "=", "female")
        .count()
        .await?;
    println!("{total} matching rows");

    println!("=== page ===");
    let page = conn
        .table("profile")
        .where_("id", "<", 400)
        .where_("gender", "=", "female")
        .order("id")
        .page_as::<Profile>(10, 3)
        .await?;
    println!(
        "page {}/{} ({} rows total): {:?}",
        page.current_page, page.total_pages, page.total_count, page.rows
    );

    println!("=== join ===");
    let joined = conn
        .table("profile")
        .field("profile.id, p2.name AS next_name")
        .join_with(JoinType::Left, "profile p2", "p2.id = profile.id + 1")
        .where_("profile.id", "<", 5)
        .order("profile.id")
        .select()
        .await?;
    println!("{} joined rows", joined.len());

    println!("=== delete ===");
    let deleted = conn
        .table("profile")
        .where_("gender", "=", "male")
        .delete()
        .await?;
    println!("deleted {deleted} rows");

    Ok(())
}
