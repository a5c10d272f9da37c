use easy_query::{
    COUNT_ALIAS, Connection, DbError, DbResult, Executor, FromRow, Record, Row, Statement,
    StatementKind, Value,
};
use std::sync::Mutex;

/// In-memory executor: records every statement and answers with canned data.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Statement>>,
    rows: Vec<Row>,
    total: Option<i64>,
    affected: u64,
    fail: bool,
}

impl Recorder {
    fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            total: Some(rows.len() as i64),
            rows,
            ..Default::default()
        }
    }

    fn seen(&self) -> Vec<Statement> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, stmt: &Statement) -> DbResult<()> {
        self.seen.lock().unwrap().push(stmt.clone());
        if self.fail {
            return Err(DbError::Other("connection reset".to_string()));
        }
        Ok(())
    }
}

impl Executor for Recorder {
    async fn query(&self, stmt: &Statement) -> DbResult<Vec<Row>> {
        self.record(stmt)?;
        if stmt.kind() == StatementKind::Count {
            return Ok(self
                .total
                .map(|t| vec![Row::from_iter([(COUNT_ALIAS.to_string(), Value::Int(t))])])
                .unwrap_or_default());
        }
        Ok(self.rows.clone())
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        self.record(stmt)?;
        Ok(self.affected)
    }
}

fn profile(id: i64, name: &str) -> Row {
    Row::new(
        vec!["id".into(), "name".into()],
        vec![Value::Int(id), Value::from(name)],
    )
}

#[derive(Debug, PartialEq)]
struct Profile {
    id: i64,
    name: String,
}

impl FromRow for Profile {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

#[tokio::test]
async fn find_returns_first_row() {
    let conn = Connection::new(Recorder::with_rows(vec![profile(3, "c"), profile(2, "b")]));
    let mut q = conn.table("profile").field("id,name").order("id desc").limit(10);

    let row = q.find().await.unwrap().unwrap();
    assert_eq!(row.try_get::<i64>("id").unwrap(), 3);

    let seen = conn.executor().seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].sql(),
        "SELECT id,name FROM `profile` ORDER BY id desc LIMIT 0, 1"
    );
}

#[tokio::test]
async fn find_without_rows_is_none() {
    let conn = Connection::new(Recorder::default());
    let found = conn.table("profile").where_("id", "=", -1).find().await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn find_as_maps_row() {
    let conn = Connection::new(Recorder::with_rows(vec![profile(1, "x")]));
    let found: Option<Profile> = conn.table("profile").find_as().await.unwrap();
    assert_eq!(
        found,
        Some(Profile {
            id: 1,
            name: "x".into()
        })
    );
}

#[tokio::test]
async fn select_returns_all_rows() {
    let conn = Connection::new(Recorder::with_rows(vec![profile(1, "a"), profile(2, "b")]));
    let q = conn.table("profile").where_("gender", "=", "female");

    let rows = q.select().await.unwrap();
    assert_eq!(rows.len(), 2);

    let typed: Vec<Profile> = q.select_as().await.unwrap();
    assert_eq!(typed[1].name, "b");

    let seen = conn.executor().seen();
    assert_eq!(seen[0].sql(), "SELECT * FROM `profile` WHERE gender = ?");
    assert_eq!(seen[0].params(), &[Value::from("female")]);
}

#[tokio::test]
async fn count_reads_total_column() {
    let conn = Connection::new(Recorder {
        total: Some(163),
        ..Default::default()
    });
    let total = conn.table("profile").where_("id", "<", 400).count().await.unwrap();
    assert_eq!(total, 163);
    assert_eq!(
        conn.executor().seen()[0].sql(),
        "SELECT count(1) AS total FROM `profile` WHERE id < ?"
    );
}

#[tokio::test]
async fn count_without_rows_is_zero() {
    let conn = Connection::new(Recorder::default());
    assert_eq!(conn.table("profile").count().await.unwrap(), 0);
}

#[tokio::test]
async fn page_counts_then_selects() {
    let conn = Connection::new(Recorder {
        rows: vec![profile(41, "a"), profile(42, "b")],
        total: Some(163),
        ..Default::default()
    });
    let mut q = conn.table("profile").order("id");

    let page = q.page(20, 3).await.unwrap();
    assert_eq!(page.total_count, 163);
    assert_eq!(page.total_pages, 9);
    assert_eq!(page.current_page, 3);
    assert_eq!(page.rows.len(), 2);

    let seen = conn.executor().seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].kind(), StatementKind::Count);
    assert_eq!(seen[0].sql(), "SELECT count(1) AS total FROM `profile`");
    assert_eq!(
        seen[1].sql(),
        "SELECT * FROM `profile` ORDER BY id LIMIT 40, 20"
    );
}

#[tokio::test]
async fn page_as_maps_rows() {
    let conn = Connection::new(Recorder::with_rows(vec![profile(1, "a")]));
    let page = conn.table("profile").page_as::<Profile>(10, 1).await.unwrap();
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.rows[0].id, 1);
}

#[tokio::test]
async fn save_delete_insert_return_affected() {
    let conn = Connection::new(Recorder {
        affected: 2,
        ..Default::default()
    });
    let q = conn.table("profile").where_("id", "<", 3);

    assert_eq!(q.save(&Record::new().set("age", 30)).await.unwrap(), 2);
    assert_eq!(q.delete().await.unwrap(), 2);
    assert_eq!(
        conn.table("profile")
            .insert(&Record::new().set("id", 1).set("name", "x"))
            .await
            .unwrap(),
        2
    );

    let sql: Vec<String> = conn.executor().seen().iter().map(Statement::sql).collect();
    assert_eq!(
        sql,
        [
            "UPDATE `profile` SET age = ? WHERE id < ?",
            "DELETE FROM `profile` WHERE id < ?",
            "INSERT INTO `profile`(`id`,`name`) VALUES(?,?)",
        ]
    );
}

#[tokio::test]
async fn validation_errors_never_reach_executor() {
    let conn = Connection::new(Recorder::default());
    let err = conn.table("profile").save(&Record::new()).await.unwrap_err();
    assert!(err.is_validation());

    let err = conn
        .table("profile")
        .where_bind("id = ?", Vec::<i64>::new())
        .select()
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert!(conn.executor().seen().is_empty());
}

#[tokio::test]
async fn executor_errors_propagate_unchanged() {
    let conn = Connection::new(Recorder {
        fail: true,
        ..Default::default()
    });
    let err = conn.table("profile").select().await.unwrap_err();
    assert!(matches!(err, DbError::Other(ref msg) if msg == "connection reset"));

    let err = conn.table("profile").delete().await.unwrap_err();
    assert!(matches!(err, DbError::Other(_)));
}

#[tokio::test]
async fn raw_sql_is_passed_through() {
    let conn = Connection::new(Recorder::with_rows(vec![profile(1, "x")]));
    let rows = conn.raw_query("SELECT id, name FROM profile").await.unwrap();
    assert_eq!(rows.len(), 1);
    conn.raw_execute("TRUNCATE profile").await.unwrap();

    let seen = conn.executor().seen();
    assert_eq!(seen[0].kind(), StatementKind::Raw);
    assert_eq!(seen[0].sql(), "SELECT id, name FROM profile");
    assert_eq!(seen[1].to_postgres(), "TRUNCATE profile");
}

#[tokio::test]
async fn shared_executor_by_reference() {
    let recorder = Recorder::with_rows(vec![profile(1, "x")]);
    let conn = Connection::new(&recorder).debug(true);
    conn.table("profile").select().await.unwrap();
    assert_eq!(recorder.seen().len(), 1);
}
