use crate::model::{Quote, StoredQuote};
use anyhow::{bail, Context, Result};
use rusqlite::{named_params, params, Connection, OpenFlags, OptionalExtension, Row};
use serde::Deserialize;
use std::{
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{task::spawn_blocking, time::timeout};
use tracing::warn;

#[derive(Clone, Deserialize)]
pub struct DbConf {
    pub url: String,
    pub timeout_ms: u64,
}

impl DbConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

pub struct QuoteRepository {
    conf: DbConf,
}

const PENDING: u8 = 0;
const COMMITTING: u8 = 1;
const CANCELLED: u8 = 2;

impl QuoteRepository {
    pub fn new(conf: DbConf) -> QuoteRepository {
        QuoteRepository { conf }
    }

    /// Opens a fresh connection, makes sure the table exists and inserts one row,
    /// all inside one transaction that has to reach `COMMIT` before the deadline.
    /// A reported timeout always means nothing was written.
    pub async fn insert(&self, row: &Quote) -> Result<i64> {
        let deadline = self.conf.timeout();
        let state = Arc::new(AtomicU8::new(PENDING));

        let url = self.conf.url.clone();
        let row = row.clone();
        let task_state = state.clone();
        let mut task = spawn_blocking(move || -> Result<i64> {
            let mut conn = Connection::open(&url)?;
            conn.busy_timeout(deadline)?;
            let tx = conn.transaction()?;
            create_table(&tx)?;
            let id = insert(&row, &tx)?;
            if task_state
                .compare_exchange(PENDING, COMMITTING, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                bail!("Insert into {} cancelled", url);
            }
            tx.commit()?;
            Ok(id)
        });

        match timeout(deadline, &mut task).await {
            Ok(res) => res?,
            Err(_) => {
                let cancelled = state
                    .compare_exchange(PENDING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok();
                if !cancelled {
                    // Already committing
                    return task.await?;
                }
                warn!(
                    db = %self.conf.url,
                    timeout_ms = self.conf.timeout_ms,
                    "Insert timed out"
                );
                bail!("Insert into {} timed out", self.conf.url)
            }
        }
    }

    pub fn select_all(&self) -> Result<Vec<StoredQuote>> {
        let conn = self.open_read_only()?;
        if !table_exists(&conn)? {
            return Ok(vec![]);
        }
        Ok(select_all(&conn)?)
    }

    pub fn select_by_id(&self, id: i64) -> Result<Option<StoredQuote>> {
        let conn = self.open_read_only()?;
        if !table_exists(&conn)? {
            return Ok(None);
        }
        Ok(select_by_id(id, &conn)?)
    }

    fn open_read_only(&self) -> Result<Connection> {
        Connection::open_with_flags(&self.conf.url, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Unable to open {}", self.conf.url))
    }
}

pub fn create_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS quote (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL,
            codein TEXT NOT NULL,
            name TEXT NOT NULL,
            high TEXT NOT NULL,
            low TEXT NOT NULL,
            var_bid TEXT NOT NULL,
            pct_change TEXT NOT NULL,
            bid TEXT NOT NULL,
            ask TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            create_date TEXT NOT NULL
        );
        "#,
    )
}

pub fn insert(row: &Quote, conn: &Connection) -> rusqlite::Result<i64> {
    let query = r#"
        INSERT INTO quote (
            code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date
        ) VALUES (
            :code, :codein, :name, :high, :low, :var_bid, :pct_change, :bid, :ask, :timestamp, :create_date
        )
    "#;
    conn.execute(
        query,
        named_params! {
            ":code": row.code,
            ":codein": row.codein,
            ":name": row.name,
            ":high": row.high,
            ":low": row.low,
            ":var_bid": row.var_bid,
            ":pct_change": row.pct_change,
            ":bid": row.bid,
            ":ask": row.ask,
            ":timestamp": row.timestamp,
            ":create_date": row.create_date,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'quote'",
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
}

const SELECT: &str = r#"
    SELECT id, code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date
    FROM quote
"#;

pub fn select_all(conn: &Connection) -> rusqlite::Result<Vec<StoredQuote>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT))?;
    let rows = stmt.query_map([], mapper)?;
    rows.collect()
}

pub fn select_by_id(id: i64, conn: &Connection) -> rusqlite::Result<Option<StoredQuote>> {
    conn.query_row(&format!("{} WHERE id = ?", SELECT), params![id], mapper)
        .optional()
}

fn mapper(row: &Row) -> rusqlite::Result<StoredQuote> {
    Ok(StoredQuote {
        id: row.get(0)?,
        quote: Quote {
            code: row.get(1)?,
            codein: row.get(2)?,
            name: row.get(3)?,
            high: row.get(4)?,
            low: row.get(5)?,
            var_bid: row.get(6)?,
            pct_change: row.get(7)?,
            bid: row.get(8)?,
            ask: row.get(9)?,
            timestamp: row.get(10)?,
            create_date: row.get(11)?,
        },
    })
}
