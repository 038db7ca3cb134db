//! Named cache buckets persisted in their own SQLite file.
//!
//! The file belongs to the controller thread; nothing else opens it while
//! the controller runs.

use super::CacheResult;
use super::request::{Response, ResponseKind};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

const STATE_ACTIVE: &str = "active";
const STATE_WAITING: &str = "waiting";

pub struct CacheStorage {
    conn: Connection,
}

impl CacheStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> CacheResult<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> CacheResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> CacheResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS buckets (
                name        TEXT PRIMARY KEY,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS entries (
                bucket        TEXT    NOT NULL,
                url           TEXT    NOT NULL,
                status        INTEGER NOT NULL,
                kind          TEXT    NOT NULL,
                content_type  TEXT,
                body          BLOB    NOT NULL,
                stored_at     TEXT    NOT NULL,
                PRIMARY KEY (bucket, url)
            );

            CREATE TABLE IF NOT EXISTS controller_state (
                key    TEXT PRIMARY KEY,
                value  TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    fn ensure_bucket(conn: &Connection, bucket: &str) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO buckets (name, created_at) VALUES (?1, ?2)",
            params![bucket, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn insert_entry(conn: &Connection, bucket: &str, url: &str, resp: &Response) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO entries (bucket, url, status, kind, content_type, body, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(bucket, url) DO UPDATE SET
                status = excluded.status,
                kind = excluded.kind,
                content_type = excluded.content_type,
                body = excluded.body,
                stored_at = excluded.stored_at",
            params![
                bucket,
                url,
                resp.status,
                resp.kind.as_str(),
                resp.content_type,
                resp.body,
                Local::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn put(&mut self, bucket: &str, url: &str, resp: &Response) -> CacheResult<()> {
        let tx = self.conn.transaction()?;
        Self::ensure_bucket(&tx, bucket)?;
        Self::insert_entry(&tx, bucket, url, resp)?;
        tx.commit()?;
        Ok(())
    }

    /// Stores a whole bucket in one transaction: all entries or none.
    pub fn put_all(&mut self, bucket: &str, entries: &[(String, Response)]) -> CacheResult<()> {
        let tx = self.conn.transaction()?;
        Self::ensure_bucket(&tx, bucket)?;
        for (url, resp) in entries {
            Self::insert_entry(&tx, bucket, url, resp)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn match_in(&self, bucket: &str, url: &str) -> CacheResult<Option<Response>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT status, kind, content_type, body FROM entries WHERE bucket = ?1 AND url = ?2",
        )?;
        let found = stmt
            .query_row(params![bucket, url], |row| {
                Ok(Response {
                    status: row.get(0)?,
                    kind: ResponseKind::from_db_str(&row.get::<_, String>(1)?),
                    content_type: row.get(2)?,
                    body: row.get(3)?,
                })
            })
            .optional()?;
        Ok(found)
    }

    /// First match across `buckets`, in order.
    pub fn match_any(&self, buckets: &[String], url: &str) -> CacheResult<Option<Response>> {
        for b in buckets {
            if let Some(r) = self.match_in(b, url)? {
                return Ok(Some(r));
            }
        }
        Ok(None)
    }

    pub fn bucket_names(&self) -> CacheResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT name FROM buckets ORDER BY created_at ASC, name ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn keys(&self, bucket: &str) -> CacheResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT url FROM entries WHERE bucket = ?1 ORDER BY url ASC")?;
        let rows = stmt.query_map([bucket], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn delete_bucket(&mut self, bucket: &str) -> CacheResult<bool> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM entries WHERE bucket = ?1", [bucket])?;
        let n = tx.execute("DELETE FROM buckets WHERE name = ?1", [bucket])?;
        tx.commit()?;
        Ok(n > 0)
    }

    /// Deletes every bucket not named in `keep`; returns the deleted names.
    pub fn retain_buckets(&mut self, keep: &[String]) -> CacheResult<Vec<String>> {
        let doomed: Vec<String> = self
            .bucket_names()?
            .into_iter()
            .filter(|b| !keep.contains(b))
            .collect();
        for b in &doomed {
            self.delete_bucket(b)?;
        }
        Ok(doomed)
    }

    fn state(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM controller_state WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn active_version(&self) -> CacheResult<Option<String>> {
        self.state(STATE_ACTIVE)
    }

    pub fn waiting_version(&self) -> CacheResult<Option<String>> {
        self.state(STATE_WAITING)
    }

    pub fn set_waiting(&mut self, version: Option<&str>) -> CacheResult<()> {
        match version {
            Some(v) => {
                self.conn.execute(
                    "INSERT INTO controller_state (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![STATE_WAITING, v],
                )?;
            }
            None => {
                self.conn
                    .execute("DELETE FROM controller_state WHERE key = ?1", [STATE_WAITING])?;
            }
        }
        Ok(())
    }

    /// Promotes `version` to active and clears the waiting slot atomically.
    pub fn promote(&mut self, version: &str) -> CacheResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO controller_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![STATE_ACTIVE, version],
        )?;
        tx.execute("DELETE FROM controller_state WHERE key = ?1", [STATE_WAITING])?;
        tx.commit()?;
        Ok(())
    }
}
