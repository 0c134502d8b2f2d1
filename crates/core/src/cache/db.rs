//! Per-key SQLite persistence backend.
//!
//! Wraps a tokio-rusqlite connection that runs database operations on a
//! background thread. Applies WAL mode pragmas and versioned migrations
//! on open, and stores one row per cache entry so mutations touch only
//! the affected key.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio_rusqlite::{Connection, params};

use super::entry::CacheEntry;
use super::migrations;
use crate::Error;

/// Cache database handle.
#[derive(Clone, Debug)]
pub struct CacheDb {
    conn: Connection,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| Error::Persistence(format!("bad validated_at timestamp: {e}")))
}

impl CacheDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }

    /// Insert or overwrite the entry for a document id.
    pub async fn upsert_entry(&self, entry: &CacheEntry) -> Result<(), Error> {
        let entry = entry.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (document_id, resolved_url, fingerprint, validated_at, is_valid)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(document_id) DO UPDATE SET
                        resolved_url = excluded.resolved_url,
                        fingerprint = excluded.fingerprint,
                        validated_at = excluded.validated_at,
                        is_valid = excluded.is_valid",
                    params![
                        entry.document_id,
                        &entry.resolved_url,
                        &entry.fingerprint,
                        entry.validated_at.to_rfc3339(),
                        entry.is_valid as i32,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Load every persisted entry.
    pub async fn load_entries(&self) -> Result<Vec<CacheEntry>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<CacheEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT document_id, resolved_url, fingerprint, validated_at, is_valid FROM entries",
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i32>(4)?,
                    ))
                })?;

                let mut entries = Vec::new();
                for row in rows {
                    let (document_id, resolved_url, fingerprint, raw_ts, is_valid) = row.map_err(Error::from)?;
                    entries.push(CacheEntry {
                        document_id,
                        resolved_url,
                        fingerprint,
                        validated_at: parse_timestamp(&raw_ts)?,
                        is_valid: is_valid == 1,
                    });
                }
                Ok(entries)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the entry for one document id.
    pub async fn delete_entry(&self, document_id: i64) -> Result<bool, Error> {
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM entries WHERE document_id = ?1", params![document_id])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Drop every entry.
    pub async fn clear_entries(&self) -> Result<(), Error> {
        self.conn
            .call(|conn| -> Result<(), Error> {
                conn.execute("DELETE FROM entries", [])?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries validated before `cutoff`.
    ///
    /// Returns the number of deleted entries. Timestamps are stored in
    /// RFC 3339 with a fixed UTC offset, so string comparison orders them.
    pub async fn delete_stale(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let cutoff = cutoff.to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries WHERE validated_at <= ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(id: i64, validated_at: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            document_id: id,
            resolved_url: format!("http://files.local/doc-{id}.pdf"),
            fingerprint: "f".repeat(64),
            validated_at,
            is_valid: true,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_load() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let now = Utc::now();
        db.upsert_entry(&entry(1, now)).await.unwrap();

        let entries = db.load_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].document_id, 1);
        assert_eq!(entries[0].validated_at, parse_timestamp(&now.to_rfc3339()).unwrap());
        assert!(entries[0].is_valid);
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let now = Utc::now();
        db.upsert_entry(&entry(1, now)).await.unwrap();

        let mut replacement = entry(1, now);
        replacement.resolved_url = "http://files.local/renamed.pdf".to_string();
        replacement.is_valid = false;
        db.upsert_entry(&replacement).await.unwrap();

        let entries = db.load_entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].resolved_url, "http://files.local/renamed.pdf");
        assert!(!entries[0].is_valid);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_entry(&entry(1, Utc::now())).await.unwrap();

        assert!(db.delete_entry(1).await.unwrap());
        assert!(!db.delete_entry(1).await.unwrap());
        assert!(db.load_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_stale() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let now = Utc::now();
        db.upsert_entry(&entry(1, now - Duration::seconds(600))).await.unwrap();
        db.upsert_entry(&entry(2, now)).await.unwrap();

        let deleted = db.delete_stale(now - Duration::seconds(300)).await.unwrap();
        assert_eq!(deleted, 1);

        let remaining = db.load_entries().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].document_id, 2);
    }

    #[tokio::test]
    async fn test_clear_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_entry(&entry(1, Utc::now())).await.unwrap();
        db.upsert_entry(&entry(2, Utc::now())).await.unwrap();

        db.clear_entries().await.unwrap();
        assert!(db.load_entries().await.unwrap().is_empty());
    }
}
