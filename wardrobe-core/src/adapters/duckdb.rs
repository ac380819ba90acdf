//! DuckDB document store
//!
//! Persists documents as JSON text in a single `documents` table keyed by
//! (collection path, document id). Field operations are applied in Rust
//! inside a transaction while the connection mutex is held, so every write
//! is atomic for the document it touches.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use duckdb::{params, Connection};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::ports::{CollectionPath, DocPath, DocumentStore, DocumentWrite, Filter, JsonMap, StoredDocument};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of attempts when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

pub struct DuckDbDocumentStore {
    conn: Mutex<Connection>,
}

impl DuckDbDocumentStore {
    /// Open (or create) a store at `db_path` and bring its schema up to date
    ///
    /// Retries with exponential backoff when another process holds the file.
    pub fn open(db_path: &Path) -> Result<Self> {
        let mut attempt = 0;
        let conn = loop {
            match Self::try_open_connection(db_path) {
                Ok(conn) => break conn,
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        tracing::warn!(
                            attempt = attempt + 1,
                            max = MAX_RETRIES,
                            delay_ms = delay.as_millis() as u64,
                            error = %err_msg,
                            "Database busy, retrying"
                        );
                        thread::sleep(delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        };

        let store = Self { conn: Mutex::new(conn) };
        store.run_migrations()?;
        Ok(store)
    }

    /// Open a throwaway store that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let store = Self { conn: Mutex::new(Connection::open_in_memory()?) };
        store.run_migrations()?;
        Ok(store)
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Extension autoloading off: cached extensions can fail code signing on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    /// Run pending schema migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn).run_pending()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))
    }

    fn select_collection(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<StoredDocument>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT doc_id, data FROM documents WHERE collection = ? ORDER BY seq",
        )?;
        let rows = stmt.query_map([collection.to_string()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            let data = parse_body(&raw)?;
            if filter.map_or(true, |f| f.matches(&data)) {
                docs.push(StoredDocument { id, data });
            }
        }
        Ok(docs)
    }
}

fn parse_body(raw: &str) -> Result<JsonMap> {
    match serde_json::from_str(raw)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(Error::store("stored document body is not a JSON object")),
    }
}

fn read_body(conn: &Connection, doc: &DocPath) -> Result<Option<JsonMap>> {
    let mut stmt = conn.prepare("SELECT data FROM documents WHERE collection = ? AND doc_id = ?")?;
    let mut rows = stmt.query(params![doc.collection.to_string(), doc.id])?;
    match rows.next()? {
        Some(row) => {
            let raw: String = row.get(0)?;
            Ok(Some(parse_body(&raw)?))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl DocumentStore for DuckDbDocumentStore {
    fn name(&self) -> &str {
        "duckdb"
    }

    async fn create(&self, collection: &CollectionPath, write: &DocumentWrite) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut data = JsonMap::new();
        write.apply(&mut data, Utc::now());
        let body = serde_json::to_string(&data)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, doc_id, data) VALUES (?, ?, ?)",
            params![collection.to_string(), id, body],
        )?;
        Ok(id)
    }

    async fn get(&self, doc: &DocPath) -> Result<Option<StoredDocument>> {
        let conn = self.lock()?;
        Ok(read_body(&conn, doc)?.map(|data| StoredDocument {
            id: doc.id.clone(),
            data,
        }))
    }

    async fn update(&self, doc: &DocPath, write: &DocumentWrite) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut data = read_body(&tx, doc)?.ok_or_else(|| Error::not_found(doc.to_string()))?;
        write.apply(&mut data, Utc::now());
        let body = serde_json::to_string(&data)?;

        tx.execute(
            "UPDATE documents SET data = ? WHERE collection = ? AND doc_id = ?",
            params![body, doc.collection.to_string(), doc.id],
        )?;
        tx.commit()?;
        Ok(())
    }

    async fn delete(&self, doc: &DocPath) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM documents WHERE collection = ? AND doc_id = ?",
            params![doc.collection.to_string(), doc.id],
        )?;
        Ok(())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDocument>> {
        self.select_collection(collection, None)
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>> {
        self.select_collection(collection, Some(filter))
    }
}
