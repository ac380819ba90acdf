//! Migration service - schema migrations for the DuckDB document store
//!
//! Migrations are SQL files embedded at compile time. Each one is recorded
//! in `sys_migrations` so running the service twice is a no-op.

use duckdb::Connection;

use crate::domain::result::Result;
use crate::migrations::MIGRATIONS;

const BOOTSTRAP: &str = "000_migrations.sql";

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

pub struct MigrationService<'a> {
    conn: &'a Connection,
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Apply every migration not yet recorded, in order
    pub fn run_pending(&self) -> Result<MigrationResult> {
        // The bootstrap migration is idempotent, so it always runs first
        if let Some((_, sql)) = MIGRATIONS.iter().find(|(n, _)| *n == BOOTSTRAP) {
            self.conn.execute_batch(sql)?;
        }

        let applied_before = self.get_applied()?;
        let mut newly_applied = Vec::new();

        for (name, sql) in MIGRATIONS.iter() {
            if applied_before.iter().any(|a| a == name) {
                continue;
            }
            if *name != BOOTSTRAP {
                self.conn.execute_batch(sql)?;
            }
            self.conn.execute(
                "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                [name],
            )?;
            tracing::debug!(migration = %name, "Applied migration");
            newly_applied.push(name.to_string());
        }

        Ok(MigrationResult {
            applied: newly_applied,
            already_applied: applied_before.len(),
        })
    }

    /// Names of migrations already recorded
    pub fn get_applied(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for name in names {
            result.push(name?);
        }
        Ok(result)
    }
}
