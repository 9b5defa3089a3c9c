//! SQLite connection handle and migration runner for stacks modules.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Errors raised by the database layer.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("migration '{module}/{id}' failed: {source}")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: rusqlite::Error,
    },
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Migration definition contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Single SQLite connection shared behind a mutex.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `path`. `:memory:` opens a private in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            Connection::open(Path::new(path))?
        };
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS schema_migrations (
                module     TEXT NOT NULL,
                id         TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (module, id)
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` with exclusive access to the connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut conn)
    }
}

/// Apply every migration not yet recorded in `schema_migrations`, in the given order.
///
/// Each migration and its bookkeeping row commit in one transaction. Returns the number applied.
pub fn apply_migrations(db: &Database, migrations: &[(String, Migration)]) -> Result<usize> {
    db.with_conn(|conn| {
        let mut applied = 0;
        for (module, migration) in migrations {
            let seen: Option<String> = conn
                .query_row(
                    "SELECT id FROM schema_migrations WHERE module = ?1 AND id = ?2",
                    params![module, migration.id],
                    |row| row.get(0),
                )
                .optional()?;
            if seen.is_some() {
                tracing::debug!(module = %module, id = migration.id, "migration already applied");
                continue;
            }

            let wrap = |source| DbError::Migration {
                module: module.clone(),
                id: migration.id.to_string(),
                source,
            };
            let tx = conn.transaction().map_err(wrap)?;
            tx.execute_batch(migration.up).map_err(wrap)?;
            tx.execute(
                "INSERT INTO schema_migrations (module, id) VALUES (?1, ?2)",
                params![module, migration.id],
            )
            .map_err(wrap)?;
            tx.commit().map_err(wrap)?;

            tracing::info!(module = %module, id = migration.id, "migration applied");
            applied += 1;
        }
        Ok(applied)
    })
}
