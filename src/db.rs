// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::FinanceResult;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.moneymind", "MoneyMind", "moneymind"));

/// Environment override for the database file, mostly for scripts and tests.
pub const DB_ENV: &str = "MONEYMIND_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("moneymind.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

/// Synchronous whole-value key/value storage. Every key holds one JSON document.
pub trait KvStore {
    fn load(&self, key: &str) -> FinanceResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> FinanceResult<()>;
    fn clear(&self) -> FinanceResult<()>;
}

/// `KvStore` over the `kv` table.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteKv { conn })
    }

    pub fn open_default() -> Result<Self> {
        Ok(SqliteKv {
            conn: open_or_init()?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKv {
    fn load(&self, key: &str) -> FinanceResult<Option<String>> {
        let v = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get::<_, String>(0)
            })
            .optional()?;
        Ok(v)
    }

    fn save(&self, key: &str, value: &str) -> FinanceResult<()> {
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
            params![key, value],
        )?;
        debug!(key, bytes = value.len(), "kv write");
        Ok(())
    }

    fn clear(&self) -> FinanceResult<()> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

/// Process-local store for tests and dry runs.
#[derive(Default)]
pub struct MemoryKv {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KvStore for MemoryKv {
    fn load(&self, key: &str) -> FinanceResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> FinanceResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> FinanceResult<()> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn load(&self, key: &str) -> FinanceResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> FinanceResult<()> {
        (**self).save(key, value)
    }

    fn clear(&self) -> FinanceResult<()> {
        (**self).clear()
    }
}
