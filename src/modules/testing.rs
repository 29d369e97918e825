//! Test support shared by the resource modules.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use shelf_db::{Pagination, PgPool, StoreError, StoreResult};
use shelf_kernel::Migration;

/// Ordered row storage with sequence ids, mimicking one table.
pub struct MemoryTable<T> {
    rows: Mutex<Vec<(i64, T)>>,
    next_id: AtomicI64,
    connected: AtomicBool,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            connected: AtomicBool::new(true),
        }
    }
}

impl<T: Clone> MemoryTable<T> {
    pub fn insert(&self, build: impl FnOnce(i64, DateTime<Utc>) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = build(id, Utc::now());
        self.rows.lock().unwrap().push((id, row.clone()));
        row
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, row)| row.clone())
    }

    /// Newest first; insertion order stands in for `created_at, id`.
    pub fn list(&self, page: Pagination) -> Vec<T> {
        let rows = self.rows.lock().unwrap();
        page.apply(rows.iter().rev().map(|(_, row)| row.clone()))
    }

    pub fn remove(&self, id: i64) -> bool {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(row_id, _)| *row_id != id);
        rows.len() != before
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn ping(&self) -> StoreResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Persistence(sqlx::Error::PoolClosed))
        }
    }
}

static DATABASE: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// Serialize database tests; each one rebuilds the schema it touches.
pub async fn database_lock() -> tokio::sync::MutexGuard<'static, ()> {
    DATABASE.lock().await
}

/// Drop and re-apply one module's tables.
pub async fn reset_schema(pool: &PgPool, module: &str, migrations: Vec<Migration>) {
    let migrations: Vec<(String, Migration)> = migrations
        .into_iter()
        .map(|migration| (module.to_string(), migration))
        .collect();

    shelf_db::migrate::drop_all(pool, &migrations)
        .await
        .expect("drop failed");
    shelf_db::migrate::up(pool, &migrations)
        .await
        .expect("migrate failed");
}

pub fn published() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2020-01-01T15:04:05Z")
        .unwrap()
        .with_timezone(&Utc)
}
