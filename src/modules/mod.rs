pub mod authors;
pub mod books;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use shelf_db::PgPool;
use shelf_kernel::{settings::DatabaseSettings, ModuleRegistry};

/// Register all project modules, each with its own store over the shared pool
pub fn register_all(
    registry: &mut ModuleRegistry,
    pool: &PgPool,
    database: &DatabaseSettings,
) -> anyhow::Result<()> {
    let query_timeout = Duration::from_millis(database.query_timeout_ms);

    registry.register(authors::create_module(Arc::new(
        authors::store::PgAuthorStore::new(pool.clone(), query_timeout),
    )))?;
    registry.register(books::create_module(Arc::new(
        books::store::PgBookStore::new(pool.clone(), query_timeout),
    )))?;

    Ok(())
}
