//! PostgreSQL plumbing shared by the resource stores.
//!
//! Owns pool construction, the migration runner, and the vocabulary every store
//! speaks: [`Pagination`] for list windows and [`StoreError`] for failures.

pub mod error;
pub mod migrate;
pub mod pagination;
pub mod pool;

pub use error::{bounded, StoreError, StoreResult};
pub use pagination::Pagination;
pub use pool::{connect, connect_lazy};

pub use sqlx::PgPool;
