use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_db::{StoreError, StoreResult};

/// A catalogued book as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Assigned by the database, never reused
    pub id: i64,
    pub title: String,
    pub published_date: DateTime<Utc>,
    /// `None` means no description was given, which is not the same as `""`
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub published_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewBook {
    pub fn validate(&self) -> StoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::validation("book", "title", "must not be blank"));
        }
        Ok(())
    }
}
