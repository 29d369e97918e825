use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_db::{StoreError, StoreResult};

/// An author as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    /// Unset stays unset; an empty string is a real value
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

impl NewAuthor {
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("author", "name", "must not be blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let author = NewAuthor {
            name: String::new(),
            bio: Some("prolific".to_string()),
        };
        let err = author.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid author: name must not be blank");
    }
}
