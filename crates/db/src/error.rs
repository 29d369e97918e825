//! Store error taxonomy and the deadline wrapper every store operation runs under.

use std::future::Future;
use std::time::Duration;

use sqlx::error::ErrorKind;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the identifier.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// Input rejected before any query was sent.
    #[error("invalid {resource}: {field} {message}")]
    Validation {
        resource: &'static str,
        field: &'static str,
        message: String,
    },

    /// Backend unreachable, constraint violated, or the query was malformed.
    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// The operation outlived its deadline and was abandoned.
    #[error("{operation} cancelled after {timeout_ms}ms")]
    Cancelled {
        operation: &'static str,
        timeout_ms: u64,
    },
}

impl StoreError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn validation(
        resource: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            resource,
            field,
            message: message.into(),
        }
    }

    /// True when the database refused the write because of a table constraint
    /// (not null, check, unique, foreign key) rather than a transport failure.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Persistence(sqlx::Error::Database(db)) => !matches!(db.kind(), ErrorKind::Other),
            _ => false,
        }
    }
}

/// Run `fut` with a deadline.
///
/// Persistence failures are logged here, once, with their cause; callers
/// should not log them again. An elapsed deadline becomes
/// [`StoreError::Cancelled`] and is only logged at debug level.
pub async fn bounded<T, F>(operation: &'static str, timeout: Duration, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            if let StoreError::Persistence(cause) = &err {
                tracing::error!(operation, error = %cause, "store operation failed");
            }
            Err(err)
        }
        Err(_) => {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            tracing::debug!(operation, timeout_ms, "store operation cancelled");
            Err(StoreError::Cancelled {
                operation,
                timeout_ms,
            })
        }
    }
}
