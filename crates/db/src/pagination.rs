//! Page/size windowing for list operations.

use serde::Deserialize;

/// Pagination parameters
///
/// `page` is 1-indexed. A zero in either field means "no paging": the whole
/// table is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
}

impl Pagination {
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Return every row.
    pub const fn unpaged() -> Self {
        Self { page: 0, size: 0 }
    }

    pub const fn is_paged(&self) -> bool {
        self.page != 0 && self.size != 0
    }

    /// SQL LIMIT value, `None` when unpaged (`LIMIT NULL` means no limit).
    pub fn limit(&self) -> Option<i64> {
        self.is_paged().then(|| i64::from(self.size))
    }

    /// SQL OFFSET value: `(page - 1) * size`, saturating at `i64::MAX` so a
    /// window past the end is simply empty.
    pub fn offset(&self) -> i64 {
        if self.is_paged() {
            (i64::from(self.page) - 1).saturating_mul(i64::from(self.size))
        } else {
            0
        }
    }

    /// Apply this window to an already ordered sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let items = items.into_iter();
        match self.limit() {
            Some(limit) => items
                .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
                .take(limit as usize)
                .collect(),
            None => items.collect(),
        }
    }
}
