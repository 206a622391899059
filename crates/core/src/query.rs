//! Pagination and sorting primitives shared by list queries.

use serde::{Deserialize, Serialize};

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of items to return.
    pub limit: u32,
    /// Offset for pagination (0-based).
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 1000;

    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).min(Self::MAX_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }

    /// Convert a 1-based page number (as shown in list views) into limit/offset.
    ///
    /// Page 0 is treated as page 1.
    pub fn page(page: u32, per_page: u32) -> Self {
        let limit = per_page.min(Self::MAX_LIMIT);
        Self {
            limit,
            offset: page.saturating_sub(1).saturating_mul(limit),
        }
    }

    /// Slice an already filtered and sorted result set into a [`Page`].
    pub fn apply<T>(self, items: Vec<T>) -> Page<T> {
        let total = items.len() as u64;
        let offset = self.offset as usize;
        let page_items: Vec<T> = items
            .into_iter()
            .skip(offset)
            .take(self.limit as usize)
            .collect();
        let has_more = (offset as u64).saturating_add(page_items.len() as u64) < total;

        Page {
            items: page_items,
            total,
            pagination: self,
            has_more,
        }
    }
}

/// Paginated query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items matching the filter (across all pages).
    pub total: u64,
    /// Pagination parameters used.
    pub pagination: Pagination,
    /// Whether there are more items available.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Number of pages needed to show `total` items at the current limit.
    pub fn page_count(&self) -> u64 {
        if self.pagination.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.pagination.limit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Orient an ascending comparison according to this direction.
    pub fn apply(self, ordering: core::cmp::Ordering) -> core::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}
