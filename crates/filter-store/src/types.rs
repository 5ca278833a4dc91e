use crate::config::{Backend, LabelOrder, Partition};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Result of an atomic check-and-insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

impl AddOutcome {
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// One page of labels plus the size of the full list it was cut from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPage {
    pub items: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub scopes: usize,
    pub labels: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDescriptor {
    pub backend: Backend,
    pub partition: Partition,
    pub order: LabelOrder,
    pub location: String,
}

/// Positions of `page_index` within a list of `total` entries.
///
/// Out-of-range pages (and a zero page size) produce an empty range clamped to
/// `total`, so slicing with the result never panics.
#[must_use]
pub fn page_range(page_index: usize, page_size: usize, total: usize) -> Range<usize> {
    let start = page_index.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_covers_partial_last_page() {
        assert_eq!(page_range(0, 50, 120), 0..50);
        assert_eq!(page_range(2, 50, 120), 100..120);
    }

    #[test]
    fn page_range_past_end_is_empty() {
        assert!(page_range(5, 50, 120).is_empty());
        assert!(page_range(usize::MAX, 50, 120).is_empty());
        assert!(page_range(0, 0, 120).is_empty());
        assert!(page_range(0, 50, 0).is_empty());
    }
}
