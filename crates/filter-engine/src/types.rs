use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOneResult {
    pub label: String,
    pub added: bool,
    pub current_total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAddResult {
    pub added_count: usize,
    /// Newly stored labels, in input order.
    pub added: Vec<String>,
    /// Labels that were already present, in encounter order.
    pub duplicates: Vec<String>,
    pub current_total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    pub labels: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<String>,
    /// Zero-based, after clamping.
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl Page {
    /// `ceil(total / page_size)`, never below 1 so "Page 1 of 1" stays well-formed.
    #[must_use]
    pub fn total_pages_for(total_count: usize, page_size: usize) -> usize {
        total_count.div_ceil(page_size.max(1)).max(1)
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page_index.saturating_add(1) < self.total_pages
    }

    /// Offset of the first item in the full list, for numbering rows.
    #[must_use]
    pub const fn first_position(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up_with_floor_of_one() {
        assert_eq!(Page::total_pages_for(120, 50), 3);
        assert_eq!(Page::total_pages_for(100, 50), 2);
        assert_eq!(Page::total_pages_for(1, 50), 1);
        assert_eq!(Page::total_pages_for(0, 50), 1);
        assert_eq!(Page::total_pages_for(3, 0), 3);
    }

    #[test]
    fn navigation_flags() {
        let page = Page {
            items: Vec::new(),
            page_index: 1,
            page_size: 50,
            total_pages: 3,
            total_count: 120,
        };
        assert!(page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.first_position(), 50);

        let last = Page {
            page_index: 2,
            ..page.clone()
        };
        assert!(!last.has_next());

        let beyond = Page {
            page_index: 5,
            ..page
        };
        assert!(!beyond.has_next());
    }
}
