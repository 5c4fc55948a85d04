//! Page position within a result set and the navigation state derived from it.

use serde::{Deserialize, Serialize};

use crate::search_const::PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// 1-based.
    pub current_page: u64,
    pub page_size: u64,
    pub total_results: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PageState {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: u64) -> Self {
        Self { current_page: 1, page_size: page_size.max(1), total_results: 0 }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_results.div_ceil(self.page_size)
    }

    pub fn contains_page(&self, page: u64) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    /// Zero-based offset of the first document of the current page.
    pub fn start_offset(&self) -> u64 {
        self.current_page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn navigation(&self) -> NavigationState {
        NavigationState {
            previous_enabled: self.current_page != 1,
            next_enabled: self.current_page < self.total_pages(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}
