//! Page navigation over the current result set.
//!
//! Requests outside `1..=total_pages` are ignored; the caller gets `false`
//! and nothing is fetched.

use common::page_state::{NavigationState, PageState};

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationController {
    state: PageState,
}

impl PaginationController {
    pub fn new(page_size: u64) -> Self {
        Self { state: PageState::new(page_size) }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn current_page(&self) -> u64 {
        self.state.current_page
    }

    pub fn page_size(&self) -> u64 {
        self.state.page_size
    }

    pub fn navigation(&self) -> NavigationState {
        self.state.navigation()
    }

    pub fn set_total(&mut self, total_results: u64) {
        self.state.total_results = total_results;
    }

    /// Back to page 1, e.g. after the query changed.
    pub fn reset(&mut self) {
        self.state.current_page = 1;
    }

    pub fn go_to(&mut self, page: u64) -> bool {
        if !self.state.contains_page(page) {
            return false;
        }
        self.state.current_page = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.state.current_page.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.state.current_page.saturating_sub(1))
    }

    /// Pulls the current page back to the last page of the known total (page 1 when empty).
    /// Returns whether it moved.
    pub fn clamp_to_total(&mut self) -> bool {
        let last = self.state.total_pages().max(1);
        if self.state.current_page <= last {
            return false;
        }
        self.state.current_page = last;
        true
    }

    /// Sets the page without a bounds check, for restoring saved state before the total is known.
    pub fn restore_page(&mut self, page: u64) {
        self.state.current_page = page.max(1);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(total: u64) -> PaginationController {
        let mut pagination = PaginationController::new(10);
        pagination.set_total(total);
        pagination
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let mut pagination = with_total(35);
        assert!(!pagination.go_to(0));
        assert!(!pagination.go_to(5));
        assert_eq!(pagination.current_page(), 1);
        assert!(pagination.go_to(4));
        assert_eq!(pagination.current_page(), 4);
    }

    #[test]
    fn next_and_previous_stop_at_the_edges() {
        let mut pagination = with_total(20);
        assert!(!pagination.previous());
        assert!(pagination.next());
        assert!(!pagination.next());
        assert_eq!(pagination.current_page(), 2);
        assert!(pagination.previous());
        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn empty_result_disables_navigation() {
        let mut pagination = with_total(0);
        assert_eq!(pagination.navigation(), NavigationState { previous_enabled: false, next_enabled: false });
        assert!(!pagination.go_to(1));
        assert!(!pagination.next());
    }

    #[test]
    fn clamp_pulls_restored_page_into_range() {
        let mut pagination = with_total(35);
        pagination.restore_page(u64::MAX / 2);
        assert!(pagination.clamp_to_total());
        assert_eq!(pagination.current_page(), 4);
        assert!(!pagination.clamp_to_total());

        pagination.set_total(0);
        assert!(pagination.clamp_to_total());
        assert_eq!(pagination.current_page(), 1);
        assert!(!pagination.clamp_to_total());
    }

    #[test]
    fn restore_then_reset() {
        let mut pagination = with_total(0);
        pagination.restore_page(7);
        assert_eq!(pagination.current_page(), 7);
        assert!(pagination.navigation().previous_enabled);
        pagination.restore_page(0);
        assert_eq!(pagination.current_page(), 1);
        pagination.restore_page(3);
        pagination.reset();
        assert_eq!(pagination.current_page(), 1);
    }
}
