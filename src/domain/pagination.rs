//! Client-side pagination of the display list.
//!
//! The grid reveals a growing prefix of the display list. Nothing is fetched
//! per page: every product is already in memory, this is only a window.

use crate::domain::constants::listing::{INITIAL_PAGE_COUNT, PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_count: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_count: INITIAL_PAGE_COUNT,
            page_size: PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// `page_size` of 0 is clamped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_count: INITIAL_PAGE_COUNT,
            page_size: page_size.max(1),
        }
    }

    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Exclusive end of the window before clamping to the list length.
    pub const fn limit(&self) -> usize {
        self.page_count.saturating_mul(self.page_size)
    }

    /// `len(window) == min(page_count * page_size, len(list))`
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.limit().min(items.len())]
    }

    /// "Load More" is visible only while part of the list is hidden.
    pub const fn has_more(&self, total: usize) -> bool {
        total > self.limit()
    }

    /// Reveals one more page. Does nothing once the whole list is visible,
    /// which is exactly when the control is hidden.
    pub fn load_more(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.page_count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_shows_page_size() {
        let items: Vec<u32> = (0..20).collect();
        let pagination = Pagination::default();
        assert_eq!(pagination.window(&items).len(), 12);
        assert!(pagination.has_more(items.len()));
    }

    #[test]
    fn test_load_more_reveals_rest_then_hides_control() {
        let items: Vec<u32> = (0..20).collect();
        let mut pagination = Pagination::default();
        assert!(pagination.load_more(items.len()));
        assert_eq!(pagination.window(&items).len(), 20);
        assert!(!pagination.has_more(items.len()));
    }

    #[test]
    fn test_load_more_is_noop_when_everything_is_visible() {
        let items: Vec<u32> = (0..12).collect();
        let mut pagination = Pagination::default();
        assert!(!pagination.load_more(items.len()));
        assert_eq!(pagination.page_count(), 1);
        assert_eq!(pagination.window(&items), &items[..]);
    }

    #[test]
    fn test_window_on_empty_list() {
        let items: Vec<u32> = Vec::new();
        assert!(Pagination::default().window(&items).is_empty());
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        assert_eq!(Pagination::new(0).page_size(), 1);
    }
}
