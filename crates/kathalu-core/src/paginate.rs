//! Growing-prefix pagination.
//!
//! The displayed set is always the first `page_size × current_page` items of
//! the filtered result. "Load more" extends the prefix rather than moving a
//! window, and any filter change resets the cursor to page 1.

use serde::Serialize;

/// Items shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Pagination cursor over a filtered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A paginator on page 1. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of items the current prefix covers (before clamping to the
    /// result length).
    pub fn limit(&self) -> usize {
        self.page_size.saturating_mul(self.current_page)
    }

    /// Jump directly to `page` (values below 1 become 1).
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Advance to the next page.
    pub fn load_more(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    /// Return to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// The displayed prefix of `items`.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        get_page(items, self.current_page, self.page_size)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.limit() < total
    }

    /// Items beyond the current prefix.
    pub fn remaining(&self, total: usize) -> usize {
        total.saturating_sub(self.limit())
    }
}

/// `items[0 .. current_page × page_size]`, clamped to the slice length.
pub fn get_page<T>(items: &[T], current_page: usize, page_size: usize) -> &[T] {
    let end = current_page.saturating_mul(page_size).min(items.len());
    &items[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_fifteen() {
        let items: Vec<u32> = (0..15).collect();
        let mut p = Paginator::default();
        assert_eq!(p.page(&items).len(), 12);
        assert!(p.has_more(items.len()));
        assert_eq!(p.remaining(items.len()), 3);

        p.load_more();
        assert_eq!(p.page(&items).len(), 15);
        assert!(!p.has_more(items.len()));
        assert_eq!(p.remaining(items.len()), 0);
    }

    #[test]
    fn test_empty_result() {
        let items: Vec<u32> = Vec::new();
        let p = Paginator::default();
        assert!(p.page(&items).is_empty());
        assert!(!p.has_more(0));
    }

    #[test]
    fn test_prefix_monotonicity() {
        let items: Vec<u32> = (0..40).collect();
        for page_size in [1, 5, 12] {
            for n in 1..10 {
                let a = get_page(&items, n, page_size);
                let b = get_page(&items, n + 1, page_size);
                assert!(b.len() >= a.len());
                assert_eq!(&b[..a.len()], a);
            }
        }
    }

    #[test]
    fn test_has_more_flips_at_exact_boundary() {
        let items: Vec<u32> = (0..24).collect();
        let mut p = Paginator::new(12);
        assert!(p.has_more(items.len()));
        p.load_more();
        assert_eq!(p.limit(), 24);
        assert!(!p.has_more(items.len()));
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut p = Paginator::default();
        p.load_more();
        p.load_more();
        assert_eq!(p.current_page(), 3);
        p.reset();
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_zero_page_size_and_page_are_clamped() {
        let mut p = Paginator::new(0);
        assert_eq!(p.page_size(), 1);
        p.set_page(0);
        assert_eq!(p.current_page(), 1);
    }
}
