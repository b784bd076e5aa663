//! Pagination helpers
//!
//! Pure page arithmetic over a list length. Nothing is cached: callers pass
//! the current length on every call.

/// Page size used by every listing view unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// `ceil(item_count / page_size)`. A zero page size yields no pages.
pub fn number_of_pages(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    item_count.div_ceil(page_size)
}

/// `[0, 1, ..., number_of_pages - 1]`.
pub fn page_array(item_count: usize, page_size: usize) -> Vec<usize> {
    (0..number_of_pages(item_count, page_size)).collect()
}

/// The items from `start` onwards; empty when `start` is past the end.
pub fn start_from<T>(items: &[T], start: usize) -> &[T] {
    items.get(start..).unwrap_or_default()
}

/// Page cursor of one listing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Returns `None` for a zero page size.
    pub fn new(page_size: usize) -> Option<Self> {
        (page_size > 0).then_some(Self {
            current_page: 0,
            page_size,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn number_of_pages(&self, item_count: usize) -> usize {
        number_of_pages(item_count, self.page_size)
    }

    pub fn page_array(&self, item_count: usize) -> Vec<usize> {
        page_array(item_count, self.page_size)
    }

    /// Moves to `page` if it exists for a list of `item_count` items.
    pub fn go_to(&mut self, page: usize, item_count: usize) -> bool {
        if page < self.number_of_pages(item_count) {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// The slice of `items` shown on the current page.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let rest = start_from(items, self.current_page.saturating_mul(self.page_size));
        &rest[..rest.len().min(self.page_size)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_of_pages_is_ceiling() {
        for page_size in 1..=7 {
            for item_count in 0..=50 {
                let expected = (item_count + page_size - 1) / page_size;
                assert_eq!(number_of_pages(item_count, page_size), expected);
                let pages = page_array(item_count, page_size);
                assert_eq!(pages.len(), expected);
                assert!(pages.iter().enumerate().all(|(i, p)| i == *p));
            }
        }
    }

    #[test]
    fn test_empty_list_has_no_pages() {
        assert_eq!(number_of_pages(0, 20), 0);
        assert!(page_array(0, 20).is_empty());
    }

    #[test]
    fn test_zero_page_size() {
        assert_eq!(number_of_pages(10, 0), 0);
        assert!(Pagination::new(0).is_none());
    }

    #[test]
    fn test_start_from() {
        let items = [1, 2, 3];
        assert_eq!(start_from(&items, 1), &[2, 3]);
        assert!(start_from(&items, 3).is_empty());
        assert!(start_from(&items, 10).is_empty());
    }

    #[test]
    fn test_page_slices() {
        let items: Vec<u32> = (0..45).collect();
        let mut pagination = Pagination::default();
        assert_eq!(pagination.page_array(items.len()), vec![0, 1, 2]);
        assert_eq!(pagination.page(&items).len(), 20);

        assert!(pagination.go_to(2, items.len()));
        assert_eq!(pagination.page(&items), &items[40..]);

        assert!(!pagination.go_to(3, items.len()));
        assert_eq!(pagination.current_page, 2);
    }
}
