/// Page arithmetic for the gallery
///
/// Pages are 1-based. Requests outside the available range never fail:
/// slices come back empty and navigation becomes a no-op.

use std::num::NonZeroUsize;

use super::data::PaginationView;

/// Number of pages needed for `total_items`; 0 when there is nothing to show
pub fn total_pages(total_items: usize, page_size: NonZeroUsize) -> usize {
    total_items.div_ceil(page_size.get())
}

/// The slice of `items` shown on `page`, clipped to the list bounds.
///
/// Page 0 and pages past the end yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: NonZeroUsize) -> &[T] {
    let Some(index) = page.checked_sub(1) else {
        return &[];
    };
    let start = index.saturating_mul(page_size.get());
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size.get()).min(items.len());
    &items[start..end]
}

/// Current page over a listing of `total_items`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: NonZeroUsize,
    total_items: usize,
}

impl Pagination {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            current_page: 1,
            page_size,
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.page_size)
    }

    /// Start over at page 1 against a new item count
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = 1;
    }

    /// Move back one page. Returns false (and changes nothing) on page 1.
    pub fn previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Move forward one page. Returns false (and changes nothing) on the last page.
    pub fn next(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Jump directly to `page` if it exists
    pub fn jump_to(&mut self, page: usize) -> bool {
        if (1..=self.total_pages()).contains(&page) {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// The current page's slice of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.current_page, self.page_size)
    }

    pub fn view(&self) -> PaginationView {
        let total_pages = self.total_pages();
        PaginationView {
            current_page: self.current_page,
            total_pages,
            has_previous: self.current_page > 1,
            has_next: self.current_page < total_pages,
        }
    }
}
