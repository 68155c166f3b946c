//! Pagination of sorted results

use serde::Serialize;

/// One window of a result list. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// 1-based position of the first item on this page, 0 when empty
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.page * self.page_size + 1
        }
    }
}

/// Number of pages needed for `total_items`; an empty list still has one page
pub fn page_count(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_items.div_ceil(page_size).max(1)
}

/// Slice page `page` out of `items`, clamping past-the-end pages to the last one
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = page_count(items.len(), page_size);
    let page = page.min(total_pages - 1);

    let start = (page * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items: items.len(),
        total_pages,
    }
}
