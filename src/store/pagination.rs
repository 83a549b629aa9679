//! Client-side pagination
//!
//! Pages are 1-based. Page count and slices are pure functions of the
//! filtered length, the page, and the page size.

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// `max(1, ceil(count / page_size))`
pub fn total_pages(count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    count.div_ceil(page_size).max(1)
}

/// Clamp `page` into `[1, total_pages]`
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size))
}

/// Index range of `page` within a list of `count` items
pub fn page_range(count: usize, page: usize, page_size: usize) -> std::ops::Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = page.saturating_mul(page_size).min(count);
    start..end
}

/// `items[(page-1)*size .. page*size]`, truncated at the end of the list
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_range(items.len(), page, page_size)]
}
