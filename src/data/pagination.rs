use serde::Serialize;
use std::ops::Range;

/// Pages shown in the footer window when there are more than this many
const PAGE_WINDOW: usize = 3;

/// Footer summary: 1-based first/last row shown and the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

/// Current page, page size and the authoritative row count.
///
/// `total_row_count` is not necessarily the number of rows held locally: a
/// server-driven table reports the full count so page boundaries and the page
/// count reflect the whole result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_row_count: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size,
            total_row_count: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_row_count, self.page_size)
    }

    /// Half-open row range of the current page
    pub fn page_range(&self) -> Range<usize> {
        page_range(self.current_page, self.page_size, self.total_row_count)
    }

    pub fn page_buttons(&self) -> Vec<usize> {
        page_buttons(self.total_pages(), self.current_page)
    }

    pub fn page_info(&self) -> PageInfo {
        let range = self.page_range();
        if range.is_empty() {
            return PageInfo {
                start: 0,
                end: 0,
                total: self.total_row_count,
            };
        }
        PageInfo {
            start: range.start + 1,
            end: range.end,
            total: self.total_row_count,
        }
    }

    /// Bring `page` into `1..=total_pages` (page 1 when there are no pages)
    pub fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages()
    }
}

pub fn total_pages(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_rows.div_ceil(page_size)
}

/// `[(page-1)*size, min(start+size, total))`
pub fn page_range(current_page: usize, page_size: usize, total_rows: usize) -> Range<usize> {
    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total_rows);
    start.min(end)..end
}

/// Slice of `items` for the current page. The range comes from the
/// authoritative count and is then bounded by what is held locally.
pub fn paginate<'a, T>(items: &'a [T], state: &PageState) -> &'a [T] {
    let range = state.page_range();
    let end = range.end.min(items.len());
    let start = range.start.min(end);
    &items[start..end]
}

/// Page numbers to offer as buttons: every page when there are at most three,
/// otherwise a three page window pinned to the first or last page or centred
/// on the current one.
pub fn page_buttons(total_pages: usize, current_page: usize) -> Vec<usize> {
    if total_pages <= PAGE_WINDOW {
        return (1..=total_pages).collect();
    }

    let current = current_page.clamp(1, total_pages);
    if current == 1 {
        vec![1, 2, 3]
    } else if current == total_pages {
        vec![total_pages - 2, total_pages - 1, total_pages]
    } else {
        vec![current - 1, current, current + 1]
    }
}
