//! Paging metadata and the sliding window of page numbers shown in the UI.

/// Number of page links shown at once.
pub const WINDOW_SIZE: u32 = 3;

/// Paging metadata from the last successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page links for the current position.
    pub fn window(&self) -> Vec<u32> {
        page_window(self.page, self.total_pages)
    }
}

/// Pages to show around `current`.
///
/// Shows `current - 1 ..= current + 1`, clamped to `1..=total`, and shifted
/// at either edge so that three pages stay visible when there are at least
/// three. `current` outside the valid range is clamped first.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    if total == 0 {
        return Vec::new();
    }
    if total <= WINDOW_SIZE {
        return (1..=total).collect();
    }

    let current = current.clamp(1, total);
    let last_start = total - (WINDOW_SIZE - 1);
    let start = current.saturating_sub(1).clamp(1, last_start);
    (start..=start + (WINDOW_SIZE - 1)).collect()
}

/// Total pages for `total_count` items, never less than zero pages.
pub fn pages_for(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
