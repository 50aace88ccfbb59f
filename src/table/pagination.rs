//! Page arithmetic for list views.

use super::query::PageSize;

/// Clamps a requested page into `[1, total_pages]`.
///
/// An unknown or empty result set (`total_pages == 0`) clamps to page 1.
#[must_use]
pub fn clamp_page(requested: i64, total_pages: u32) -> u32 {
    let upper = i64::from(total_pages.max(1));
    let clamped = requested.clamp(1, upper);
    u32::try_from(clamped).unwrap_or(1)
}

/// Inclusive 1-based row numbers shown on `page`, or `None` for an empty page.
#[must_use]
pub fn entry_range(page: u32, page_size: PageSize, total_count: u64) -> Option<(u64, u64)> {
    let size = u64::from(page_size.get());
    let first = u64::from(page.saturating_sub(1))
        .saturating_mul(size)
        .saturating_add(1);
    if total_count == 0 || first > total_count {
        return None;
    }
    let last = first.saturating_add(size - 1).min(total_count);
    Some((first, last))
}

/// Page links for a pager: both edges, a window around the current page, and
/// `None` wherever pages are skipped.
///
/// Shows two pages at each edge, two before the current page and four after.
/// Bounds saturate, so any page count the backend reports is safe.
#[must_use]
pub fn page_window(total_pages: u32, current_page: u32) -> Vec<Option<u32>> {
    const LEFT_EDGE: u32 = 2;
    const LEFT_CURRENT: u32 = 2;
    const RIGHT_CURRENT: u32 = 4;
    const RIGHT_EDGE: u32 = 2;

    let last_page = total_pages;
    if last_page == 0 {
        return Vec::new();
    }
    let current = current_page.clamp(1, last_page);

    let mut pages = Vec::new();

    let past_last = last_page.saturating_add(1);
    let left_end = LEFT_EDGE.saturating_add(1).min(past_last);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current.saturating_sub(LEFT_CURRENT));
    let mid_end = current
        .saturating_add(RIGHT_CURRENT + 1)
        .min(past_last);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(RIGHT_EDGE).saturating_add(1));

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}
