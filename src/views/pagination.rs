//! Page-number window for list navigation.

/// Page numbers shown at once.
pub const DEFAULT_PAGE_WINDOW: u32 = 5;

/// Zero-based page numbers to offer, centred on `current` where possible and
/// at most `max` long.
pub fn page_window(current: u32, total_pages: u32, max: u32) -> Vec<u32> {
    if total_pages == 0 || max == 0 {
        return Vec::new();
    }
    let last = total_pages - 1;
    let current = current.min(last);
    let mut start = current.saturating_sub(max / 2);
    let end = last.min(start + max - 1);
    if end - start + 1 < max {
        start = (end + 1).saturating_sub(max);
    }
    (start..=end).collect()
}
