//! Page-range generation for compact pagination controls.
//!
//! [`generate`] turns `(current_page, total_pages, max_buttons)` into the
//! ordered list of page buttons and ellipsis markers a pagination control
//! renders. First and last page are always shown, the current page is always
//! shown, and a gap of exactly one missing page is filled with that page
//! instead of an ellipsis.
//!
//! `generate` does not validate its input. Callers clamp at the boundary with
//! [`clamp_page`], or go through [`PageRange::new`] to get an error instead.

use sf_api_types::PageItem;
use thiserror::Error;

/// Smallest control that still shows first, current and last page.
pub const MIN_BUTTONS: u32 = 3;

/// Slots reserved for the first and last page.
const EDGE_SLOTS: u32 = 2;

/// Slots reserved for first page, two ellipses and last page.
const MIDDLE_RESERVED_SLOTS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagingError {
    #[error("current page {current_page} is outside 1..={total_pages}")]
    CurrentPageOutOfRange { current_page: u32, total_pages: u32 },
}

/// Build the display items for a pagination control.
///
/// `max_buttons` below [`MIN_BUTTONS`] is treated as [`MIN_BUTTONS`].
/// `current_page` must lie in `1..=total_pages`; outside that range the
/// output is well-formed but no item is marked current.
///
/// The output has at most `max(max_buttons, 5)` items. With 3 or 4 buttons
/// the middle case keeps first, current and last page and each gap still
/// becomes a page or an ellipsis, so `generate(3, 5, 3)` is `[1, 2, 3, 4, 5]`.
///
/// The output length grows with `max_buttons` and `total_pages`; callers
/// taking either from untrusted input must bound them first.
pub fn generate(current_page: u32, total_pages: u32, max_buttons: u32) -> Vec<PageItem> {
    let max_buttons = max_buttons.max(MIN_BUTTONS);
    let pages = visible_pages(current_page, total_pages, max_buttons);
    fill_gaps(&pages, current_page)
}

/// Ascending page numbers shown before gaps are filled.
fn visible_pages(current_page: u32, total_pages: u32, max_buttons: u32) -> Vec<u32> {
    if max_buttons >= total_pages {
        return (1..=total_pages).collect();
    }

    // total_pages > max_buttons >= 3 from here on, so none of this underflows.
    let core = max_buttons - EDGE_SLOTS;

    if current_page < core {
        let mut pages: Vec<u32> = (1..=core).collect();
        pages.push(total_pages);
        return pages;
    }

    let tail_start = total_pages - core + 1;
    if current_page > tail_start {
        let mut pages = vec![1];
        pages.extend(tail_start..=total_pages);
        return pages;
    }

    // Even windows lean forward: for a window of 2 we show current and current + 1.
    let window = max_buttons.saturating_sub(MIDDLE_RESERVED_SLOTS).max(1);
    let start = current_page.saturating_sub((window - 1) / 2).max(1);
    let end = start.saturating_add(window - 1).min(total_pages);

    let mut pages = Vec::with_capacity(window as usize + 2);
    pages.push(1);
    pages.extend(start..=end);
    pages.push(total_pages);
    pages.dedup();
    pages
}

fn fill_gaps(pages: &[u32], current_page: u32) -> Vec<PageItem> {
    let mut items: Vec<PageItem> = Vec::with_capacity(pages.len() + 2);
    let mut previous: Option<u32> = None;

    for &page in pages {
        if let Some(prev) = previous {
            match page - prev {
                0 | 1 => {}
                2 => {
                    let skipped = prev + 1;
                    items.push(PageItem::page(items.len(), skipped, skipped == current_page));
                }
                _ => items.push(PageItem::ellipsis(items.len())),
            }
        }
        items.push(PageItem::page(items.len(), page, page == current_page));
        previous = Some(page);
    }

    items
}

/// A validated page range with its display items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    current_page: u32,
    total_pages: u32,
    items: Vec<PageItem>,
}

impl PageRange {
    /// Build a range, rejecting a current page outside `1..=total_pages`.
    ///
    /// An empty result set (`total_pages == 0`) is accepted with no items.
    pub fn new(current_page: u32, total_pages: u32, max_buttons: u32) -> Result<Self, PagingError> {
        if total_pages > 0 && !(1..=total_pages).contains(&current_page) {
            return Err(PagingError::CurrentPageOutOfRange {
                current_page,
                total_pages,
            });
        }

        Ok(Self::build(current_page, total_pages, max_buttons))
    }

    /// Build a range after clamping the current page into bounds.
    pub fn clamped(current_page: u32, total_pages: u32, max_buttons: u32) -> Self {
        Self::build(clamp_page(current_page, total_pages), total_pages, max_buttons)
    }

    fn build(current_page: u32, total_pages: u32, max_buttons: u32) -> Self {
        Self {
            current_page,
            total_pages,
            items: generate(current_page, total_pages, max_buttons),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn items(&self) -> &[PageItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<PageItem> {
        self.items
    }

    pub fn has_previous(&self) -> bool {
        self.total_pages > 0 && self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.current_page + 1)
    }
}

/// Number of pages needed for `item_count` items. A zero page size counts as 1.
pub fn total_pages(item_count: usize, page_size: usize) -> u32 {
    let pages = item_count.div_ceil(page_size.max(1));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamp a requested page into `1..=total_pages` (page 1 when there are no pages).
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Half-open, 0-based item bounds for a page, clamped to `total_items`.
pub fn item_range(current_page: u32, page_size: usize, total_items: usize) -> (usize, usize) {
    let page_size = page_size.max(1);
    let start = (current_page.saturating_sub(1) as usize).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total_items);
    (start.min(total_items), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Render items as page numbers with `0` standing in for an ellipsis.
    fn layout(items: &[PageItem]) -> Vec<u32> {
        items.iter().map(|item| item.page_number.unwrap_or(0)).collect()
    }

    fn current_of(items: &[PageItem]) -> Vec<u32> {
        items
            .iter()
            .filter(|item| item.is_current_page)
            .filter_map(|item| item.page_number)
            .collect()
    }

    #[test]
    fn near_start_shows_leading_pages_then_last() {
        let items = generate(1, 17, 5);
        assert_eq!(layout(&items), vec![1, 2, 3, 0, 17]);
        assert_eq!(current_of(&items), vec![1]);
    }

    #[test]
    fn near_end_shows_first_then_trailing_pages() {
        let items = generate(15, 17, 7);
        assert_eq!(layout(&items), vec![1, 0, 13, 14, 15, 16, 17]);
        assert_eq!(current_of(&items), vec![15]);
    }

    #[test]
    fn middle_shows_ellipsis_on_both_sides() {
        let items = generate(8, 17, 5);
        assert_eq!(layout(&items), vec![1, 0, 8, 0, 17]);
        assert!(items[1].is_range && items[3].is_range);
        assert_eq!(current_of(&items), vec![8]);
    }

    #[test]
    fn fits_in_window_lists_every_page() {
        let items = generate(1, 4, 6);
        assert_eq!(layout(&items), vec![1, 2, 3, 4]);
        assert!(items.iter().all(|item| !item.is_range));
    }

    #[test]
    fn gap_of_two_is_filled_with_the_skipped_page() {
        let items = generate(3, 17, 5);
        assert_eq!(layout(&items), vec![1, 2, 3, 0, 17]);
        assert_eq!(current_of(&items), vec![3]);
    }

    #[test]
    fn three_buttons_collapse_to_first_ellipsis_last() {
        assert_eq!(layout(&generate(1, 5, 3)), vec![1, 0, 5]);
        assert_eq!(layout(&generate(5, 5, 3)), vec![1, 0, 5]);
    }

    #[test]
    fn three_buttons_in_the_middle_may_use_five_slots() {
        assert_eq!(layout(&generate(3, 5, 3)), vec![1, 2, 3, 4, 5]);
        assert_eq!(layout(&generate(4, 9, 3)), vec![1, 0, 4, 0, 9]);
        assert_eq!(layout(&generate(5, 9, 4)), vec![1, 0, 5, 0, 9]);
    }

    #[test]
    fn fewer_than_three_buttons_behave_like_three() {
        assert_eq!(generate(1, 5, 0), generate(1, 5, 3));
        assert_eq!(generate(4, 9, 2), generate(4, 9, 3));
    }

    #[test]
    fn even_window_leans_toward_the_next_page() {
        // max 6 leaves a two-page window in the middle.
        let items = generate(8, 17, 6);
        assert_eq!(layout(&items), vec![1, 0, 8, 9, 0, 17]);
    }

    #[test]
    fn no_pages_yields_no_items() {
        assert!(generate(1, 0, 5).is_empty());
    }

    #[test]
    fn invariants_hold_across_inputs() {
        for max_buttons in 3..=11 {
            for total in 1..=40 {
                for current in 1..=total {
                    let items = generate(current, total, max_buttons);
                    let label = format!("generate({current}, {total}, {max_buttons})");

                    assert_eq!(current_of(&items), vec![current], "{label}");

                    for (index, item) in items.iter().enumerate() {
                        assert_eq!(item.id, index, "{label}");
                        assert_eq!(item.is_range, item.page_number.is_none(), "{label}");
                    }

                    assert_eq!(items.first().and_then(|i| i.page_number), Some(1), "{label}");
                    assert_eq!(items.last().and_then(|i| i.page_number), Some(total), "{label}");

                    for pair in items.windows(2) {
                        match (pair[0].page_number, pair[1].page_number) {
                            (Some(a), Some(b)) => assert_eq!(b, a + 1, "{label}"),
                            (None, None) => panic!("adjacent ellipses in {label}"),
                            _ => {}
                        }
                    }

                    // An ellipsis always stands for at least two hidden pages.
                    for triple in items.windows(3) {
                        if triple[1].is_range {
                            let a = triple[0].page_number.unwrap_or_default();
                            let b = triple[2].page_number.unwrap_or_default();
                            assert!(b - a > 2, "{label}");
                        }
                    }

                    if total <= max_buttons {
                        assert_eq!(layout(&items), (1..=total).collect::<Vec<_>>(), "{label}");
                    } else if max_buttons >= 5 {
                        assert_eq!(items.len(), max_buttons as usize, "{label}");
                    } else {
                        assert!(items.len() <= 5, "{label}");
                    }
                    assert!(items.len() <= max_buttons.max(5) as usize, "{label}");
                }
            }
        }
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(generate(9, 30, 7), generate(9, 30, 7));
    }

    #[test]
    fn page_range_rejects_out_of_range_current_page() {
        assert_eq!(
            PageRange::new(0, 10, 5),
            Err(PagingError::CurrentPageOutOfRange {
                current_page: 0,
                total_pages: 10
            })
        );
        assert!(PageRange::new(11, 10, 5).is_err());
        assert!(PageRange::new(1, 0, 5).unwrap().items().is_empty());
    }

    #[test]
    fn clamped_range_marks_the_nearest_valid_page() {
        let range = PageRange::clamped(99, 10, 5);
        assert_eq!(range.current_page(), 10);
        assert_eq!(current_of(range.items()), vec![10]);
        assert_eq!(range.next_page(), None);
        assert_eq!(range.previous_page(), Some(9));

        let range = PageRange::clamped(0, 10, 5);
        assert_eq!(range.current_page(), 1);
        assert!(!range.has_previous());
        assert_eq!(range.next_page(), Some(2));
    }

    #[test]
    fn paging_math_helpers() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(57, 20), 3);
        assert_eq!(total_pages(5, 0), 5);

        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(7, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);

        assert_eq!(item_range(1, 20, 57), (0, 20));
        assert_eq!(item_range(3, 20, 57), (40, 57));
        assert_eq!(item_range(9, 20, 57), (57, 57));
    }
}
