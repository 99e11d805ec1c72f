use std::ops::Range;

/// First visible row so that `selected_index` stays on screen.
pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    0
}

/// Cards that fit in `height` rows when each card takes `card_height` rows.
pub fn visible_cards(total: usize, height: u16, card_height: u16, selected: usize) -> Range<usize> {
    let fits = usize::from(height / card_height.max(1)).max(1);
    let start = scroll_offset(total, fits, selected);
    start..total.min(start + fits)
}
