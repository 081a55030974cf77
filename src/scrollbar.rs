use crate::OrientationOracle;

/// Primary-axis extent and adapter position of an attached item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Edge {
    pub(crate) position: usize,
    pub(crate) start: i32,
    pub(crate) end: i32,
}

fn round_div(numerator: i64, denominator: i64) -> i64 {
    debug_assert!(numerator >= 0 && denominator > 0);
    (2 * numerator + denominator) / (2 * denominator)
}

pub(crate) fn scroll_offset(
    axis: &impl OrientationOracle,
    start: Edge,
    end: Edge,
    item_count: usize,
    smooth: bool,
    reverse: bool,
) -> i32 {
    if item_count == 0 {
        return 0;
    }
    let min_position = start.position.min(end.position);
    let max_position = start.position.max(end.position);
    let items_before = if reverse {
        item_count.saturating_sub(max_position + 1)
    } else {
        min_position
    };
    if !smooth {
        return items_before as i32;
    }
    let laid_out_area = (end.end - start.start).unsigned_abs() as i64;
    let item_range = (start.position.abs_diff(end.position) + 1) as i64;
    let scrolled = round_div(items_before as i64 * laid_out_area, item_range);
    (scrolled + (axis.start_after_padding() - start.start) as i64) as i32
}

pub(crate) fn scroll_extent(
    axis: &impl OrientationOracle,
    start: Edge,
    end: Edge,
    item_count: usize,
    smooth: bool,
) -> i32 {
    if item_count == 0 {
        return 0;
    }
    if !smooth {
        return (start.position.abs_diff(end.position) + 1) as i32;
    }
    let extent = end.end - start.start;
    axis.total_space().min(extent)
}

pub(crate) fn scroll_range(start: Edge, end: Edge, item_count: usize, smooth: bool) -> i32 {
    if item_count == 0 {
        return 0;
    }
    if !smooth {
        return item_count as i32;
    }
    let laid_out_area = (end.end - start.start) as i64;
    let laid_out_range = (start.position.abs_diff(end.position) + 1) as i64;
    (laid_out_area * item_count as i64 / laid_out_range) as i32
}
