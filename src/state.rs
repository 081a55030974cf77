use alloc::vec::Vec;

use crate::FullSpanItem;

/// A serializable snapshot of a grid's scroll position and span assignments.
///
/// Produced by [`crate::StaggeredGrid::save_state`] and consumed by
/// [`crate::StaggeredGrid::restore_state`]. With `feature = "serde"`, this type implements
/// `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedState {
    pub reverse_layout: bool,
    /// Whether the last layout anchored at the end; decides which padded edge the span
    /// offsets are relative to.
    pub anchor_layout_from_end: bool,
    pub last_layout_rtl: bool,
    /// One line per span relative to the padded edge, empty when nothing was attached.
    pub span_offsets: Vec<Option<i32>>,
    pub anchor_position: Option<usize>,
    pub visible_anchor_position: Option<usize>,
    pub span_lookup: Vec<Option<usize>>,
    pub full_span_items: Vec<FullSpanItem>,
}

impl SavedState {
    /// Drops everything tied to the span layout, keeping only the anchor positions.
    pub fn invalidate_span_info(&mut self) {
        self.span_offsets.clear();
        self.span_lookup.clear();
        self.full_span_items.clear();
    }

    pub fn invalidate_anchor_position_info(&mut self) {
        self.span_offsets.clear();
        self.anchor_position = None;
        self.visible_anchor_position = None;
    }
}
