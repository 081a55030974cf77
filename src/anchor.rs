use alloc::vec::Vec;

/// Seed for a layout pass: which position to start from and where to put it.
#[derive(Clone, Debug, Default)]
pub(crate) struct AnchorInfo {
    pub(crate) position: Option<usize>,
    /// Line for the anchor edge, or a shift for cached reference lines.
    pub(crate) offset: Option<i32>,
    pub(crate) layout_from_end: bool,
    pub(crate) invalidate_offsets: bool,
    pub(crate) valid: bool,
    /// Per-span start lines captured when spans were re-seeded, reused by a following pass
    /// while the anchor stays valid.
    pub(crate) span_reference_lines: Option<Vec<Option<i32>>>,
}

impl AnchorInfo {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn assign_coordinate_from_padding(
        &mut self,
        start_after_padding: i32,
        end_after_padding: i32,
    ) {
        self.offset = Some(if self.layout_from_end {
            end_after_padding
        } else {
            start_after_padding
        });
    }

    pub(crate) fn assign_coordinate_from_padding_with(
        &mut self,
        added_distance: i32,
        start_after_padding: i32,
        end_after_padding: i32,
    ) {
        self.offset = Some(if self.layout_from_end {
            end_after_padding - added_distance
        } else {
            start_after_padding + added_distance
        });
    }
}

/// A scroll-to-position request waiting for the next layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingScroll {
    pub(crate) position: usize,
    pub(crate) offset: Option<i32>,
}
