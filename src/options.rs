use crate::{GapStrategy, Orientation};

/// Configuration for [`crate::StaggeredGrid`].
///
/// Fields are public so hosts can build options in one expression; the grid validates them in
/// [`crate::StaggeredGrid::new`]. After construction, change them through the grid's setters so
/// span assignments and pending layouts stay consistent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Number of spans (columns for vertical grids, rows for horizontal ones). Must be >= 1.
    pub span_count: usize,
    pub orientation: Orientation,
    /// Lays out from the end of the container. Traversal order of items is unchanged.
    pub reverse_layout: bool,
    pub gap_strategy: GapStrategy,
    /// Right-to-left layout direction reported by the host.
    pub layout_rtl: bool,
    /// When false, fills run to the container edges instead of the padded edges.
    pub clip_to_padding: bool,
    /// Pixel-accurate scrollbar values instead of item-count based ones.
    pub smooth_scrollbar: bool,
    /// Quiet period after the last scroll event before the idle gap check becomes due.
    pub scroll_idle_delay_ms: u64,
}

impl LayoutOptions {
    pub fn new(span_count: usize, orientation: Orientation) -> Self {
        Self {
            span_count,
            orientation,
            reverse_layout: false,
            gap_strategy: GapStrategy::MoveItemsBetweenSpans,
            layout_rtl: false,
            clip_to_padding: true,
            smooth_scrollbar: true,
            scroll_idle_delay_ms: 150,
        }
    }

    pub fn with_reverse_layout(mut self, reverse_layout: bool) -> Self {
        self.reverse_layout = reverse_layout;
        self
    }

    pub fn with_gap_strategy(mut self, gap_strategy: GapStrategy) -> Self {
        self.gap_strategy = gap_strategy;
        self
    }

    pub fn with_layout_rtl(mut self, layout_rtl: bool) -> Self {
        self.layout_rtl = layout_rtl;
        self
    }

    pub fn with_clip_to_padding(mut self, clip_to_padding: bool) -> Self {
        self.clip_to_padding = clip_to_padding;
        self
    }

    pub fn with_smooth_scrollbar(mut self, smooth_scrollbar: bool) -> Self {
        self.smooth_scrollbar = smooth_scrollbar;
        self
    }

    pub fn with_scroll_idle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.scroll_idle_delay_ms = delay_ms;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::new(2, Orientation::Vertical)
    }
}
