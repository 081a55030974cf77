use alloc::vec::Vec;

use crate::anchor::{AnchorInfo, PendingScroll};
use crate::children::ChildList;
use crate::lookup::SpanLookup;
use crate::provider::ItemSource;
use crate::span::{LineContext, Span};
use crate::{
    Axis, GapStrategy, GridError, IdleTask, ItemProvider, LayoutDirection, LayoutOptions,
    MeasureMode, Orientation, OrientationOracle, OrientedAxis, SavedState, Viewport,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UpdateOp {
    Add,
    Remove,
    Update,
    Move,
}

/// A headless staggered grid layout engine.
///
/// The grid distributes a one-dimensional sequence of items over `span_count` parallel spans,
/// keeps a stable position -> span table across passes, and repairs the uneven span ends that
/// full-span items leave behind after data changes.
///
/// It owns no UI objects. The host drives it by:
/// - supplying geometry with [`Self::set_viewport`];
/// - running passes with [`Self::layout`] (or [`Self::measure`] / [`Self::pre_layout`]) whenever
///   [`Self::is_layout_requested`] says so;
/// - forwarding scroll deltas to [`Self::scroll_by`] and data changes to `on_items_*`;
/// - calling [`Self::tick`] from its frame/timer loop so the idle gap check can run.
///
/// Items come from an [`ItemProvider`] passed into each pass; attached items are readable
/// through [`Self::children`].
#[derive(Clone, Debug)]
pub struct StaggeredGrid<I> {
    pub(crate) options: LayoutOptions,
    pub(crate) viewport: Viewport,
    pub(crate) spans: Vec<Span>,
    pub(crate) lookup: SpanLookup,
    pub(crate) children: ChildList<I>,
    pub(crate) anchor: AnchorInfo,
    pub(crate) should_reverse: bool,
    pub(crate) last_layout_from_end: bool,
    pub(crate) last_layout_rtl: bool,
    pub(crate) pending_scroll: Option<PendingScroll>,
    pub(crate) pending_state: Option<SavedState>,
    pub(crate) laid_out_invalid_full_span: bool,
    pub(crate) size_per_span: i32,
    pub(crate) full_size: i32,
    /// Spans were recreated since the last pass; their lines carry no reference.
    spans_reset: bool,
    pub(crate) layout_requested: bool,
    pub(crate) simple_animations: bool,
    /// A gap check already asked for a re-layout that has not run yet.
    pub(crate) gap_fix_pending: bool,
    pub(crate) idle: IdleTask,
    is_scrolling: bool,
    last_scroll_event_ms: Option<u64>,
}

impl<I> StaggeredGrid<I> {
    /// Creates a grid. Fails when `options.span_count` is zero.
    pub fn new(options: LayoutOptions) -> Result<Self, GridError> {
        if options.span_count == 0 {
            return Err(GridError::InvalidSpanCount(0));
        }
        gdebug!(
            span_count = options.span_count,
            orientation = ?options.orientation,
            reverse_layout = options.reverse_layout,
            "StaggeredGrid::new"
        );
        let mut grid = Self {
            spans: (0..options.span_count).map(Span::new).collect(),
            options,
            viewport: Viewport::default(),
            lookup: SpanLookup::new(),
            children: ChildList::default(),
            anchor: AnchorInfo::default(),
            should_reverse: false,
            last_layout_from_end: false,
            last_layout_rtl: false,
            pending_scroll: None,
            pending_state: None,
            laid_out_invalid_full_span: false,
            size_per_span: 0,
            full_size: 0,
            spans_reset: false,
            layout_requested: true,
            simple_animations: false,
            gap_fix_pending: false,
            idle: IdleTask::new(),
            is_scrolling: false,
            last_scroll_event_ms: None,
        };
        grid.resolve_should_layout_reverse();
        Ok(grid)
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    pub fn orientation(&self) -> Orientation {
        self.options.orientation
    }

    pub fn reverse_layout(&self) -> bool {
        self.options.reverse_layout
    }

    pub fn gap_strategy(&self) -> GapStrategy {
        self.options.gap_strategy
    }

    pub fn layout_rtl(&self) -> bool {
        self.options.layout_rtl
    }

    /// Reverse flag after resolving RTL for horizontal grids.
    pub fn should_reverse_layout(&self) -> bool {
        self.should_reverse
    }

    pub(crate) fn primary(&self) -> OrientedAxis {
        OrientedAxis {
            axis: self.viewport.primary(self.options.orientation),
            reversed: self.should_reverse,
        }
    }

    pub(crate) fn secondary(&self) -> Axis {
        self.viewport.secondary(self.options.orientation)
    }

    pub(crate) fn line_context(&self) -> LineContext<'_, I> {
        LineContext {
            children: &self.children,
            lookup: &self.lookup,
            orientation: self.options.orientation,
        }
    }

    /// Whether some change since the last pass needs a new [`Self::layout`].
    pub fn is_layout_requested(&self) -> bool {
        self.layout_requested
    }

    /// Set when a gap check asked for the next layout to skip predictive animations.
    pub fn simple_animations_requested(&self) -> bool {
        self.simple_animations
    }

    pub(crate) fn request_layout(&mut self) {
        self.layout_requested = true;
        self.idle.cancel();
    }

    pub(crate) fn request_simple_layout(&mut self) {
        self.simple_animations = true;
        self.gap_fix_pending = true;
        self.request_layout();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.request_layout();
    }

    /// Changes the number of spans. Clears every span assignment.
    pub fn set_span_count(&mut self, span_count: usize) -> Result<(), GridError> {
        if span_count == 0 {
            return Err(GridError::InvalidSpanCount(span_count));
        }
        if span_count == self.spans.len() {
            return Ok(());
        }
        gdebug!(from = self.spans.len(), to = span_count, "set_span_count");
        self.lookup.clear();
        self.options.span_count = span_count;
        self.rebuild_spans();
        self.request_layout();
        Ok(())
    }

    fn rebuild_spans(&mut self) {
        let span_count = self.options.span_count;
        let orientation = self.options.orientation;
        self.spans = (0..span_count).map(Span::new).collect();
        // Attached children keep pointing at valid spans until the next pass replaces them.
        let ids: Vec<_> = self.children.ids().collect();
        for id in ids {
            let child = self.children.get_mut(id);
            let deleted = if child.pending_removal {
                child.bounds.main_size(orientation)
            } else {
                0
            };
            if child.full_span {
                child.span = 0;
                for span in &mut self.spans {
                    span.append(id, deleted);
                }
            } else {
                child.span = child.span.min(span_count - 1);
                self.spans[child.span].append(id, deleted);
            }
        }
        self.spans_reset = true;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.options.orientation == orientation {
            return;
        }
        self.options.orientation = orientation;
        self.request_layout();
    }

    pub fn set_reverse_layout(&mut self, reverse_layout: bool) {
        if let Some(pending) = self.pending_state.as_mut() {
            pending.reverse_layout = reverse_layout;
        }
        if self.options.reverse_layout == reverse_layout {
            return;
        }
        self.options.reverse_layout = reverse_layout;
        self.request_layout();
    }

    pub fn set_gap_strategy(&mut self, gap_strategy: GapStrategy) {
        if self.options.gap_strategy == gap_strategy {
            return;
        }
        self.options.gap_strategy = gap_strategy;
        self.request_layout();
    }

    pub fn set_layout_rtl(&mut self, layout_rtl: bool) {
        if self.options.layout_rtl == layout_rtl {
            return;
        }
        self.options.layout_rtl = layout_rtl;
        self.request_layout();
    }

    /// Forgets every span assignment; the next pass assigns spans from scratch.
    pub fn invalidate_span_assignments(&mut self) {
        self.lookup.clear();
        self.request_layout();
    }

    pub(crate) fn resolve_should_layout_reverse(&mut self) {
        self.should_reverse =
            if self.options.orientation == Orientation::Vertical || !self.options.layout_rtl {
                self.options.reverse_layout
            } else {
                !self.options.reverse_layout
            };
    }

    /// Span assigned to `position` by an earlier pass, if any.
    pub fn span_for_position(&self, position: usize) -> Option<usize> {
        self.lookup.span(position)
    }

    /// Full-span marker recorded at `position`, if any.
    pub fn full_span_item(&self, position: usize) -> Option<&crate::FullSpanItem> {
        self.lookup.full_span_item(position)
    }

    pub fn full_span_items(&self) -> &[crate::FullSpanItem] {
        self.lookup.full_span_items()
    }

    /// Whether a full-span item was laid out in a way that may leave a gap behind it.
    pub fn has_invalid_full_span(&self) -> bool {
        self.laid_out_invalid_full_span
    }

    /// Start line of a span, if it has one.
    pub fn span_start_line_of(&self, span: usize) -> Option<i32> {
        let cx = self.line_context();
        self.spans.get(span)?.peek_start_line(&cx)
    }

    pub fn span_end_line_of(&self, span: usize) -> Option<i32> {
        let cx = self.line_context();
        self.spans.get(span)?.peek_end_line(&cx)
    }

    /// Runs a full layout pass and completes it: pending scroll requests and restored state
    /// are consumed and the anchor is discarded.
    pub fn layout<P>(&mut self, provider: &mut P)
    where
        P: ItemProvider<Item = I>,
    {
        self.simple_animations = false;
        self.layout_children(provider, false, true);
        self.on_layout_completed();
    }

    /// Runs a layout pass but keeps the anchor, so a following pass lays out around the same
    /// per-span reference lines. Finish with [`Self::layout`].
    pub fn measure<P>(&mut self, provider: &mut P)
    where
        P: ItemProvider<Item = I>,
    {
        self.simple_animations = false;
        self.layout_children(provider, false, true);
    }

    /// Runs a pass over the pre-change state: no gap checking, anchor discarded afterwards.
    pub fn pre_layout<P>(&mut self, provider: &mut P)
    where
        P: ItemProvider<Item = I>,
    {
        self.layout_children(provider, true, false);
    }

    fn on_layout_completed(&mut self) {
        self.pending_scroll = None;
        self.pending_state = None;
        self.anchor.reset();
    }

    fn remove_and_recycle_all<P>(&mut self, provider: &mut P)
    where
        P: ItemProvider<Item = I>,
    {
        for child in self.children.drain() {
            provider.recycle(child.item);
        }
        for span in &mut self.spans {
            span.clear();
        }
    }

    pub(crate) fn layout_children<P>(&mut self, provider: &mut P, pre_layout: bool, check_gaps: bool)
    where
        P: ItemProvider<Item = I>,
    {
        self.layout_requested = false;
        self.gap_fix_pending = false;
        self.idle.cancel();

        let item_count = provider.item_count();
        if (self.pending_state.is_some() || self.pending_scroll.is_some()) && item_count == 0 {
            self.remove_and_recycle_all(provider);
            self.anchor.reset();
            return;
        }

        let recalculate = !self.anchor.valid
            || self.pending_scroll.is_some()
            || self.pending_state.is_some();
        if recalculate {
            self.anchor.reset();
            if self.pending_state.is_some() {
                self.apply_pending_saved_state();
            } else {
                self.resolve_should_layout_reverse();
                self.anchor.layout_from_end = self.should_reverse;
            }
            self.update_anchor_info_for_layout(item_count, pre_layout);
            self.anchor.valid = true;
        }
        if self.pending_state.is_none()
            && self.pending_scroll.is_none()
            && (self.anchor.layout_from_end != self.last_layout_from_end
                || self.options.layout_rtl != self.last_layout_rtl)
        {
            self.lookup.clear();
            self.anchor.invalidate_offsets = true;
        }

        let pending_offsets = self
            .pending_state
            .as_ref()
            .is_some_and(|state| !state.span_offsets.is_empty());
        if !self.children.is_empty() && !pending_offsets {
            self.seed_spans(recalculate);
        }
        self.spans_reset = false;

        gdebug!(
            anchor = ?self.anchor.position,
            offset = ?self.anchor.offset,
            from_end = self.anchor.layout_from_end,
            invalidate_offsets = self.anchor.invalidate_offsets,
            item_count,
            pre_layout,
            "layout pass"
        );

        let mut source = ItemSource::new(provider);
        for child in self.children.drain() {
            if child.removed || child.stale {
                source.recycle(child.item);
            } else {
                source.add_scrap(child.position, child.item);
            }
        }
        // Seeding cleared every span; only their lines survive into the fill.
        debug_assert!(self.spans.iter().all(Span::is_empty));

        self.laid_out_invalid_full_span = false;
        self.update_measure_specs(self.secondary().total_space());

        let anchor_position = self.anchor.position.unwrap_or(0);
        let mut cursor = self.layout_cursor(anchor_position);
        if self.anchor.layout_from_end {
            cursor.set_direction(LayoutDirection::Start, self.should_reverse);
            self.fill(&mut source, &mut cursor);
            cursor.set_direction(LayoutDirection::End, self.should_reverse);
        } else {
            cursor.set_direction(LayoutDirection::End, self.should_reverse);
            self.fill(&mut source, &mut cursor);
            cursor.set_direction(LayoutDirection::Start, self.should_reverse);
        }
        cursor.current_position = anchor_position as isize + cursor.item_direction.step();
        self.fill(&mut source, &mut cursor);

        self.reposition_to_wrap_content_if_necessary();

        if !self.children.is_empty() {
            if self.should_reverse {
                self.fix_end_gap(&mut source, true);
                self.fix_start_gap(&mut source, false);
            } else {
                self.fix_start_gap(&mut source, true);
                self.fix_end_gap(&mut source, false);
            }
        }

        let mut has_gaps = false;
        if check_gaps && !pre_layout {
            let need_check = self.options.gap_strategy != GapStrategy::None
                && !self.children.is_empty()
                && (self.laid_out_invalid_full_span || self.has_gaps_to_fix().is_some());
            if need_check {
                self.idle.cancel();
                has_gaps = self.check_for_gaps();
            }
        }
        if pre_layout {
            self.anchor.reset();
        }
        self.last_layout_from_end = self.anchor.layout_from_end;
        self.last_layout_rtl = self.options.layout_rtl;
        source.finish();

        if has_gaps {
            gdebug!("gaps found, laying out once more");
            self.anchor.reset();
            self.layout_children(provider, pre_layout, false);
        }
    }

    fn seed_spans(&mut self, recalculate: bool) {
        if self.spans_reset {
            for span in &mut self.spans {
                span.clear();
            }
        }
        if self.anchor.invalidate_offsets {
            let offset = self.anchor.offset;
            for span in &mut self.spans {
                span.clear();
                if offset.is_some() {
                    span.set_line(offset);
                }
            }
        } else if recalculate || self.anchor.span_reference_lines.is_none() {
            let primary = self.primary();
            let reverse = primary.is_reversed();
            let offset = self.anchor.offset;
            let cx = LineContext {
                children: &self.children,
                lookup: &self.lookup,
                orientation: self.options.orientation,
            };
            for span in &mut self.spans {
                span.cache_reference_line_and_clear(
                    reverse,
                    offset,
                    primary.start_after_padding(),
                    primary.end_after_padding(),
                    &cx,
                );
            }
            self.anchor.span_reference_lines =
                Some(self.spans.iter().map(Span::cached_start).collect());
        } else if let Some(lines) = self.anchor.span_reference_lines.as_ref() {
            for (span, line) in self.spans.iter_mut().zip(lines) {
                span.clear();
                span.set_line(*line);
            }
        }
    }

    fn apply_pending_saved_state(&mut self) {
        let Some(mut state) = self.pending_state.take() else {
            return;
        };
        gdebug!(
            anchor = ?state.anchor_position,
            offsets = state.span_offsets.len(),
            lookup = state.span_lookup.len(),
            "applying saved state"
        );
        if !state.span_offsets.is_empty() {
            if state.span_offsets.len() == self.spans.len() {
                let primary = self.primary();
                for (span, offset) in self.spans.iter_mut().zip(&state.span_offsets) {
                    span.clear();
                    let line = offset.map(|offset| {
                        if state.anchor_layout_from_end {
                            offset + primary.end_after_padding()
                        } else {
                            offset + primary.start_after_padding()
                        }
                    });
                    span.set_line(line);
                }
            } else {
                state.invalidate_span_info();
                state.anchor_position = state.visible_anchor_position;
            }
        }
        self.last_layout_rtl = state.last_layout_rtl;
        self.options.reverse_layout = state.reverse_layout;
        self.resolve_should_layout_reverse();

        match state.anchor_position {
            Some(position) => {
                self.pending_scroll = Some(PendingScroll {
                    position,
                    offset: None,
                });
                self.anchor.layout_from_end = state.anchor_layout_from_end;
            }
            None => self.anchor.layout_from_end = self.should_reverse,
        }
        if state.span_lookup.len() > 1 {
            self.lookup
                .restore(state.span_lookup.clone(), state.full_span_items.clone());
        }
        self.pending_state = Some(state);
    }

    fn update_anchor_info_for_layout(&mut self, item_count: usize, pre_layout: bool) {
        if self.update_anchor_from_pending_data(item_count, pre_layout) {
            return;
        }
        if self.update_anchor_from_children(item_count) {
            return;
        }
        let primary = self.primary();
        self.anchor
            .assign_coordinate_from_padding(primary.start_after_padding(), primary.end_after_padding());
        self.anchor.position = Some(0);
    }

    fn update_anchor_from_children(&mut self, item_count: usize) -> bool {
        if self.children.is_empty() {
            return false;
        }
        let valid = |child: &&crate::children::Child<I>| !child.removed && child.position < item_count;
        let found = if self.last_layout_from_end {
            self.children.iter().rev().find(valid)
        } else {
            self.children.iter().find(valid)
        };
        self.anchor.position = Some(found.map_or(0, |child| child.position));
        self.anchor.offset = None;
        true
    }

    fn update_anchor_from_pending_data(&mut self, item_count: usize, pre_layout: bool) -> bool {
        if pre_layout {
            return false;
        }
        let Some(pending) = self.pending_scroll else {
            return false;
        };
        if pending.position >= item_count {
            gwarn!(
                position = pending.position,
                item_count,
                "scroll target out of range, ignoring"
            );
            self.pending_scroll = None;
            return false;
        }

        let restoring_offsets = self.pending_state.as_ref().is_some_and(|state| {
            state.anchor_position.is_some() && !state.span_offsets.is_empty()
        });
        if restoring_offsets {
            self.anchor.offset = None;
            self.anchor.position = Some(pending.position);
            return true;
        }

        let primary = self.primary();
        let orientation = self.options.orientation;
        match self.children.find_by_position(pending.position) {
            Some(id) => {
                let bounds = self.children.get(id).bounds;
                self.anchor.position = Some(if primary.is_reversed() {
                    self.last_child_position()
                } else {
                    self.first_child_position()
                });
                if let Some(offset) = pending.offset {
                    self.anchor.offset = Some(if self.anchor.layout_from_end {
                        primary.end_after_padding() - offset - bounds.main_end(orientation)
                    } else {
                        primary.start_after_padding() + offset - bounds.main_start(orientation)
                    });
                    return true;
                }
                if bounds.main_size(orientation) > primary.total_space() {
                    self.anchor.offset = Some(if self.anchor.layout_from_end {
                        primary.end_after_padding()
                    } else {
                        primary.start_after_padding()
                    });
                    return true;
                }
                let start_gap = bounds.main_start(orientation) - primary.start_after_padding();
                if start_gap < 0 {
                    self.anchor.offset = Some(-start_gap);
                    return true;
                }
                let end_gap = primary.end_after_padding() - bounds.main_end(orientation);
                if end_gap < 0 {
                    self.anchor.offset = Some(end_gap);
                    return true;
                }
                self.anchor.offset = None;
            }
            None => {
                self.anchor.position = Some(pending.position);
                match pending.offset {
                    None => {
                        let direction = self.scroll_direction_for_position(pending.position);
                        self.anchor.layout_from_end = direction == LayoutDirection::End;
                        self.anchor.assign_coordinate_from_padding(
                            primary.start_after_padding(),
                            primary.end_after_padding(),
                        );
                    }
                    Some(offset) => self.anchor.assign_coordinate_from_padding_with(
                        offset,
                        primary.start_after_padding(),
                        primary.end_after_padding(),
                    ),
                }
                self.anchor.invalidate_offsets = true;
            }
        }
        true
    }

    pub(crate) fn update_measure_specs(&mut self, total_space: i32) {
        self.size_per_span = total_space / self.spans.len() as i32;
        self.full_size = total_space;
    }

    fn reposition_to_wrap_content_if_necessary(&mut self) {
        let secondary = self.secondary();
        if secondary.mode == MeasureMode::Exactly {
            return;
        }
        let orientation = self.options.orientation;
        let span_count = self.spans.len() as i32;
        let mut desired = 0;
        for child in self.children.iter() {
            let size = child.bounds.cross_size(orientation);
            desired = desired.max(if child.full_span {
                size
            } else {
                size * span_count
            });
        }
        if secondary.mode == MeasureMode::AtMost {
            desired = desired.min(secondary.total_space());
        }
        let before = self.size_per_span;
        self.update_measure_specs(desired);
        let after = self.size_per_span;
        if after == before {
            return;
        }
        let from_end = self.options.layout_rtl && orientation == Orientation::Vertical;
        for child in self.children.iter_mut() {
            if child.full_span {
                continue;
            }
            let span = child.span as i32;
            let delta = if from_end {
                let steps = span_count - 1 - span;
                -steps * after + steps * before
            } else {
                span * after - span * before
            };
            child.bounds.offset_cross(orientation, delta);
        }
    }

    pub(crate) fn first_child_position(&self) -> usize {
        self.children.first().map_or(0, |child| child.position)
    }

    pub(crate) fn last_child_position(&self) -> usize {
        self.children.last().map_or(0, |child| child.position)
    }

    /// Captures the scroll position and span assignments.
    ///
    /// While restored state is still waiting for a layout, that state is returned unchanged.
    pub fn save_state(&self) -> SavedState {
        if let Some(pending) = self.pending_state.as_ref() {
            return pending.clone();
        }
        let mut state = SavedState {
            reverse_layout: self.options.reverse_layout,
            anchor_layout_from_end: self.last_layout_from_end,
            last_layout_rtl: self.last_layout_rtl,
            ..SavedState::default()
        };
        if self.lookup.len() > 0 {
            state.span_lookup = self.lookup.data().to_vec();
            state.full_span_items = self.lookup.full_span_items().to_vec();
        }
        if !self.children.is_empty() {
            state.anchor_position = Some(if self.last_layout_from_end {
                self.last_child_position()
            } else {
                self.first_child_position()
            });
            state.visible_anchor_position = self.first_visible_item_position();
            let primary = self.primary();
            let cx = self.line_context();
            state.span_offsets = self
                .spans
                .iter()
                .map(|span| {
                    if self.last_layout_from_end {
                        span.peek_end_line(&cx)
                            .map(|line| line - primary.end_after_padding())
                    } else {
                        span.peek_start_line(&cx)
                            .map(|line| line - primary.start_after_padding())
                    }
                })
                .collect();
        }
        state
    }

    /// Queues a snapshot from [`Self::save_state`]; it is applied by the next layout.
    pub fn restore_state(&mut self, mut state: SavedState) {
        if self.pending_scroll.is_some() {
            state.invalidate_anchor_position_info();
            state.invalidate_span_info();
        }
        self.pending_state = Some(state);
        self.request_layout();
    }

    pub fn on_items_added(&mut self, position_start: usize, item_count: usize) {
        self.handle_update(position_start, item_count, UpdateOp::Add);
        for child in self.children.iter_mut() {
            if !child.removed && child.position >= position_start {
                child.position += item_count;
            }
        }
    }

    pub fn on_items_removed(&mut self, position_start: usize, item_count: usize) {
        self.handle_update(position_start, item_count, UpdateOp::Remove);
        let end = position_start + item_count;
        for child in self.children.iter_mut() {
            if child.removed || child.position < position_start {
                continue;
            }
            if child.position < end {
                child.removed = true;
            } else {
                child.position -= item_count;
            }
        }
    }

    pub fn on_items_updated(&mut self, position_start: usize, item_count: usize) {
        self.handle_update(position_start, item_count, UpdateOp::Update);
        let end = position_start + item_count;
        for child in self.children.iter_mut() {
            if (position_start..end).contains(&child.position) {
                child.stale = true;
            }
        }
    }

    /// One item moved from `from` to `to`.
    pub fn on_items_moved(&mut self, from: usize, to: usize) {
        self.handle_update(from, to, UpdateOp::Move);
        for child in self.children.iter_mut() {
            if child.removed {
                continue;
            }
            let p = child.position;
            if p == from {
                child.position = to;
            } else if from < to && p > from && p <= to {
                child.position -= 1;
            } else if to < from && p >= to && p < from {
                child.position += 1;
            }
        }
    }

    /// The whole data set changed.
    pub fn on_items_changed(&mut self) {
        self.lookup.clear();
        for child in self.children.iter_mut() {
            child.stale = true;
        }
        self.request_layout();
    }

    fn handle_update(&mut self, position_start: usize, count_or_to: usize, op: UpdateOp) {
        let min_position = if self.should_reverse {
            self.last_child_position()
        } else {
            self.first_child_position()
        };
        let (affected_start, affected_end) = match op {
            UpdateOp::Move if position_start < count_or_to => (position_start, count_or_to + 1),
            UpdateOp::Move => (count_or_to, position_start + 1),
            _ => (position_start, position_start + count_or_to),
        };
        gtrace!(?op, affected_start, affected_end, "data change");

        self.lookup.invalidate_after(affected_start);
        match op {
            UpdateOp::Add => self.lookup.offset_for_addition(position_start, count_or_to),
            UpdateOp::Remove => self.lookup.offset_for_removal(position_start, count_or_to),
            UpdateOp::Move => {
                self.lookup.offset_for_removal(position_start, 1);
                self.lookup.offset_for_addition(count_or_to, 1);
            }
            UpdateOp::Update => {}
        }

        if affected_end <= min_position {
            return;
        }
        let max_position = if self.should_reverse {
            self.first_child_position()
        } else {
            self.last_child_position()
        };
        if affected_start <= max_position {
            self.request_layout();
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Records user scrolling. Cancels a pending idle gap check.
    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.is_scrolling = true;
        self.last_scroll_event_ms = Some(now_ms);
        self.idle.cancel();
    }

    /// Scrolling settled; schedules one gap check.
    pub fn set_scroll_idle(&mut self, now_ms: u64) {
        self.is_scrolling = false;
        self.last_scroll_event_ms = None;
        self.idle.schedule(now_ms, 0);
    }

    pub fn is_gap_check_pending(&self) -> bool {
        self.idle.is_pending()
    }

    /// Advances the idle clock.
    ///
    /// Ends a scroll once `scroll_idle_delay_ms` passed without events, then runs the due gap
    /// check. Returns `true` when that check requested a re-layout.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.is_scrolling {
            if let Some(last) = self.last_scroll_event_ms {
                if now_ms.saturating_sub(last) >= self.options.scroll_idle_delay_ms {
                    self.set_scroll_idle(now_ms);
                }
            }
        }
        if self.idle.take_due(now_ms) {
            return self.check_for_gaps();
        }
        false
    }
}
