use alloc::collections::VecDeque;

use crate::children::{ChildId, ChildList};
use crate::lookup::SpanLookup;
use crate::{LayoutDirection, Orientation};

/// What a span needs to recompute its boundary lines.
pub(crate) struct LineContext<'a, I> {
    pub(crate) children: &'a ChildList<I>,
    pub(crate) lookup: &'a SpanLookup,
    pub(crate) orientation: Orientation,
}

/// One track of the grid.
///
/// Holds its attached children in primary-axis order and caches the start and end lines.
/// A cached line of `None` means "recompute from the boundary child".
#[derive(Clone, Debug)]
pub(crate) struct Span {
    pub(crate) index: usize,
    items: VecDeque<ChildId>,
    cached_start: Option<i32>,
    cached_end: Option<i32>,
    deleted_size: i32,
}

impl Span {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            items: VecDeque::new(),
            cached_start: None,
            cached_end: None,
            deleted_size: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn first(&self) -> Option<ChildId> {
        self.items.front().copied()
    }

    pub(crate) fn last(&self) -> Option<ChildId> {
        self.items.back().copied()
    }

    pub(crate) fn items(&self) -> impl DoubleEndedIterator<Item = ChildId> + ExactSizeIterator + '_ {
        self.items.iter().copied()
    }

    pub(crate) fn deleted_size(&self) -> i32 {
        self.deleted_size
    }

    fn compute_start<I>(&self, cx: &LineContext<'_, I>) -> Option<i32> {
        let child = cx.children.get(self.first()?);
        let mut start = child.bounds.main_start(cx.orientation);
        if child.full_span {
            if let Some(fsi) = cx.lookup.full_span_item(child.position) {
                if fsi.gap_dir == LayoutDirection::Start {
                    start -= fsi.gap_for_span(self.index);
                }
            }
        }
        Some(start)
    }

    fn compute_end<I>(&self, cx: &LineContext<'_, I>) -> Option<i32> {
        let child = cx.children.get(self.last()?);
        let mut end = child.bounds.main_end(cx.orientation);
        if child.full_span {
            if let Some(fsi) = cx.lookup.full_span_item(child.position) {
                if fsi.gap_dir == LayoutDirection::End {
                    end += fsi.gap_for_span(self.index);
                }
            }
        }
        Some(end)
    }

    /// Start line, computed and cached from the first child when not cached.
    pub(crate) fn start_line<I>(&mut self, cx: &LineContext<'_, I>) -> Option<i32> {
        if self.cached_start.is_none() {
            self.cached_start = self.compute_start(cx);
        }
        self.cached_start
    }

    pub(crate) fn end_line<I>(&mut self, cx: &LineContext<'_, I>) -> Option<i32> {
        if self.cached_end.is_none() {
            self.cached_end = self.compute_end(cx);
        }
        self.cached_end
    }

    /// Start line without touching the cache.
    pub(crate) fn peek_start_line<I>(&self, cx: &LineContext<'_, I>) -> Option<i32> {
        self.cached_start.or_else(|| self.compute_start(cx))
    }

    pub(crate) fn peek_end_line<I>(&self, cx: &LineContext<'_, I>) -> Option<i32> {
        self.cached_end.or_else(|| self.compute_end(cx))
    }

    pub(crate) fn prepend(&mut self, id: ChildId, deleted: i32) {
        self.items.push_front(id);
        self.cached_start = None;
        if self.items.len() == 1 {
            self.cached_end = None;
        }
        self.deleted_size += deleted;
    }

    pub(crate) fn append(&mut self, id: ChildId, deleted: i32) {
        self.items.push_back(id);
        self.cached_end = None;
        if self.items.len() == 1 {
            self.cached_start = None;
        }
        self.deleted_size += deleted;
    }

    pub(crate) fn pop_end(&mut self, deleted: i32) -> Option<ChildId> {
        let id = self.items.pop_back()?;
        self.deleted_size -= deleted;
        if self.items.is_empty() {
            self.cached_start = None;
        }
        self.cached_end = None;
        Some(id)
    }

    pub(crate) fn pop_start(&mut self, deleted: i32) -> Option<ChildId> {
        let id = self.items.pop_front()?;
        if self.items.is_empty() {
            self.cached_end = None;
        }
        self.deleted_size -= deleted;
        self.cached_start = None;
        Some(id)
    }

    /// Clears the span but keeps its leading line when that line sits before the padded edge,
    /// shifted by `offset`. Used to lay out again around the same reference.
    pub(crate) fn cache_reference_line_and_clear<I>(
        &mut self,
        reverse_layout: bool,
        offset: Option<i32>,
        start_after_padding: i32,
        end_after_padding: i32,
        cx: &LineContext<'_, I>,
    ) {
        let reference = if reverse_layout {
            self.end_line(cx)
        } else {
            self.start_line(cx)
        };
        self.clear();
        let Some(mut reference) = reference else {
            return;
        };
        let inside = if reverse_layout {
            reference < end_after_padding
        } else {
            reference > start_after_padding
        };
        if inside {
            return;
        }
        if let Some(offset) = offset {
            reference += offset;
        }
        self.set_line(Some(reference));
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.invalidate_cache();
        self.deleted_size = 0;
    }

    pub(crate) fn invalidate_cache(&mut self) {
        self.cached_start = None;
        self.cached_end = None;
    }

    pub(crate) fn set_line(&mut self, line: Option<i32>) {
        self.cached_start = line;
        self.cached_end = line;
    }

    pub(crate) fn cached_start(&self) -> Option<i32> {
        self.cached_start
    }

    pub(crate) fn on_offset(&mut self, delta: i32) {
        if let Some(start) = self.cached_start.as_mut() {
            *start += delta;
        }
        if let Some(end) = self.cached_end.as_mut() {
            *end += delta;
        }
    }
}
