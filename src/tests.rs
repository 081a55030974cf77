use crate::*;

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_i32(&mut self, start: i32, end_exclusive: i32) -> i32 {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as i32
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TestItem {
    label: usize,
    size: i32,
    full_span: bool,
}

/// Items with fixed main-axis sizes. Labels identify item instances across data changes.
#[derive(Debug, Default)]
struct TestProvider {
    sizes: Vec<i32>,
    full_span: Vec<bool>,
    labels: Vec<usize>,
    next_label: usize,
    cross: Option<i32>,
    focusable: bool,
    created: usize,
    attached: usize,
    recycled: Vec<usize>,
}

impl TestProvider {
    fn with_sizes(sizes: &[i32]) -> Self {
        Self {
            sizes: sizes.to_vec(),
            full_span: vec![false; sizes.len()],
            labels: (0..sizes.len()).collect(),
            next_label: sizes.len(),
            ..Self::default()
        }
    }

    fn uniform(count: usize, size: i32) -> Self {
        Self::with_sizes(&vec![size; count])
    }

    fn insert(&mut self, position: usize, size: i32, full_span: bool) {
        self.sizes.insert(position, size);
        self.full_span.insert(position, full_span);
        self.labels.insert(position, self.next_label);
        self.next_label += 1;
    }

    fn remove(&mut self, position: usize, count: usize) {
        self.sizes.drain(position..position + count);
        self.full_span.drain(position..position + count);
        self.labels.drain(position..position + count);
    }
}

impl ItemProvider for TestProvider {
    type Item = TestItem;

    fn item_count(&self) -> usize {
        self.sizes.len()
    }

    fn next_item(&mut self, position: usize, _direction: ItemDirection) -> Option<TestItem> {
        self.created += 1;
        Some(TestItem {
            label: self.labels[position],
            size: self.sizes[position],
            full_span: self.full_span[position],
        })
    }

    fn is_full_span(&self, item: &TestItem) -> bool {
        item.full_span
    }

    fn measure(&mut self, item: &mut TestItem, constraints: MeasureConstraints) -> ItemSize {
        ItemSize {
            main: item.size,
            cross: self.cross.unwrap_or(constraints.cross.size),
        }
    }

    fn attach(&mut self, _item: &TestItem, _at: AttachPoint) {
        self.attached += 1;
    }

    fn recycle(&mut self, item: TestItem) {
        self.recycled.push(item.label);
    }

    fn has_focusable(&self, _item: &TestItem) -> bool {
        self.focusable
    }
}

fn vertical_grid(span_count: usize, width: i32, height: i32) -> StaggeredGrid<TestItem> {
    let mut grid =
        StaggeredGrid::new(LayoutOptions::new(span_count, Orientation::Vertical)).unwrap();
    grid.set_viewport(Viewport::new(width, height));
    grid
}

fn positions(grid: &StaggeredGrid<TestItem>) -> Vec<usize> {
    grid.children().map(|child| child.position).collect()
}

fn placements(grid: &StaggeredGrid<TestItem>) -> Vec<(usize, usize, Bounds)> {
    grid.children()
        .map(|child| (child.position, child.span, child.bounds))
        .collect()
}

fn assert_spans_consistent(grid: &StaggeredGrid<TestItem>) {
    let orientation = grid.orientation();
    for span in 0..grid.span_count() {
        let mut previous: Option<ChildRef<'_, TestItem>> = None;
        for child in grid.children().filter(|c| c.full_span || c.span == span) {
            if let Some(prev) = &previous {
                assert!(child.position > prev.position, "span {span} out of order");
                assert!(
                    child.bounds.main_start(orientation) >= prev.bounds.main_end(orientation),
                    "span {span}: {} overlaps {}",
                    child.position,
                    prev.position
                );
            }
            previous = Some(child);
        }
    }
}

#[test]
fn equal_items_fill_spans_round_robin() {
    let mut provider = TestProvider::uniform(6, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    assert_eq!(grid.child_count(), 6);
    for span in 0..3 {
        assert_eq!(grid.children().filter(|c| c.span == span).count(), 2);
    }
    assert_eq!(
        grid.find_first_visible_item_positions(),
        vec![Some(0), Some(1), Some(2)]
    );
    assert_eq!(
        grid.find_last_completely_visible_item_positions(),
        vec![Some(3), Some(4), Some(5)]
    );

    let child = grid.child_at_position(4).unwrap();
    assert_eq!(child.span, 1);
    assert_eq!(
        child.bounds,
        Bounds {
            left: 100,
            top: 100,
            right: 200,
            bottom: 200
        }
    );
    assert!(!grid.is_layout_requested());
}

#[test]
fn next_item_goes_to_the_shortest_span() {
    let mut provider = TestProvider::with_sizes(&[100, 200, 100, 100, 100, 100]);
    let mut grid = vertical_grid(2, 200, 300);
    grid.layout(&mut provider);

    // 0 -> span 0, 1 -> span 1 (taller), 2 -> span 0 (shorter), 3 ties at 200 -> span 0.
    assert_eq!(grid.span_for_position(2), Some(0));
    assert_eq!(grid.span_for_position(3), Some(0));
    assert_eq!(grid.span_for_position(4), Some(1));
    assert_eq!(positions(&grid), vec![0, 1, 2, 3, 4]);
    assert_eq!(grid.span_end_line_of(0), Some(300));
    assert_eq!(grid.span_end_line_of(1), Some(300));
}

#[test]
fn horizontal_grid_stacks_spans_vertically() {
    let mut provider = TestProvider::uniform(4, 100);
    let mut grid =
        StaggeredGrid::new(LayoutOptions::new(2, Orientation::Horizontal)).unwrap();
    grid.set_viewport(Viewport::new(200, 200));
    grid.layout(&mut provider);

    let bounds: Vec<_> = grid.children().map(|c| c.bounds).collect();
    assert_eq!(
        bounds,
        vec![
            Bounds { left: 0, top: 0, right: 100, bottom: 100 },
            Bounds { left: 0, top: 100, right: 100, bottom: 200 },
            Bounds { left: 100, top: 0, right: 200, bottom: 100 },
            Bounds { left: 100, top: 100, right: 200, bottom: 200 },
        ]
    );
}

#[test]
fn rtl_vertical_grid_prefers_the_rightmost_span() {
    let mut provider = TestProvider::uniform(3, 100);
    let mut grid = StaggeredGrid::new(
        LayoutOptions::new(3, Orientation::Vertical).with_layout_rtl(true),
    )
    .unwrap();
    grid.set_viewport(Viewport::new(300, 300));
    grid.layout(&mut provider);

    let first = grid.child_at_position(0).unwrap();
    assert_eq!(first.span, 2);
    assert_eq!(first.bounds.left, 200);
    assert_eq!(grid.child_at_position(2).unwrap().span, 0);
    assert_eq!(grid.child_at_position(2).unwrap().bounds.left, 0);
}

#[test]
fn reverse_layout_anchors_at_the_end() {
    let mut provider = TestProvider::uniform(4, 100);
    let mut grid = StaggeredGrid::new(
        LayoutOptions::new(2, Orientation::Vertical).with_reverse_layout(true),
    )
    .unwrap();
    grid.set_viewport(Viewport::new(200, 300));
    grid.layout(&mut provider);

    assert!(grid.should_reverse_layout());
    let first = grid.child_at_position(0).unwrap();
    assert_eq!((first.span, first.bounds.top, first.bounds.bottom), (0, 200, 300));
    // Content shorter than the viewport stays against the end edge.
    assert_eq!(grid.child_at_position(3).unwrap().bounds.top, 100);
    assert_eq!(grid.find_first_visible_item_positions(), vec![Some(0), Some(1)]);
    assert_eq!(grid.find_last_visible_item_positions(), vec![Some(2), Some(3)]);
}

#[test]
fn scroll_by_attaches_and_recycles() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);
    assert_eq!(positions(&grid), (0..9).collect::<Vec<_>>());

    assert_eq!(grid.scroll_by(150, &mut provider), 150);
    assert_eq!(provider.recycled, vec![0, 1, 2]);
    assert_eq!(positions(&grid), (3..15).collect::<Vec<_>>());
    assert_eq!(grid.child_at_position(3).unwrap().bounds.top, -50);
    assert_eq!(
        grid.find_first_visible_item_positions(),
        vec![Some(3), Some(4), Some(5)]
    );
    assert_eq!(
        grid.find_first_completely_visible_item_positions(),
        vec![Some(6), Some(7), Some(8)]
    );
    assert_spans_consistent(&grid);
}

#[test]
fn scroll_stops_at_content_edges() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    // Ten rows of 100 in a 300 viewport leave 700 to scroll.
    assert_eq!(grid.scroll_by(10_000, &mut provider), 700);
    assert_eq!(positions(&grid), (21..30).collect::<Vec<_>>());
    assert_eq!(grid.scroll_by(10, &mut provider), 0);

    assert_eq!(grid.scroll_by(-10_000, &mut provider), -700);
    assert_eq!(
        grid.find_first_visible_item_positions(),
        vec![Some(0), Some(1), Some(2)]
    );
    assert_eq!(grid.child_at_position(4).unwrap().span, 1);
    assert_spans_consistent(&grid);
}

#[test]
fn span_assignments_survive_random_scrolling() {
    let mut rng = Lcg::new(0x5eed);
    let sizes: Vec<i32> = (0..200).map(|_| rng.gen_range_i32(40, 160)).collect();
    let mut provider = TestProvider::with_sizes(&sizes);
    let mut grid = vertical_grid(3, 300, 400);
    grid.layout(&mut provider);

    let mut seen: BTreeMap<usize, usize> = BTreeMap::new();
    for step in 0..60 {
        let delta = rng.gen_range_i32(-400, 400);
        grid.scroll_by(delta, &mut provider);
        for child in grid.children() {
            let span = *seen.entry(child.position).or_insert(child.span);
            assert_eq!(span, child.span, "position {} moved at step {step}", child.position);
        }
        assert_spans_consistent(&grid);
    }
}

#[test]
fn full_span_laid_out_toward_head_records_gap() {
    let mut sizes = vec![100, 200];
    sizes.extend([100; 18]);
    let mut provider = TestProvider::with_sizes(&sizes);
    let mut grid = vertical_grid(2, 200, 300);
    grid.layout(&mut provider);
    assert_eq!(positions(&grid), vec![0, 1, 2, 3, 4]);

    assert_eq!(grid.scroll_by(100, &mut provider), 100);
    assert_eq!(grid.span_start_line_of(0), Some(0));
    assert_eq!(grid.span_start_line_of(1), Some(-100));

    // A full-span item lands above the window while the span tops differ by 100.
    provider.insert(1, 50, true);
    grid.on_items_added(1, 1);
    assert!(grid.is_layout_requested());
    grid.layout(&mut provider);
    assert_eq!(positions(&grid), vec![2, 3, 4, 5, 6, 7]);
    assert!(!grid.has_invalid_full_span());

    assert_eq!(grid.scroll_by(-100, &mut provider), -100);
    let marker = grid.full_span_item(1).unwrap();
    assert_eq!(marker.gap_dir, LayoutDirection::End);
    assert_eq!(marker.gap_per_span, vec![100, 0]);
    assert_eq!(marker.gap_per_span.iter().sum::<i32>(), 100);
    assert!(grid.has_invalid_full_span());
    assert_eq!(grid.child_at_position(1).unwrap().bounds.top, -50);

    // Scrolling settles: the idle check drops the assignments after the marker.
    grid.set_scroll_idle(1_000);
    assert!(grid.is_gap_check_pending());
    assert!(grid.tick(1_000));
    assert!(grid.is_layout_requested());
    assert!(grid.simple_animations_requested());
    assert_eq!(grid.span_for_position(2), None);
    assert!(grid.full_span_item(1).is_none());
    // Until that layout runs, further checks are no-ops.
    assert!(!grid.check_for_gaps());

    grid.layout(&mut provider);
    assert!(!grid.simple_animations_requested());
    assert!(!grid.has_invalid_full_span());
    assert_eq!(grid.full_span_item(1).unwrap().gap_per_span, vec![0, 0]);
    assert_eq!(grid.span_start_line_of(0), grid.span_start_line_of(1));
    assert_spans_consistent(&grid);
}

#[test]
fn removing_items_recycles_them_and_reassigns() {
    let mut provider = TestProvider::uniform(10, 100);
    let mut grid = vertical_grid(2, 200, 300);
    grid.layout(&mut provider);
    assert_eq!(positions(&grid), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(grid.span_for_position(3), Some(1));

    provider.remove(0, 2);
    grid.on_items_removed(0, 2);
    assert!(grid.is_layout_requested());
    assert_eq!(grid.span_for_position(0), None);

    grid.layout(&mut provider);
    assert!(provider.recycled.contains(&0));
    assert!(provider.recycled.contains(&1));
    assert_eq!(positions(&grid), vec![0, 1, 2, 3, 4, 5]);
    // Old item 2 is now position 0 and was reused, not recreated.
    assert_eq!(provider.created, 8);
    assert_eq!(grid.find_first_visible_item_positions(), vec![Some(0), Some(1)]);
}

#[test]
fn changes_below_the_window_do_not_request_layout() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    provider.insert(20, 100, false);
    grid.on_items_added(20, 1);
    assert!(!grid.is_layout_requested());

    grid.on_items_updated(1, 1);
    assert!(grid.is_layout_requested());
    let created = provider.created;
    grid.layout(&mut provider);
    assert!(provider.recycled.contains(&1));
    assert_eq!(provider.created, created + 1);

    grid.on_items_moved(0, 4);
    assert!(grid.is_layout_requested());
}

#[test]
fn restore_places_spans_at_saved_offsets() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 320);
    let mut viewport = grid.viewport();
    viewport.height = Axis::new(320).with_padding(20, 0);
    grid.set_viewport(viewport);

    grid.restore_state(SavedState {
        span_offsets: vec![Some(-30), Some(0), Some(-10)],
        anchor_position: Some(4),
        visible_anchor_position: Some(4),
        ..SavedState::default()
    });
    assert!(grid.is_layout_requested());
    grid.layout(&mut provider);

    assert_eq!(grid.span_start_line_of(0), Some(-10));
    assert_eq!(grid.span_start_line_of(1), Some(20));
    assert_eq!(grid.span_start_line_of(2), Some(10));
    assert_eq!(grid.children().next().unwrap().position, 4);
    assert_spans_consistent(&grid);
}

#[test]
fn save_restore_round_trip_reproduces_layout() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);
    assert_eq!(grid.scroll_by(250, &mut provider), 250);
    assert_eq!(positions(&grid), (6..18).collect::<Vec<_>>());

    let state = grid.save_state();
    assert_eq!(state.anchor_position, Some(6));
    assert_eq!(state.visible_anchor_position, Some(9));
    assert_eq!(state.span_offsets, vec![Some(-50); 3]);

    let mut restored = vertical_grid(3, 300, 300);
    let mut other = TestProvider::uniform(30, 100);
    restored.restore_state(state.clone());
    // Pending state is handed back unchanged.
    assert_eq!(restored.save_state(), state);
    restored.layout(&mut other);

    assert_eq!(placements(&restored), placements(&grid));
    assert_eq!(
        restored.find_first_visible_item_positions(),
        grid.find_first_visible_item_positions()
    );
}

#[test]
fn restore_with_other_span_count_keeps_only_the_anchor() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.scroll_to_position_with_offset(9, 0);
    grid.layout(&mut provider);
    assert_eq!(positions(&grid), (9..18).collect::<Vec<_>>());
    let state = grid.save_state();
    assert_eq!(state.span_offsets.len(), 3);

    let mut narrower = vertical_grid(2, 300, 300);
    let mut other = TestProvider::uniform(30, 100);
    narrower.restore_state(state);
    narrower.layout(&mut other);

    assert_eq!(narrower.children().next().unwrap().position, 9);
    assert_eq!(narrower.span_for_position(9), Some(0));
    assert_eq!(narrower.span_for_position(10), Some(1));
    assert_eq!(narrower.span_for_position(0), None);
    assert!(narrower.children().all(|c| c.span < 2));
}

#[test]
fn changing_span_count_rehomes_children() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    grid.set_span_count(2).unwrap();
    assert!(grid.is_layout_requested());
    assert_eq!(grid.span_for_position(0), None);
    grid.layout(&mut provider);

    assert_eq!(positions(&grid), (0..6).collect::<Vec<_>>());
    assert!(grid.children().all(|c| c.span < 2));
    assert_eq!(grid.child_at_position(1).unwrap().bounds.left, 150);
    assert_spans_consistent(&grid);
}

#[test]
fn invalid_configuration_is_rejected() {
    assert_eq!(
        StaggeredGrid::<TestItem>::new(LayoutOptions::new(0, Orientation::Vertical)).err(),
        Some(GridError::InvalidSpanCount(0))
    );
    let mut grid = vertical_grid(3, 300, 300);
    assert_eq!(grid.set_span_count(0), Err(GridError::InvalidSpanCount(0)));
    assert_eq!(grid.span_count(), 3);

    assert_eq!(GapStrategy::try_from(1), Err(GridError::InvalidGapStrategy(1)));
    assert_eq!(GapStrategy::try_from(2), Ok(GapStrategy::MoveItemsBetweenSpans));

    let mut buffer = [None; 2];
    assert_eq!(
        grid.find_first_visible_item_positions_into(&mut buffer),
        Err(GridError::BufferTooSmall {
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn out_of_range_scroll_target_is_ignored() {
    let mut provider = TestProvider::uniform(6, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.scroll_to_position(50);
    grid.layout(&mut provider);
    assert_eq!(positions(&grid), (0..6).collect::<Vec<_>>());
}

#[test]
fn scroll_to_position_below_aligns_item_with_the_end() {
    let mut provider = TestProvider::uniform(60, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    assert_eq!(grid.scroll_vector_for_position(30), ScrollVector { x: 0, y: 1 });
    grid.scroll_to_position(30);
    grid.layout(&mut provider);

    // Filled backwards from the end edge, so 30 takes the last span of the bottom row.
    assert_eq!(grid.span_for_position(30), Some(2));
    assert_eq!(
        grid.find_last_visible_item_positions(),
        vec![Some(28), Some(29), Some(30)]
    );
    assert_eq!(
        grid.find_first_visible_item_positions(),
        vec![Some(22), Some(23), Some(24)]
    );
    assert_eq!(grid.scroll_vector_for_position(0), ScrollVector { x: 0, y: -1 });
    assert_spans_consistent(&grid);
}

#[test]
fn wrap_content_shrinks_spans_to_item_width() {
    let mut provider = TestProvider::uniform(6, 100);
    provider.cross = Some(60);
    let mut grid = vertical_grid(3, 300, 300);
    let mut viewport = grid.viewport();
    viewport.width = Axis::new(300).with_mode(MeasureMode::AtMost);
    grid.set_viewport(viewport);
    grid.layout(&mut provider);

    let last = grid.child_at_position(2).unwrap();
    assert_eq!(last.span, 2);
    assert_eq!((last.bounds.left, last.bounds.right), (120, 180));
}

#[test]
fn scrollbar_values_follow_attached_items() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    assert_eq!(grid.compute_scroll_range(30), 0);
    grid.layout(&mut provider);

    assert_eq!(grid.compute_scroll_offset(30), 0);
    assert_eq!(grid.compute_scroll_extent(30), 300);
    assert_eq!(grid.compute_scroll_range(30), 1000);

    let mut counting = StaggeredGrid::new(
        LayoutOptions::new(3, Orientation::Vertical).with_smooth_scrollbar(false),
    )
    .unwrap();
    counting.set_viewport(Viewport::new(300, 300));
    counting.layout(&mut provider);
    assert_eq!(counting.compute_scroll_offset(30), 0);
    assert_eq!(counting.compute_scroll_extent(30), 9);
    assert_eq!(counting.compute_scroll_range(30), 30);
}

#[test]
fn prefetch_reports_next_items_nearest_first() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    let mut out = Vec::new();
    grid.collect_prefetch_positions(50, 30, &mut |position: usize, distance: i32| {
        out.push((position, distance))
    });
    assert_eq!(out, vec![(9, 0), (10, 0), (11, 0)]);

    out.clear();
    grid.collect_prefetch_positions(-50, 30, &mut |position: usize, distance: i32| {
        out.push((position, distance))
    });
    assert!(out.is_empty());
}

#[test]
fn focus_search_lays_out_the_next_focusable_item() {
    let mut provider = TestProvider::uniform(20, 100);
    provider.focusable = true;
    let mut grid = vertical_grid(2, 200, 300);
    grid.layout(&mut provider);
    assert_eq!(grid.child_at_position(5).unwrap().span, 1);

    assert_eq!(
        grid.focus_search_failed(5, FocusDirection::Down, &mut provider),
        Some(7)
    );
    assert_eq!(grid.child_count(), 8);
    assert_eq!(
        grid.focus_search_failed(5, FocusDirection::Left, &mut provider),
        None
    );
    assert_eq!(
        grid.focus_search_failed(99, FocusDirection::Down, &mut provider),
        None
    );
}

#[test]
fn idle_check_waits_for_scrolling_to_settle() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    grid.notify_scroll_event(0);
    assert!(grid.is_scrolling());
    assert!(!grid.tick(149));
    assert!(grid.is_scrolling());
    assert!(!grid.tick(150));
    assert!(!grid.is_scrolling());
    assert!(!grid.is_gap_check_pending());

    grid.set_scroll_idle(200);
    assert!(grid.is_gap_check_pending());
    grid.set_layout_rtl(true);
    // A layout request cancels the pending check.
    assert!(!grid.is_gap_check_pending());
}

#[test]
fn gap_strategy_none_skips_repair() {
    let mut grid = vertical_grid(2, 200, 300);
    grid.set_gap_strategy(GapStrategy::None);
    let mut provider = TestProvider::uniform(10, 100);
    grid.layout(&mut provider);
    assert!(!grid.check_for_gaps());
}

#[test]
fn gap_fix_relayout_runs_at_most_once_per_layout() {
    // Two zero-height items share the top of span 0, which the gap check flags on every pass.
    let mut sizes = vec![0, 0];
    sizes.extend([100; 18]);

    let mut single = TestProvider::with_sizes(&sizes);
    let mut unchecked = vertical_grid(2, 200, 300);
    unchecked.set_gap_strategy(GapStrategy::None);
    unchecked.layout(&mut single);
    let per_pass = single.attached;
    assert!(per_pass > 0);

    let mut provider = TestProvider::with_sizes(&sizes);
    let mut grid = vertical_grid(2, 200, 300);
    grid.layout(&mut provider);
    // The checked pass plus exactly one repair pass.
    assert_eq!(provider.attached, 2 * per_pass);
    assert!(grid.simple_animations_requested());
    assert!(!grid.is_layout_requested());
    assert_eq!(placements(&grid), placements(&unchecked));
    let first = grid.child_at_position(0).unwrap();
    let second = grid.child_at_position(1).unwrap();
    assert_eq!((first.span, second.span), (0, 0));
    assert_eq!(first.bounds.top, second.bounds.top);

    // What the repair pass left behind is picked up by the idle check.
    grid.set_scroll_idle(1_000);
    assert!(grid.tick(1_000));
    assert!(grid.is_layout_requested());
    grid.layout(&mut provider);
    assert_eq!(provider.attached, 4 * per_pass);
}

#[test]
fn rtl_boundary_gap_reassigns_spans_from_the_right() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = StaggeredGrid::new(
        LayoutOptions::new(3, Orientation::Vertical)
            .with_layout_rtl(true)
            .with_gap_strategy(GapStrategy::None),
    )
    .unwrap();
    grid.set_viewport(Viewport::new(300, 300));
    grid.restore_state(SavedState {
        last_layout_rtl: true,
        span_offsets: vec![Some(0), Some(56), Some(67)],
        anchor_position: Some(0),
        visible_anchor_position: Some(0),
        ..SavedState::default()
    });
    grid.layout(&mut provider);

    assert_eq!(grid.span_start_line_of(0), Some(0));
    assert_eq!(grid.span_start_line_of(1), Some(56));
    assert_eq!(grid.span_start_line_of(2), Some(67));
    assert_eq!(grid.span_for_position(0), Some(0));

    // Item 0 is attached and two spans start below the top edge.
    grid.set_gap_strategy(GapStrategy::MoveItemsBetweenSpans);
    assert!(grid.check_for_gaps());
    assert!(grid.is_layout_requested());
    assert!(grid.simple_animations_requested());
    assert_eq!(grid.span_for_position(0), None);

    grid.layout(&mut provider);
    assert_eq!(
        (0..3).map(|span| grid.span_start_line_of(span)).collect::<Vec<_>>(),
        vec![Some(0); 3]
    );
    let first = grid.child_at_position(0).unwrap();
    assert_eq!(first.span, 2);
    assert_eq!(first.bounds.left, 200);
    assert_eq!(grid.child_at_position(1).unwrap().span, 1);
    // Equal tops stepping toward lower spans are the expected order right to left.
    assert!(!grid.check_for_gaps());
}

#[test]
fn primary_axis_carries_the_resolved_reverse_flag() {
    let mut provider = TestProvider::uniform(4, 100);
    let mut grid = StaggeredGrid::new(
        LayoutOptions::new(2, Orientation::Vertical).with_reverse_layout(true),
    )
    .unwrap();
    grid.set_viewport(Viewport::new(200, 300));
    grid.layout(&mut provider);
    assert!(grid.primary().is_reversed());
    assert!(!Axis::new(300).is_reversed());

    grid.set_reverse_layout(false);
    grid.layout(&mut provider);
    assert!(!grid.primary().is_reversed());
}

#[test]
fn empty_data_set_recycles_everything_on_pending_scroll() {
    let mut provider = TestProvider::uniform(6, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    provider.remove(0, 6);
    grid.on_items_removed(0, 6);
    grid.scroll_to_position(0);
    grid.layout(&mut provider);
    assert_eq!(grid.child_count(), 0);
    assert_eq!(provider.recycled.len(), 6);
}

#[test]
fn orientation_change_lays_spans_out_as_rows() {
    let mut provider = TestProvider::uniform(30, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    grid.set_orientation(Orientation::Horizontal);
    assert!(grid.is_layout_requested());
    grid.layout(&mut provider);

    assert_eq!(
        grid.child_at_position(1).unwrap().bounds,
        Bounds {
            left: 0,
            top: 100,
            right: 100,
            bottom: 200
        }
    );
    assert_eq!(grid.child_count(), 9);
}

#[test]
fn switching_to_reverse_layout_reanchors_at_the_end() {
    let mut provider = TestProvider::uniform(4, 100);
    let mut grid = vertical_grid(2, 200, 300);
    grid.layout(&mut provider);
    assert_eq!(grid.child_at_position(0).unwrap().bounds.top, 0);

    grid.set_reverse_layout(true);
    assert!(grid.is_layout_requested());
    grid.layout(&mut provider);
    assert_eq!(grid.child_at_position(0).unwrap().bounds.top, 200);
    assert_eq!(grid.child_at_position(3).unwrap().bounds.top, 100);
}

#[test]
fn whole_data_set_change_rebinds_every_item() {
    let mut provider = TestProvider::uniform(6, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);
    assert_eq!(provider.created, 6);

    grid.on_items_changed();
    assert!(grid.is_layout_requested());
    assert_eq!(grid.span_for_position(0), None);
    grid.layout(&mut provider);

    assert_eq!(provider.recycled.len(), 6);
    assert_eq!(provider.created, 12);
    assert_eq!(positions(&grid), (0..6).collect::<Vec<_>>());
}

#[test]
fn invalidated_assignments_are_rebuilt_by_layout() {
    let mut provider = TestProvider::uniform(6, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    grid.invalidate_span_assignments();
    assert_eq!(grid.span_for_position(4), None);
    grid.layout(&mut provider);
    assert_eq!(grid.span_for_position(4), Some(1));
}

#[test]
fn buffer_queries_fill_one_slot_per_span() {
    let mut provider = TestProvider::uniform(6, 100);
    let mut grid = vertical_grid(3, 300, 300);
    grid.layout(&mut provider);

    let mut buffer = [Some(99); 4];
    grid.find_last_visible_item_positions_into(&mut buffer).unwrap();
    assert_eq!(buffer, [Some(3), Some(4), Some(5), Some(99)]);
    grid.find_first_completely_visible_item_positions_into(&mut buffer)
        .unwrap();
    assert_eq!(&buffer[..3], &[Some(0), Some(1), Some(2)]);
    grid.find_last_completely_visible_item_positions_into(&mut buffer)
        .unwrap();
    assert_eq!(&buffer[..3], &[Some(3), Some(4), Some(5)]);
}

#[test]
fn measure_then_layout_matches_a_single_layout() {
    let mut provider = TestProvider::uniform(6, 100);
    let mut grid = vertical_grid(3, 300, 300);
    assert_eq!(grid.scroll_vector_for_position(3), ScrollVector { x: 0, y: -1 });

    grid.measure(&mut provider);
    assert_eq!(grid.child_count(), 6);
    grid.layout(&mut provider);

    let mut reference_provider = TestProvider::uniform(6, 100);
    let mut reference = vertical_grid(3, 300, 300);
    reference.layout(&mut reference_provider);
    assert_eq!(placements(&grid), placements(&reference));
    // Scrap from the measure pass was reused.
    assert_eq!(provider.created, 6);
}
