// Example: save the scroll position and span assignments, then restore them into a new grid.
use staggered_grid::{
    ItemDirection, ItemProvider, ItemSize, LayoutOptions, MeasureConstraints, Orientation,
    StaggeredGrid, Viewport,
};

struct Tiles;

impl ItemProvider for Tiles {
    type Item = usize;

    fn item_count(&self) -> usize {
        500
    }

    fn next_item(&mut self, position: usize, _direction: ItemDirection) -> Option<usize> {
        Some(position)
    }

    fn is_full_span(&self, _item: &usize) -> bool {
        false
    }

    fn measure(&mut self, item: &mut usize, constraints: MeasureConstraints) -> ItemSize {
        ItemSize {
            main: 80 + (*item % 5) as i32 * 20,
            cross: constraints.cross.size,
        }
    }

    fn recycle(&mut self, _item: usize) {}
}

fn grid() -> StaggeredGrid<usize> {
    let mut grid = StaggeredGrid::new(LayoutOptions::new(2, Orientation::Vertical))
        .expect("span count is positive");
    grid.set_viewport(Viewport::new(400, 800));
    grid
}

fn main() {
    let mut first = grid();
    first.layout(&mut Tiles);
    first.scroll_by(5_000, &mut Tiles);
    let state = first.save_state();
    println!(
        "saved anchor={:?} offsets={:?} assignments={}",
        state.anchor_position,
        state.span_offsets,
        state.span_lookup.len()
    );

    let mut second = grid();
    second.restore_state(state);
    second.layout(&mut Tiles);
    println!("before={:?}", first.find_first_visible_item_positions());
    println!("after={:?}", second.find_first_visible_item_positions());
}
