// Example: three columns of cards with varying heights and a full-width header.
use staggered_grid::{
    ItemDirection, ItemProvider, ItemSize, LayoutOptions, MeasureConstraints, Orientation,
    StaggeredGrid, Viewport,
};

struct Cards {
    heights: Vec<i32>,
}

impl ItemProvider for Cards {
    type Item = (usize, i32);

    fn item_count(&self) -> usize {
        self.heights.len()
    }

    fn next_item(&mut self, position: usize, _direction: ItemDirection) -> Option<(usize, i32)> {
        self.heights.get(position).map(|&h| (position, h))
    }

    fn is_full_span(&self, item: &(usize, i32)) -> bool {
        item.0 == 0
    }

    fn measure(&mut self, item: &mut (usize, i32), constraints: MeasureConstraints) -> ItemSize {
        ItemSize {
            main: item.1,
            cross: constraints.cross.size,
        }
    }

    fn recycle(&mut self, _item: (usize, i32)) {}
}

fn main() {
    let heights = (0..200).map(|i| 60 + (i * 37 % 90) as i32).collect();
    let mut cards = Cards { heights };

    let mut grid = StaggeredGrid::new(LayoutOptions::new(3, Orientation::Vertical))
        .expect("span count is positive");
    grid.set_viewport(Viewport::new(360, 640));
    grid.layout(&mut cards);

    println!("attached={}", grid.child_count());
    for child in grid.children().take(6) {
        println!(
            "item {} span={} full_span={} bounds={:?}",
            child.position, child.span, child.full_span, child.bounds
        );
    }

    let scrolled = grid.scroll_by(1_500, &mut cards);
    println!("scrolled={scrolled}");
    println!("first_visible={:?}", grid.find_first_visible_item_positions());
    println!("last_visible={:?}", grid.find_last_visible_item_positions());
    println!(
        "scrollbar offset={} extent={} range={}",
        grid.compute_scroll_offset(200),
        grid.compute_scroll_extent(200),
        grid.compute_scroll_range(200)
    );
}
