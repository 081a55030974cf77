use crate::{ItemDirection, LayoutDirection};

/// Per-fill state: where the next item comes from and how far to go.
///
/// Built fresh for every pass by the grid and handed to the fill engine by reference.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LayoutCursor {
    /// Extra distance to cover past the start or end line.
    pub(crate) available: i32,
    pub(crate) current_position: isize,
    pub(crate) item_direction: ItemDirection,
    pub(crate) layout_direction: LayoutDirection,
    pub(crate) start_line: i32,
    pub(crate) end_line: i32,
    pub(crate) stop_in_focusable: bool,
    /// Unbounded primary axis; fills until the provider runs out.
    pub(crate) infinite: bool,
    pub(crate) recycle: bool,
}

impl LayoutCursor {
    pub(crate) fn new(position: usize, start_line: i32, end_line: i32, infinite: bool) -> Self {
        Self {
            available: 0,
            current_position: position as isize,
            item_direction: ItemDirection::Tail,
            layout_direction: LayoutDirection::End,
            start_line,
            end_line,
            stop_in_focusable: false,
            infinite,
            recycle: true,
        }
    }

    pub(crate) fn set_direction(&mut self, direction: LayoutDirection, should_reverse: bool) {
        self.layout_direction = direction;
        self.item_direction = if should_reverse == (direction == LayoutDirection::Start) {
            ItemDirection::Tail
        } else {
            ItemDirection::Head
        };
    }

    pub(crate) fn has_more(&self, item_count: usize) -> bool {
        self.current_position >= 0 && (self.current_position as usize) < item_count
    }

    pub(crate) fn advance(&mut self) {
        self.current_position += self.item_direction.step();
    }
}
