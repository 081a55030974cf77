use crate::GridError;

/// The scroll (primary) axis of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Which way a fill walks along the primary axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutDirection {
    Start,
    End,
}

impl LayoutDirection {
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Which way adapter positions advance while filling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemDirection {
    Head,
    Tail,
}

impl ItemDirection {
    pub(crate) fn step(self) -> isize {
        match self {
            Self::Head => -1,
            Self::Tail => 1,
        }
    }
}

/// How the grid reacts to uneven span ends left behind by data changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapStrategy {
    None,
    #[default]
    MoveItemsBetweenSpans,
}

impl TryFrom<i32> for GapStrategy {
    type Error = GridError;

    /// Accepts the raw values `0` (none) and `2` (move items between spans).
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            2 => Ok(Self::MoveItemsBetweenSpans),
            other => Err(GridError::InvalidGapStrategy(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeasureMode {
    #[default]
    Exactly,
    AtMost,
    Unspecified,
}

/// Where an item enters the container's child order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttachPoint {
    Head,
    Tail,
}

/// Focus movement requested by the host when its own search came up empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusDirection {
    Backward,
    Forward,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub size: i32,
    pub mode: MeasureMode,
}

/// Constraints handed to [`crate::ItemProvider::measure`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureConstraints {
    pub main: Constraint,
    pub cross: Constraint,
}

/// Decorated extent of a measured item (margins and insets included).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSize {
    pub main: i32,
    pub cross: i32,
}

/// Absolute decorated bounds of an attached item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub(crate) fn from_axes(
        orientation: Orientation,
        main_start: i32,
        main_end: i32,
        cross_start: i32,
        cross_end: i32,
    ) -> Self {
        match orientation {
            Orientation::Vertical => Self {
                left: cross_start,
                top: main_start,
                right: cross_end,
                bottom: main_end,
            },
            Orientation::Horizontal => Self {
                left: main_start,
                top: cross_start,
                right: main_end,
                bottom: cross_end,
            },
        }
    }

    pub fn main_start(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.top,
            Orientation::Horizontal => self.left,
        }
    }

    pub fn main_end(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.bottom,
            Orientation::Horizontal => self.right,
        }
    }

    pub fn main_size(&self, orientation: Orientation) -> i32 {
        self.main_end(orientation) - self.main_start(orientation)
    }

    pub fn cross_start(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.left,
            Orientation::Horizontal => self.top,
        }
    }

    pub fn cross_size(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Vertical => self.right - self.left,
            Orientation::Horizontal => self.bottom - self.top,
        }
    }

    pub(crate) fn offset_main(&mut self, orientation: Orientation, delta: i32) {
        match orientation {
            Orientation::Vertical => {
                self.top += delta;
                self.bottom += delta;
            }
            Orientation::Horizontal => {
                self.left += delta;
                self.right += delta;
            }
        }
    }

    pub(crate) fn offset_cross(&mut self, orientation: Orientation, delta: i32) {
        self.offset_main(
            match orientation {
                Orientation::Vertical => Orientation::Horizontal,
                Orientation::Horizontal => Orientation::Vertical,
            },
            delta,
        );
    }
}

/// Unit direction toward a target position, in container coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollVector {
    pub x: i32,
    pub y: i32,
}

/// A read-only view of one attached item.
#[derive(Debug)]
pub struct ChildRef<'a, I> {
    pub item: &'a I,
    pub position: usize,
    pub span: usize,
    pub full_span: bool,
    pub bounds: Bounds,
}

impl<I> Clone for ChildRef<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for ChildRef<'_, I> {}
