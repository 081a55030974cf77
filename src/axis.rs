use crate::{MeasureMode, Orientation};

/// Container geometry along one axis.
///
/// Implemented by [`Axis`]; the grid only ever talks to its primary and secondary axes through
/// this trait, so hosts with their own geometry types can implement it for tests or adapters.
pub trait OrientationOracle {
    /// First usable coordinate (after the leading padding).
    fn start_after_padding(&self) -> i32;
    /// Last usable coordinate (before the trailing padding).
    fn end_after_padding(&self) -> i32;
    /// Full container extent, paddings included.
    fn end(&self) -> i32;
    fn mode(&self) -> MeasureMode;

    fn total_space(&self) -> i32 {
        self.end_after_padding() - self.start_after_padding()
    }

    fn is_reversed(&self) -> bool {
        false
    }
}

/// Size, paddings and measure mode of the container along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axis {
    pub size: i32,
    pub padding_start: i32,
    pub padding_end: i32,
    pub mode: MeasureMode,
}

impl Axis {
    pub fn new(size: i32) -> Self {
        Self {
            size,
            padding_start: 0,
            padding_end: 0,
            mode: MeasureMode::Exactly,
        }
    }

    pub fn with_padding(mut self, padding_start: i32, padding_end: i32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    pub fn with_mode(mut self, mode: MeasureMode) -> Self {
        self.mode = mode;
        self
    }
}

impl OrientationOracle for Axis {
    fn start_after_padding(&self) -> i32 {
        self.padding_start
    }

    fn end_after_padding(&self) -> i32 {
        self.size - self.padding_end
    }

    fn end(&self) -> i32 {
        self.size
    }

    fn mode(&self) -> MeasureMode {
        self.mode
    }
}

/// An [`Axis`] tagged with the grid's resolved reverse flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrientedAxis {
    pub axis: Axis,
    pub reversed: bool,
}

impl OrientationOracle for OrientedAxis {
    fn start_after_padding(&self) -> i32 {
        self.axis.start_after_padding()
    }

    fn end_after_padding(&self) -> i32 {
        self.axis.end_after_padding()
    }

    fn end(&self) -> i32 {
        self.axis.end()
    }

    fn mode(&self) -> MeasureMode {
        self.axis.mode
    }

    fn is_reversed(&self) -> bool {
        self.reversed
    }
}

/// Both container axes. Orientation decides which one scrolls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: Axis,
    pub height: Axis,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: Axis::new(width),
            height: Axis::new(height),
        }
    }

    pub fn primary(&self, orientation: Orientation) -> Axis {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }

    pub fn secondary(&self, orientation: Orientation) -> Axis {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }
}
