/// Errors reported by configuration and query entry points.
///
/// A call that returns an error leaves the grid unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("span count must be at least 1, got {0}")]
    InvalidSpanCount(usize),
    #[error("invalid gap strategy {0}, expected 0 (none) or 2 (move items between spans)")]
    InvalidGapStrategy(i32),
    #[error("output buffer holds {actual} entries but the grid has {expected} spans")]
    BufferTooSmall { expected: usize, actual: usize },
}
