//! Errors raised by grid construction and mutation.

use crate::geom::Point;

/// Errors that can occur when building or editing a [`Grid`](crate::Grid).
///
/// Every variant is recoverable: the grid is left exactly as it was before
/// the rejected call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The grid is locked because a search run is in progress.
    #[error("grid is locked while a search is running")]
    InvalidMutation,
    /// The requested dimensions do not describe a usable grid.
    #[error("degenerate grid: {columns} columns at aspect ratio {aspect}")]
    DegenerateGrid { columns: i32, aspect: f64 },
    /// The target cell lies outside the grid.
    #[error("{0} is outside the grid")]
    OutOfBounds(Point),
    /// A marker was moved onto the other marker's cell.
    #[error("{0} is occupied by the other marker")]
    MarkerCollision(Point),
    /// A grid layout contains a character that is not a known cell glyph.
    #[error("invalid grid glyph \u{201c}{ch}\u{201d} at {pos}")]
    InvalidGlyph { ch: char, pos: Point },
    /// A grid layout has rows of different widths.
    #[error("grid layout rows have inconsistent widths")]
    InconsistentRows,
    /// A grid layout does not have exactly one start and one end.
    #[error("grid layout needs exactly one start and one end marker")]
    MissingMarkers,
}

pub type Result<T> = std::result::Result<T, Error>;
