use pathviz_core::Point;

/// Chebyshev (L∞) distance: the hop count between two cells when diagonal
/// moves are allowed and nothing is in the way.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Euclidean distance between two cell centres.
///
/// Used both as the A* step cost (1 orthogonally, √2 diagonally) and as
/// its heuristic, which is therefore admissible and consistent.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    f64::from(a.x - b.x).hypot(f64::from(a.y - b.y))
}
