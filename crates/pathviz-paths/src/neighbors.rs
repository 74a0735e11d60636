use pathviz_core::{Grid, Point};

/// Compass steps in resolution order: E, W, S, N, SE, NE, SW, NW.
pub const DIRECTIONS: [Point; 8] = [
    Point::new(1, 0),
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(0, -1),
    Point::new(1, 1),
    Point::new(1, -1),
    Point::new(-1, 1),
    Point::new(-1, -1),
];

/// Whether moving from `from` by the single step `d` is allowed.
///
/// The target must be inside the grid and not a wall. A diagonal step is
/// also refused when either orthogonal cell of the corner it cuts is a
/// wall.
#[inline]
fn step_allowed(grid: &Grid, from: Point, d: Point) -> bool {
    let to = from + d;
    if !grid.contains(to) || grid.is_wall(to) {
        return false;
    }
    if d.x != 0 && d.y != 0 {
        return !grid.is_wall(from.shift(d.x, 0)) && !grid.is_wall(from.shift(0, d.y));
    }
    true
}

/// Append the traversable neighbors of `p` into `buf`, in [`DIRECTIONS`]
/// order. The caller clears `buf` before calling.
pub fn neighbors_into(grid: &Grid, p: Point, buf: &mut Vec<Point>) {
    buf.extend(
        DIRECTIONS
            .iter()
            .filter(|&&d| step_allowed(grid, p, d))
            .map(|&d| p + d),
    );
}

/// Whether `to` is one legal step away from `from`.
///
/// The relation is symmetric: a diagonal between two cells cuts the same
/// corner in both directions.
pub fn is_step(grid: &Grid, from: Point, to: Point) -> bool {
    let d = to - from;
    d != Point::ZERO && d.x.abs() <= 1 && d.y.abs() <= 1 && grid.contains(from) && step_allowed(grid, from, d)
}

/// Cached neighbor computation helper.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Traversable 8-directional neighbors of `p`.
    pub fn of(&mut self, grid: &Grid, p: Point) -> &[Point] {
        self.buf.clear();
        neighbors_into(grid, p, &mut self.buf);
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_cell_has_eight_neighbors_in_order() {
        let g = Grid::from_ascii(
            "
            S....
            .....
            .....
            ....E
            ",
        )
        .unwrap();
        let mut nb = Neighbors::new();
        let p = Point::new(2, 1);
        let expected: Vec<Point> = DIRECTIONS.iter().map(|&d| p + d).collect();
        assert_eq!(nb.of(&g, p), expected.as_slice());
    }

    #[test]
    fn corner_cell_is_clipped_to_bounds() {
        let g = Grid::from_ascii("S.\n.E").unwrap();
        let mut nb = Neighbors::new();
        assert_eq!(
            nb.of(&g, Point::new(0, 0)),
            &[Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn walls_block_cells_and_corners() {
        // The wall east of the centre blocks E, and both diagonals that
        // would cut its corners (NE, SE).
        let g = Grid::from_ascii(
            "
            S..
            ..#
            ..E
            ",
        )
        .unwrap();
        let mut nb = Neighbors::new();
        let got = nb.of(&g, Point::new(1, 1)).to_vec();
        assert_eq!(
            got,
            vec![
                Point::new(0, 1),
                Point::new(1, 2),
                Point::new(1, 0),
                Point::new(0, 2),
                Point::new(0, 0),
            ]
        );
        assert!(!is_step(&g, Point::new(1, 1), Point::new(2, 2)));
        assert!(!is_step(&g, Point::new(2, 2), Point::new(1, 1)));
    }

    #[test]
    fn is_step_rejects_non_adjacent() {
        let g = Grid::from_ascii("S...\n...E").unwrap();
        assert!(is_step(&g, Point::new(0, 0), Point::new(1, 1)));
        assert!(!is_step(&g, Point::new(0, 0), Point::new(0, 0)));
        assert!(!is_step(&g, Point::new(0, 0), Point::new(2, 0)));
        assert!(!is_step(&g, Point::new(0, 0), Point::new(-1, 0)));
    }
}
