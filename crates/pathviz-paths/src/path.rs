use pathviz_core::{Grid, Point};

use crate::error::{Error, Result};

/// Predecessor map: for each discovered cell, the cell it was reached from.
///
/// Flat, row-major storage sized to the grid being searched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predecessors {
    width: i32,
    height: i32,
    from: Vec<Option<Point>>,
}

impl Predecessors {
    /// An empty map for a `width`×`height` grid.
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            from: vec![None; len],
        }
    }

    /// An empty map sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        (p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    /// The cell `p` was reached from, if any.
    #[inline]
    pub fn get(&self, p: Point) -> Option<Point> {
        self.idx(p).and_then(|i| self.from[i])
    }

    /// Record that `p` was reached from `prev`. Ignored outside the grid.
    #[inline]
    pub fn insert(&mut self, p: Point, prev: Point) {
        if let Some(i) = self.idx(p) {
            self.from[i] = Some(prev);
        }
    }

    /// Number of cells with a recorded predecessor.
    pub fn count(&self) -> usize {
        self.from.iter().filter(|e| e.is_some()).count()
    }
}

/// An ordered path from the cell after start through the terminal cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path(Vec<Point>);

impl Path {
    /// Number of cells, which is also the number of moves from start.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[Point] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    /// The terminal cell.
    pub fn last(&self) -> Option<Point> {
        self.0.last().copied()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Walk `preds` back from `terminal` to `start` and return the path in
/// forward order, excluding `start`.
///
/// A chain that ends anywhere but `start`, or loops, is a bookkeeping bug
/// and yields [`Error::BrokenChain`].
pub fn reconstruct(preds: &Predecessors, start: Point, terminal: Point) -> Result<Path> {
    let broken = |reached: Point| {
        log::error!("broken predecessor chain: {terminal} ends at {reached}, start is {start}");
        Error::BrokenChain { terminal, reached }
    };
    let mut cells = Vec::new();
    let mut cur = terminal;
    // A valid chain visits each cell at most once.
    let limit = preds.from.len();
    while let Some(prev) = preds.get(cur) {
        if cells.len() == limit {
            return Err(broken(cur));
        }
        cells.push(cur);
        cur = prev;
    }
    if cur != start {
        return Err(broken(cur));
    }
    cells.reverse();
    Ok(Path(cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(points: &[(i32, i32)]) -> Predecessors {
        let mut preds = Predecessors::new(8, 8);
        for w in points.windows(2) {
            let (a, b) = (Point::new(w[0].0, w[0].1), Point::new(w[1].0, w[1].1));
            preds.insert(b, a);
        }
        preds
    }

    #[test]
    fn reconstruct_follows_chain_forward() {
        let preds = chain(&[(0, 0), (1, 1), (2, 1), (3, 2)]);
        let path = reconstruct(&preds, Point::new(0, 0), Point::new(3, 2)).unwrap();
        assert_eq!(
            path.cells(),
            &[Point::new(1, 1), Point::new(2, 1), Point::new(3, 2)]
        );
        assert_eq!(path.last(), Some(Point::new(3, 2)));
        assert_eq!(preds.count(), 3);
    }

    #[test]
    fn terminal_equal_to_start_is_empty_path() {
        let preds = Predecessors::new(4, 4);
        let path = reconstruct(&preds, Point::new(1, 1), Point::new(1, 1)).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn chain_missing_start_is_an_error() {
        let preds = chain(&[(5, 5), (1, 1), (2, 2)]);
        assert_eq!(
            reconstruct(&preds, Point::new(0, 0), Point::new(2, 2)),
            Err(Error::BrokenChain {
                terminal: Point::new(2, 2),
                reached: Point::new(5, 5),
            })
        );
        let empty = Predecessors::new(4, 4);
        assert!(reconstruct(&empty, Point::new(0, 0), Point::new(3, 3)).is_err());
    }

    #[test]
    fn cyclic_chain_is_an_error() {
        let mut preds = Predecessors::new(2, 1);
        preds.insert(Point::new(0, 0), Point::new(1, 0));
        preds.insert(Point::new(1, 0), Point::new(0, 0));
        assert!(reconstruct(&preds, Point::new(5, 5), Point::new(1, 0)).is_err());
    }

    #[test]
    fn out_of_range_inserts_are_ignored() {
        let mut preds = Predecessors::new(2, 2);
        preds.insert(Point::new(9, 9), Point::new(0, 0));
        assert_eq!(preds.count(), 0);
        assert_eq!(preds.get(Point::new(9, 9)), None);
    }
}
