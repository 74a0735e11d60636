//! The [`Grid`] type: a W×H lattice of [`CellState`]s.
//!
//! The grid is the single source of truth for walls and for the two
//! distinguished cells. Start and end are cached next to the cell buffer
//! for O(1) access; every mutator keeps both in sync so that exactly one
//! `Start` and one `End` exist at all times.

use std::fmt;

use crate::error::{Error, Result};
use crate::geom::{Point, Range};

/// Minimum number of rows a resized grid may have.
pub const MIN_ROWS: i32 = 10;

/// Where the start marker is placed on a fresh grid.
const START_ANCHOR: Point = Point::new(2, 2);

/// Distance of the end marker from the bottom-right corner.
const END_INSET: Point = Point::new(3, 3);

// ---------------------------------------------------------------------------
// CellState
// ---------------------------------------------------------------------------

/// State of a single grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Start,
    End,
    Wall,
    /// Discovered but not yet expanded.
    Frontier,
    /// Expanded by the search.
    Visited,
    /// Part of the reconstructed path.
    Path,
}

impl CellState {
    /// Whether this state is search output cleared before every run.
    #[inline]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Frontier | Self::Visited | Self::Path)
    }

    /// Whether this state is the start or end marker.
    #[inline]
    pub const fn is_marker(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// ASCII glyph used by [`Grid::from_ascii`] and the `Display` impl.
    pub const fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Wall => '#',
            Self::Frontier => '+',
            Self::Visited => 'o',
            Self::Path => '*',
        }
    }

    fn from_glyph(ch: char) -> Option<Self> {
        Some(match ch {
            '.' => Self::Empty,
            'S' => Self::Start,
            'E' => Self::End,
            '#' => Self::Wall,
            '+' => Self::Frontier,
            'o' => Self::Visited,
            '*' => Self::Path,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A row-major lattice of [`CellState`]s with cached start / end markers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    cells: Vec<CellState>,
    width: i32,
    height: i32,
    start: Point,
    end: Point,
}

/// Number of rows for `columns` at `aspect` (height / width).
///
/// Returns [`Error::DegenerateGrid`] when the inputs cannot describe a
/// non-empty grid.
pub fn rows_for(columns: i32, aspect: f64) -> Result<i32> {
    let degenerate = || Error::DegenerateGrid { columns, aspect };
    if columns < 1 || !aspect.is_finite() || aspect <= 0.0 {
        return Err(degenerate());
    }
    let rows = (f64::from(columns) * aspect).round();
    if rows > f64::from(i32::MAX) {
        return Err(degenerate());
    }
    let rows = (rows as i32).max(MIN_ROWS);
    // Cell indices are computed in i32.
    columns.checked_mul(rows).ok_or_else(degenerate)?;
    Ok(rows)
}

impl Grid {
    /// Build an empty grid for `columns` at the given aspect ratio, with
    /// start near the top-left and end near the bottom-right corner.
    pub fn new(columns: i32, aspect: f64) -> Result<Self> {
        let rows = rows_for(columns, aspect)?;
        Ok(Self::with_size(columns, rows))
    }

    /// Build an empty `width`×`height` grid. Both must be positive.
    fn with_size(width: i32, height: i32) -> Self {
        let start = Point::new(START_ANCHOR.x.min(width - 1), START_ANCHOR.y.min(height - 1));
        let end = Point::new((width - END_INSET.x).max(0), (height - END_INSET.y).max(0));
        let mut grid = Self {
            cells: vec![CellState::Empty; (width * height) as usize],
            width,
            height,
            start,
            end,
        };
        grid.restamp();
        grid
    }

    /// Parse a grid from an ASCII layout, one line per row.
    ///
    /// Glyphs are those of [`CellState::glyph`]. Leading and trailing blank
    /// lines and surrounding whitespace on each line are ignored. Unlike
    /// [`Grid::new`] no minimum row count applies.
    pub fn from_ascii(layout: &str) -> Result<Self> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = lines.first().map_or(0, |l| l.chars().count());
        if width == 0 || lines.iter().any(|l| l.chars().count() != width) {
            return Err(Error::InconsistentRows);
        }
        let mut cells = Vec::with_capacity(width * lines.len());
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let state = CellState::from_glyph(ch).ok_or(Error::InvalidGlyph { ch, pos })?;
                match state {
                    CellState::Start => starts.push(pos),
                    CellState::End => ends.push(pos),
                    _ => {}
                }
                cells.push(state);
            }
        }
        let ([start], [end]) = (starts.as_slice(), ends.as_slice()) else {
            return Err(Error::MissingMarkers);
        };
        Ok(Self {
            cells,
            width: width as i32,
            height: lines.len() as i32,
            start: *start,
            end: *end,
        })
    }

    /// Rebuild the grid for new dimensions. Walls are erased and the
    /// markers return to their corners. On error the grid is unchanged.
    pub fn resize(&mut self, columns: i32, aspect: f64) -> Result<()> {
        *self = Self::new(columns, aspect)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The grid rectangle, anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Flat row-major index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    /// Inverse of [`index`](Grid::index).
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let w = self.width as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// State of the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn state(&self, p: Point) -> Option<CellState> {
        self.index(p).map(|i| self.cells[i])
    }

    /// Whether `p` is a wall. Out-of-bounds points are not walls.
    #[inline]
    pub fn is_wall(&self, p: Point) -> bool {
        self.state(p) == Some(CellState::Wall)
    }

    /// Clamp an arbitrary position into the grid.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0, self.width - 1), p.y.clamp(0, self.height - 1))
    }

    /// Count cells in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    /// Row-major iterator over `(Point, CellState)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &s)| (self.point(i), s))
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Flip `Empty ⇄ Wall`. Any other state is left alone.
    ///
    /// Returns whether the cell changed.
    pub fn toggle_wall(&mut self, p: Point) -> bool {
        let Some(i) = self.index(p) else {
            return false;
        };
        self.cells[i] = match self.cells[i] {
            CellState::Empty => CellState::Wall,
            CellState::Wall => CellState::Empty,
            _ => return false,
        };
        true
    }

    /// Turn an `Empty` cell into a wall. Never erases.
    ///
    /// Returns whether the cell changed.
    pub fn paint_wall(&mut self, p: Point) -> bool {
        match self.index(p) {
            Some(i) if self.cells[i] == CellState::Empty => {
                self.cells[i] = CellState::Wall;
                true
            }
            _ => false,
        }
    }

    /// Move the start marker to `p`.
    pub fn move_start(&mut self, p: Point) -> Result<()> {
        let i = self.index(p).ok_or(Error::OutOfBounds(p))?;
        if p == self.end {
            return Err(Error::MarkerCollision(p));
        }
        if let Some(old) = self.index(self.start) {
            self.cells[old] = CellState::Empty;
        }
        self.cells[i] = CellState::Start;
        self.start = p;
        Ok(())
    }

    /// Move the end marker to `p`.
    pub fn move_end(&mut self, p: Point) -> Result<()> {
        let i = self.index(p).ok_or(Error::OutOfBounds(p))?;
        if p == self.start {
            return Err(Error::MarkerCollision(p));
        }
        if let Some(old) = self.index(self.end) {
            self.cells[old] = CellState::Empty;
        }
        self.cells[i] = CellState::End;
        self.end = p;
        Ok(())
    }

    /// Stamp search output on `p`.
    ///
    /// Only transient states may be stamped, and never over a marker or a
    /// wall. Returns whether the cell changed.
    pub fn mark(&mut self, p: Point, state: CellState) -> bool {
        if !state.is_transient() {
            return false;
        }
        match self.index(p) {
            Some(i) if !self.cells[i].is_marker() && self.cells[i] != CellState::Wall => {
                let changed = self.cells[i] != state;
                self.cells[i] = state;
                changed
            }
            _ => false,
        }
    }

    /// Reset every `Frontier`, `Visited` and `Path` cell to `Empty`.
    pub fn clear_transient(&mut self) {
        for s in self.cells.iter_mut().filter(|s| s.is_transient()) {
            *s = CellState::Empty;
        }
        self.restamp();
    }

    /// Reset every wall to `Empty`.
    pub fn clear_walls(&mut self) {
        for s in self.cells.iter_mut().filter(|s| **s == CellState::Wall) {
            *s = CellState::Empty;
        }
        self.restamp();
    }

    fn restamp(&mut self) {
        if let Some(i) = self.index(self.start) {
            self.cells[i] = CellState::Start;
        }
        if let Some(i) = self.index(self.end) {
            self.cells[i] = CellState::End;
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            for s in row {
                write!(f, "{}", s.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(g: &Grid) -> (usize, usize) {
        (g.count(CellState::Start), g.count(CellState::End))
    }

    #[test]
    fn new_places_markers_in_corners() {
        let g = Grid::new(20, 0.75).unwrap();
        assert_eq!((g.width(), g.height()), (20, 15));
        assert_eq!(g.start(), Point::new(2, 2));
        assert_eq!(g.end(), Point::new(17, 12));
        assert_eq!(g.state(g.start()), Some(CellState::Start));
        assert_eq!(g.state(g.end()), Some(CellState::End));
        assert_eq!(g.count(CellState::Empty), 20 * 15 - 2);
    }

    #[test]
    fn rows_never_drop_below_minimum() {
        let g = Grid::new(12, 0.1).unwrap();
        assert_eq!(g.height(), MIN_ROWS);
        assert_eq!(rows_for(40, 0.5).unwrap(), 20);
    }

    #[test]
    fn tiny_grid_keeps_markers_apart() {
        let g = Grid::new(1, 1.0).unwrap();
        assert_eq!(g.start(), Point::new(0, 2));
        assert_eq!(g.end(), Point::new(0, MIN_ROWS - 3));
        assert_eq!(markers(&g), (1, 1));
    }

    #[test]
    fn degenerate_resize_keeps_previous_grid() {
        let mut g = Grid::new(20, 0.75).unwrap();
        g.toggle_wall(Point::new(5, 5));
        let before = g.clone();
        assert!(matches!(g.resize(0, 0.75), Err(Error::DegenerateGrid { .. })));
        assert!(g.resize(10, f64::NAN).is_err());
        assert!(g.resize(10, -1.0).is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn oversized_grid_is_degenerate() {
        assert!(matches!(rows_for(50_000, 1.0), Err(Error::DegenerateGrid { .. })));
        assert!(matches!(Grid::new(50_000, 1.0), Err(Error::DegenerateGrid { .. })));
        let mut g = Grid::new(20, 0.75).unwrap();
        let before = g.clone();
        assert!(g.resize(i32::MAX, 1.0).is_err());
        assert_eq!(g, before);
        assert_eq!(rows_for(46_340, 1.0), Ok(46_340));
    }

    #[test]
    fn resize_twice_is_identical() {
        let mut a = Grid::new(30, 0.6).unwrap();
        a.toggle_wall(Point::new(4, 4));
        a.move_start(Point::new(9, 9)).unwrap();
        a.resize(25, 0.8).unwrap();
        let first = a.clone();
        a.resize(25, 0.8).unwrap();
        assert_eq!(a, first);
        assert_eq!(a.count(CellState::Wall), 0);
        assert_eq!(a.start(), Point::new(2, 2));
    }

    #[test]
    fn toggle_wall_only_flips_empty_and_wall() {
        let mut g = Grid::new(20, 0.75).unwrap();
        let p = Point::new(5, 5);
        assert!(g.toggle_wall(p));
        assert!(g.is_wall(p));
        assert!(g.toggle_wall(p));
        assert_eq!(g.state(p), Some(CellState::Empty));

        assert!(!g.toggle_wall(g.start()));
        assert!(!g.toggle_wall(g.end()));
        g.mark(p, CellState::Visited);
        assert!(!g.toggle_wall(p));
        assert!(!g.toggle_wall(Point::new(-1, 0)));
        assert_eq!(markers(&g), (1, 1));
    }

    #[test]
    fn paint_wall_never_erases() {
        let mut g = Grid::new(20, 0.75).unwrap();
        let p = Point::new(3, 7);
        assert!(g.paint_wall(p));
        assert!(!g.paint_wall(p));
        assert!(g.is_wall(p));
        assert!(!g.paint_wall(g.end()));
    }

    #[test]
    fn moving_markers_keeps_exactly_one_each() {
        let mut g = Grid::new(20, 0.75).unwrap();
        let wall = Point::new(8, 8);
        g.toggle_wall(wall);
        g.move_start(wall).unwrap();
        assert_eq!(g.start(), wall);
        assert_eq!(g.state(Point::new(2, 2)), Some(CellState::Empty));
        g.move_end(Point::new(0, 0)).unwrap();
        assert_eq!(markers(&g), (1, 1));
        assert_eq!(g.count(CellState::Wall), 0);
    }

    #[test]
    fn marker_collision_is_rejected() {
        let mut g = Grid::new(20, 0.75).unwrap();
        let before = g.clone();
        assert_eq!(g.move_start(g.end()), Err(Error::MarkerCollision(g.end())));
        assert_eq!(g.move_end(g.start()), Err(Error::MarkerCollision(g.start())));
        assert_eq!(
            g.move_end(Point::new(20, 0)),
            Err(Error::OutOfBounds(Point::new(20, 0)))
        );
        assert_eq!(g, before);
    }

    #[test]
    fn mark_skips_markers_and_walls() {
        let mut g = Grid::new(20, 0.75).unwrap();
        let w = Point::new(6, 6);
        g.toggle_wall(w);
        assert!(!g.mark(g.start(), CellState::Visited));
        assert!(!g.mark(g.end(), CellState::Frontier));
        assert!(!g.mark(w, CellState::Path));
        assert!(!g.mark(Point::new(1, 1), CellState::Wall));
        assert!(g.mark(Point::new(1, 1), CellState::Frontier));
        assert!(g.mark(Point::new(1, 1), CellState::Visited));
    }

    #[test]
    fn clear_transient_keeps_walls() {
        let mut g = Grid::new(20, 0.75).unwrap();
        g.toggle_wall(Point::new(4, 4));
        g.mark(Point::new(1, 1), CellState::Visited);
        g.mark(Point::new(1, 2), CellState::Frontier);
        g.mark(Point::new(1, 3), CellState::Path);
        g.clear_transient();
        assert_eq!(g.count(CellState::Wall), 1);
        assert_eq!(g.count(CellState::Empty), 20 * 15 - 3);
        assert_eq!(markers(&g), (1, 1));
    }

    #[test]
    fn clear_walls_is_idempotent() {
        let mut g = Grid::new(20, 0.75).unwrap();
        for x in 0..10 {
            g.toggle_wall(Point::new(x, 6));
        }
        g.mark(Point::new(1, 1), CellState::Visited);
        g.clear_walls();
        let once = g.clone();
        g.clear_walls();
        assert_eq!(g, once);
        assert_eq!(g.count(CellState::Wall), 0);
        assert_eq!(g.count(CellState::Visited), 1);
    }

    #[test]
    fn clamp_and_index_round_trip() {
        let g = Grid::new(20, 0.75).unwrap();
        assert_eq!(g.clamp(Point::new(-4, 99)), Point::new(0, 14));
        let p = Point::new(7, 3);
        assert_eq!(g.point(g.index(p).unwrap()), p);
        assert_eq!(g.index(Point::new(20, 0)), None);
    }

    #[test]
    fn from_ascii_parses_layout() {
        let g = Grid::from_ascii(
            "
            S.#
            ..#
            ..E
            ",
        )
        .unwrap();
        assert_eq!((g.width(), g.height()), (3, 3));
        assert_eq!(g.start(), Point::new(0, 0));
        assert_eq!(g.end(), Point::new(2, 2));
        assert_eq!(g.count(CellState::Wall), 2);
        assert_eq!(g.to_string(), "S.#\n..#\n..E\n");
    }

    #[test]
    fn from_ascii_rejects_bad_layouts() {
        assert_eq!(Grid::from_ascii("S.\n.E.").unwrap_err(), Error::InconsistentRows);
        assert_eq!(Grid::from_ascii("S..\n...").unwrap_err(), Error::MissingMarkers);
        assert_eq!(Grid::from_ascii("SS\nE.").unwrap_err(), Error::MissingMarkers);
        assert_eq!(
            Grid::from_ascii("S?\n.E").unwrap_err(),
            Error::InvalidGlyph {
                ch: '?',
                pos: Point::new(1, 0)
            }
        );
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_survives_json() {
        let mut g = Grid::new(12, 1.0).unwrap();
        g.toggle_wall(Point::new(5, 5));
        let json = serde_json::to_string(&g).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
