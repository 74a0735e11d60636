//! The [`SearchRun`] step machine shared by BFS, DFS and A*.
//!
//! Each call to [`SearchRun::step`] pops exactly one cell from the
//! frontier, expands it, and stamps the grid (`Visited` for the expanded
//! cell, `Frontier` for newly admitted neighbors). The caller is free to
//! render between steps.

use std::fmt;
use std::str::FromStr;

use pathviz_core::{CellState, Grid, Point};

use crate::distance::euclidean;
use crate::error::Error;
use crate::frontier::{Discovery, Fifo, Frontier, Lifo, OpenSet};
use crate::neighbors::neighbors_into;
use crate::path::Predecessors;

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// The traversal strategy of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    Bfs,
    Dfs,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Self::Bfs, Self::Dfs, Self::AStar];

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Dfs => "DFS",
            Self::AStar => "A*",
        }
    }

    /// The algorithm bound to a number key (`1`, `2`, `3`).
    pub fn from_key(ch: char) -> Option<Self> {
        match ch {
            '1' => Some(Self::Bfs),
            '2' => Some(Self::Dfs),
            '3' => Some(Self::AStar),
            _ => None,
        }
    }

    fn frontier(self) -> Box<dyn Frontier> {
        match self {
            Self::Bfs => Box::new(Fifo::default()),
            Self::Dfs => Box::new(Lifo::default()),
            Self::AStar => Box::new(OpenSet::new()),
        }
    }

    /// Heuristic estimate from `p` to `goal`. Zero for uninformed searches.
    fn estimate(self, p: Point, goal: Point) -> f64 {
        match self {
            Self::AStar => euclidean(p, goal),
            Self::Bfs | Self::Dfs => 0.0,
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parse `bfs`, `dfs` or `astar` (also `a*`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            "astar" | "a*" => Ok(Self::AStar),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// StepResult
// ---------------------------------------------------------------------------

/// Outcome of one [`SearchRun::step`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// A cell was expanded; the search goes on.
    Continue(Point),
    /// The end cell was popped.
    Found(Point),
    /// The frontier ran dry without reaching the end.
    Exhausted,
}

impl StepResult {
    /// Whether the run is over.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue(_))
    }
}

// ---------------------------------------------------------------------------
// SearchRun
// ---------------------------------------------------------------------------

/// Transient state of one search execution.
pub struct SearchRun {
    algorithm: Algorithm,
    start: Point,
    end: Point,
    width: i32,
    frontier: Box<dyn Frontier>,
    /// Admitted to the frontier at least once (`Discovery::Once`).
    seen: Vec<bool>,
    /// Expanded; never reopened.
    closed: Vec<bool>,
    /// Cost so far. `INFINITY` when unknown.
    g: Vec<f64>,
    /// Estimated total cost. `INFINITY` when unknown.
    f: Vec<f64>,
    preds: Predecessors,
    nbuf: Vec<Point>,
    explored: usize,
    outcome: Option<StepResult>,
}

impl SearchRun {
    /// Seed a run from the grid's start toward its end.
    ///
    /// The grid's dimensions must not change while the run is alive.
    pub fn new(algorithm: Algorithm, grid: &Grid) -> Self {
        let len = grid.len();
        let (start, end) = (grid.start(), grid.end());
        let mut run = Self {
            algorithm,
            start,
            end,
            width: grid.width(),
            frontier: algorithm.frontier(),
            seen: vec![false; len],
            closed: vec![false; len],
            g: vec![f64::INFINITY; len],
            f: vec![f64::INFINITY; len],
            preds: Predecessors::for_grid(grid),
            nbuf: Vec::with_capacity(8),
            explored: 0,
            outcome: None,
        };
        let si = run.idx(start);
        let h = algorithm.estimate(start, end);
        run.seen[si] = true;
        run.g[si] = 0.0;
        run.f[si] = h;
        run.frontier.push(start, h);
        log::debug!("{algorithm} run seeded at {start}, target {end}");
        run
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    /// Perform one unit of work: pop one cell and expand it.
    ///
    /// After a terminal result, further calls return it again without
    /// touching the grid.
    pub fn step(&mut self, grid: &mut Grid) -> StepResult {
        if let Some(done) = self.outcome {
            return done;
        }
        debug_assert_eq!(grid.width(), self.width, "grid resized during a run");

        let Some(cur) = self.frontier.pop() else {
            log::debug!(
                "{} exhausted after {} cells",
                self.algorithm,
                self.explored
            );
            self.outcome = Some(StepResult::Exhausted);
            return StepResult::Exhausted;
        };

        let ci = self.idx(cur);
        self.closed[ci] = true;
        self.explored += 1;
        grid.mark(cur, CellState::Visited);
        log::trace!("{} expands {cur}", self.algorithm);

        if cur == self.end {
            log::debug!("{} found {cur} after {} cells", self.algorithm, self.explored);
            self.outcome = Some(StepResult::Found(cur));
            return StepResult::Found(cur);
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        neighbors_into(grid, cur, &mut nbuf);

        let discovery = self.frontier.discovery();
        let cur_g = self.g[ci];
        for &n in nbuf.iter() {
            let ni = self.idx(n);
            let priority = match discovery {
                Discovery::Once => {
                    if self.seen[ni] {
                        continue;
                    }
                    self.seen[ni] = true;
                    0.0
                }
                Discovery::Relax => {
                    if self.closed[ni] {
                        continue;
                    }
                    let tentative = cur_g + euclidean(cur, n);
                    if tentative >= self.g[ni] {
                        continue;
                    }
                    self.g[ni] = tentative;
                    self.f[ni] = tentative + self.algorithm.estimate(n, self.end);
                    self.f[ni]
                }
            };
            self.preds.insert(n, cur);
            grid.mark(n, CellState::Frontier);
            self.frontier.push(n, priority);
        }

        self.nbuf = nbuf;
        StepResult::Continue(cur)
    }

    /// Step until the run terminates and return the terminal result.
    pub fn run_to_end(&mut self, grid: &mut Grid) -> StepResult {
        loop {
            let r = self.step(grid);
            if r.is_terminal() {
                return r;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Number of cells popped so far (every `Continue` and `Found`).
    #[inline]
    pub fn explored(&self) -> usize {
        self.explored
    }

    /// The terminal result, once reached.
    #[inline]
    pub fn outcome(&self) -> Option<StepResult> {
        self.outcome
    }

    #[inline]
    pub fn predecessors(&self) -> &Predecessors {
        &self.preds
    }

    /// Cells waiting in the frontier.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Whether `p` has been expanded.
    pub fn is_closed(&self, p: Point) -> bool {
        self.in_bounds(p) && self.closed[self.idx(p)]
    }

    /// Best known cost from start to `p` (A* and the start cell only).
    pub fn g_cost(&self, p: Point) -> Option<f64> {
        self.cost(&self.g, p)
    }

    /// Estimated total cost through `p` (A* and the start cell only).
    pub fn f_cost(&self, p: Point) -> Option<f64> {
        self.cost(&self.f, p)
    }

    fn cost(&self, costs: &[f64], p: Point) -> Option<f64> {
        if !self.in_bounds(p) {
            return None;
        }
        let c = costs[self.idx(p)];
        c.is_finite().then_some(c)
    }

    #[inline]
    fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && self.idx(p) < self.closed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::chebyshev;
    use crate::neighbors::is_step;
    use crate::path::{Path, reconstruct};

    fn cost(start: Point, path: &Path) -> f64 {
        let mut prev = start;
        let mut total = 0.0;
        for &p in path {
            total += euclidean(prev, p);
            prev = p;
        }
        total
    }

    fn open_grid() -> Grid {
        Grid::new(20, 0.75).unwrap()
    }

    /// Start and end split by a full-height wall at column 10.
    fn split_grid() -> Grid {
        let mut g = open_grid();
        for y in 0..g.height() {
            g.toggle_wall(Point::new(10, y));
        }
        g
    }

    #[test]
    fn bfs_open_grid_finds_chebyshev_path() {
        let mut g = open_grid();
        let mut run = SearchRun::new(Algorithm::Bfs, &g);
        let r = run.run_to_end(&mut g);
        assert_eq!(r, StepResult::Found(Point::new(17, 12)));
        let path = reconstruct(run.predecessors(), g.start(), g.end()).unwrap();
        assert_eq!(path.len(), 15);
        assert_eq!(path.len() as i32, chebyshev(g.start(), g.end()));
        assert!(run.explored() >= path.len());
    }

    #[test]
    fn explored_counts_continue_and_found_steps() {
        for alg in Algorithm::ALL {
            let mut g = open_grid();
            let mut run = SearchRun::new(alg, &g);
            let mut steps = 0;
            loop {
                match run.step(&mut g) {
                    StepResult::Continue(_) => steps += 1,
                    StepResult::Found(_) => {
                        steps += 1;
                        break;
                    }
                    StepResult::Exhausted => break,
                }
            }
            assert_eq!(run.explored(), steps, "{alg}");
        }
    }

    #[test]
    fn wall_split_exhausts_every_algorithm() {
        let reachable = 10 * 15;
        for alg in Algorithm::ALL {
            let mut g = split_grid();
            let mut run = SearchRun::new(alg, &g);
            assert_eq!(run.run_to_end(&mut g), StepResult::Exhausted, "{alg}");
            assert_eq!(run.explored(), reachable, "{alg}");
            assert_eq!(run.frontier_len(), 0);
        }
    }

    #[test]
    fn terminal_result_is_sticky() {
        let mut g = split_grid();
        let mut run = SearchRun::new(Algorithm::Dfs, &g);
        run.run_to_end(&mut g);
        let explored = run.explored();
        let snapshot = g.clone();
        assert_eq!(run.step(&mut g), StepResult::Exhausted);
        assert_eq!(run.outcome(), Some(StepResult::Exhausted));
        assert_eq!(run.explored(), explored);
        assert_eq!(g, snapshot);
    }

    #[test]
    fn markers_are_never_overwritten() {
        for alg in Algorithm::ALL {
            let mut g = open_grid();
            let (s, e) = (g.start(), g.end());
            let mut run = SearchRun::new(alg, &g);
            while !run.step(&mut g).is_terminal() {
                assert_eq!(g.state(s), Some(CellState::Start));
                assert_eq!(g.state(e), Some(CellState::End));
            }
            assert_eq!(g.count(CellState::Start), 1);
            assert_eq!(g.count(CellState::End), 1);
        }
    }

    #[test]
    fn first_step_marks_visited_and_frontier() {
        let mut g = open_grid();
        let mut run = SearchRun::new(Algorithm::Bfs, &g);
        assert_eq!(run.step(&mut g), StepResult::Continue(g.start()));
        assert_eq!(g.count(CellState::Frontier), 8);
        assert_eq!(run.frontier_len(), 8);
        assert_eq!(run.step(&mut g), StepResult::Continue(Point::new(3, 2)));
        assert_eq!(g.state(Point::new(3, 2)), Some(CellState::Visited));
    }

    #[test]
    fn dfs_dives_along_the_last_direction() {
        // The last neighbor pushed from start is NW, so DFS pops it first.
        let mut g = open_grid();
        let mut run = SearchRun::new(Algorithm::Dfs, &g);
        run.step(&mut g);
        assert_eq!(run.step(&mut g), StepResult::Continue(Point::new(1, 1)));
    }

    #[test]
    fn astar_paths_are_legal_and_cheapest() {
        let mut g = open_grid();
        for y in 0..11 {
            g.toggle_wall(Point::new(8, y));
        }
        for y in 4..15 {
            g.toggle_wall(Point::new(13, y));
        }
        let mut bfs_grid = g.clone();
        let mut bfs = SearchRun::new(Algorithm::Bfs, &bfs_grid);
        assert!(matches!(bfs.run_to_end(&mut bfs_grid), StepResult::Found(_)));
        let bfs_path = reconstruct(bfs.predecessors(), g.start(), g.end()).unwrap();

        let mut run = SearchRun::new(Algorithm::AStar, &g);
        assert!(matches!(run.run_to_end(&mut g), StepResult::Found(_)));
        let path = reconstruct(run.predecessors(), g.start(), g.end()).unwrap();

        let mut prev = g.start();
        for &p in &path {
            assert!(is_step(&g, prev, p), "{prev} -> {p}");
            prev = p;
        }
        assert_eq!(prev, g.end());
        let (astar_cost, bfs_cost) = (cost(g.start(), &path), cost(g.start(), &bfs_path));
        assert!(astar_cost <= bfs_cost + 1e-9, "{astar_cost} > {bfs_cost}");
        assert!(run.explored() <= 20 * 15);
    }

    #[test]
    fn astar_costs_are_euclidean() {
        let mut g = open_grid();
        let mut run = SearchRun::new(Algorithm::AStar, &g);
        assert_eq!(run.g_cost(g.start()), Some(0.0));
        assert_eq!(run.f_cost(g.start()), Some(euclidean(g.start(), g.end())));
        run.step(&mut g);
        let diag = Point::new(3, 3);
        let g_diag = run.g_cost(diag).unwrap();
        assert!((g_diag - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert!(run.is_closed(g.start()));
        assert_eq!(run.g_cost(Point::new(15, 3)), None);
        assert_eq!(run.g_cost(Point::new(-1, 3)), None);
    }

    #[test]
    fn astar_never_reopens_closed_cells() {
        let mut g = split_grid();
        g.toggle_wall(Point::new(10, 7));
        let mut run = SearchRun::new(Algorithm::AStar, &g);
        let mut popped = std::collections::HashSet::new();
        loop {
            match run.step(&mut g) {
                StepResult::Continue(p) => assert!(popped.insert(p), "{p} reopened"),
                StepResult::Found(p) => {
                    assert!(popped.insert(p));
                    break;
                }
                StepResult::Exhausted => panic!("gap at (10, 7) should be reachable"),
            }
        }
        assert_eq!(popped.len(), run.explored());
    }

    #[test]
    fn start_boxed_in_exhausts_after_one_step() {
        let mut g = Grid::from_ascii(
            "
            ###..
            #S#..
            ###.E
            ",
        )
        .unwrap();
        for alg in Algorithm::ALL {
            let mut run = SearchRun::new(alg, &g);
            assert_eq!(run.step(&mut g), StepResult::Continue(Point::new(1, 1)));
            assert_eq!(run.step(&mut g), StepResult::Exhausted);
            assert_eq!(run.explored(), 1);
        }
    }

    #[test]
    fn algorithm_keys_and_names() {
        assert_eq!(Algorithm::from_key('1'), Some(Algorithm::Bfs));
        assert_eq!(Algorithm::from_key('3'), Some(Algorithm::AStar));
        assert_eq!(Algorithm::from_key('4'), None);
        assert_eq!(Algorithm::AStar.to_string(), "A*");
    }

    #[test]
    fn algorithm_from_str() {
        assert_eq!("bfs".parse(), Ok(Algorithm::Bfs));
        assert_eq!(" DFS ".parse(), Ok(Algorithm::Dfs));
        assert_eq!("astar".parse(), Ok(Algorithm::AStar));
        assert_eq!("A*".parse::<Algorithm>(), Ok(Algorithm::AStar));
        assert_eq!(
            "dijkstra".parse::<Algorithm>(),
            Err(Error::UnknownAlgorithm("dijkstra".into()))
        );
    }
}
