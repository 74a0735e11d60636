//! Stepwise grid search for the path visualizer.
//!
//! A [`SearchRun`] explores a [`Grid`](pathviz_core::Grid) one cell per
//! [`step`](SearchRun::step), stamping `Visited` and `Frontier` marks as it
//! goes, so a caller can render between steps:
//!
//! - **BFS** expands in discovery order (FIFO [`Fifo`])
//! - **DFS** expands the most recent discovery first ([`Lifo`])
//! - **A\*** expands the lowest `g + h` first ([`OpenSet`]), with Euclidean
//!   step costs and heuristic
//!
//! Movement is 8-directional; diagonals may not cut the corner of a wall
//! (see [`neighbors_into`]). Once a run ends in
//! [`Found`](StepResult::Found), [`reconstruct`] turns its
//! [`Predecessors`] into a [`Path`].

mod distance;
mod error;
mod frontier;
mod neighbors;
mod path;
mod search;

pub use distance::{chebyshev, euclidean};
pub use error::{Error, Result};
pub use frontier::{Discovery, Fifo, Frontier, Lifo, OpenSet};
pub use neighbors::{DIRECTIONS, Neighbors, is_step, neighbors_into};
pub use path::{Path, Predecessors, reconstruct};
pub use search::{Algorithm, SearchRun, StepResult};
