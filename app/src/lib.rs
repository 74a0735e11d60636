//! pathviz: a terminal grid pathfinding visualizer built on the pathviz
//! crates.
//!
//! Paint walls with the mouse, drag the start and end markers, then watch
//! BFS, DFS or A* explore the grid step by step.

pub mod colors;
pub mod config;
pub mod model;
pub mod session;

pub use config::VisualizerConfig;
pub use model::{PathvizModel, UI_HEIGHT, UI_WIDTH};
pub use session::{Drag, Session, Status};
