//! **pathviz-core**: core types for the pathviz grid pathfinding visualizer.
//!
//! This crate provides the [`Grid`] of [`CellState`]s that searches run on,
//! geometry primitives, input events, the glyph [`Screen`] a front end
//! draws into, and the Elm-architecture application loop.

pub mod app;
pub mod error;
pub mod geom;
pub mod glyph;
pub mod grid;
pub mod messages;
pub mod screen;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use error::{Error, Result};
pub use geom::{Point, Range};
pub use glyph::Glyph;
pub use grid::{CellState, Grid};
pub use messages::*;
pub use screen::{Frame, Screen};
pub use style::{AttrMask, Color, Style};
