//! Cell and HUD palette.
//!
//! Cell colours follow the visualizer's light theme. Empty cells use a
//! dark grey so walls and marks stand out on a dark terminal.

use pathviz_core::{CellState, Color, Style};

// -- Cells --

pub const EMPTY_BG: Color = Color::from_rgb(30, 34, 42);
pub const START_BG: Color = Color::from_rgb(0x16, 0xA3, 0x4A);
pub const END_BG: Color = Color::from_rgb(0xDC, 0x26, 0x26);
pub const WALL_BG: Color = Color::from_rgb(0x47, 0x55, 0x69);
pub const FRONTIER_BG: Color = Color::from_rgb(0xF5, 0x9E, 0x0B);
pub const VISITED_BG: Color = Color::from_rgb(0x60, 0xA5, 0xFA);
pub const PATH_BG: Color = Color::from_rgb(0x25, 0x63, 0xEB);

/// Glyph colour drawn over a cell background.
pub const CELL_FG: Color = Color::from_rgb(248, 250, 252);

// -- HUD --

pub const HUD_FG: Color = Color::DEFAULT;
pub const HUD_DIM: Color = Color::from_rgb(120, 128, 140);
pub const HUD_ACCENT: Color = Color::from_rgb(0x3B, 0x82, 0xF6);
pub const HUD_GOOD: Color = START_BG;
pub const HUD_BAD: Color = END_BG;

/// Background of a cell in `state`.
pub fn cell_bg(state: CellState) -> Color {
    match state {
        CellState::Empty => EMPTY_BG,
        CellState::Start => START_BG,
        CellState::End => END_BG,
        CellState::Wall => WALL_BG,
        CellState::Frontier => FRONTIER_BG,
        CellState::Visited => VISITED_BG,
        CellState::Path => PATH_BG,
    }
}

/// Full style of a cell in `state`.
pub fn cell_style(state: CellState) -> Style {
    Style::default().with_fg(CELL_FG).with_bg(cell_bg(state))
}
