//! pathviz: watch BFS, DFS and A* search a grid in the terminal.

use pathviz::{PathvizModel, UI_HEIGHT, UI_WIDTH, VisualizerConfig};
use pathviz_core::{App, AppConfig};
use pathviz_crossterm::CrosstermDriver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let model = PathvizModel::new(VisualizerConfig::default())?;
    let driver = CrosstermDriver::new();
    let mut app = App::new(AppConfig {
        model,
        driver,
        width: UI_WIDTH,
        height: UI_HEIGHT,
    });
    app.run()?;
    Ok(())
}
