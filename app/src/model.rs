//! Elm-architecture Model implementation.

use pathviz_core::{
    AttrMask, CellState, Effect, Glyph, Key, Model, MouseAction, Msg, Point, Range, Screen, Style,
};
use pathviz_paths::Algorithm;

use crate::colors::*;
use crate::config::VisualizerConfig;
use crate::session::{Session, Status};

/// Screen size assumed until the driver reports one.
pub const UI_WIDTH: i32 = 80;
pub const UI_HEIGHT: i32 = 24;

/// Rows above the grid: status line and statistics line.
const HEADER_ROWS: i32 = 2;
/// Rows below the grid: key help.
const FOOTER_ROWS: i32 = 1;
/// Terminal columns per grid cell.
const CELL_WIDTH: i32 = 2;

/// Footer column where the key help starts; hover coordinates go left of it.
const HELP_X: i32 = 12;
const HELP: &str = "1/2/3 run  c clear  r reset  +/- cols  [/] speed  esc stop  q quit";

/// The visualizer model.
pub struct PathvizModel {
    session: Session,
    width: i32,
    height: i32,
}

impl PathvizModel {
    pub fn new(config: VisualizerConfig) -> pathviz_core::Result<Self> {
        Ok(Self {
            session: Session::new(config)?,
            width: UI_WIDTH,
            height: UI_HEIGHT,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Screen area the grid is drawn in.
    fn grid_area(&self) -> Range {
        Range::new(0, HEADER_ROWS, self.width, self.height - FOOTER_ROWS)
    }

    fn resize_viewport(&mut self) {
        let area = self.grid_area();
        let (w, h) = (area.width() / CELL_WIDTH, area.height());
        // Errors are logged by the session; the old grid stays.
        let _ = self.session.resize(w, h);
    }
}

impl Model for PathvizModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => {
                log::debug!("pathviz started with a {} grid", self.session.label());
                None
            }
            Msg::Screen { width, height, .. } => {
                self.width = width;
                self.height = height;
                self.resize_viewport();
                None
            }
            Msg::Tick(now) => {
                // A failed run is logged and shown in the status line.
                let _ = self.session.tick(now, &mut ());
                None
            }
            Msg::KeyDown { key, .. } => self.handle_key(key),
            Msg::Mouse { .. } => {
                let area = self.grid_area();
                if let Msg::Mouse { action, pos, .. } = area.rel_msg(msg) {
                    let on_area = Range::new(0, 0, area.width(), area.height()).contains(pos);
                    self.handle_mouse(action, pos, on_area);
                }
                None
            }
            Msg::Quit => Some(Effect::End),
        }
    }

    fn draw(&self, screen: &mut Screen) {
        screen.fill(Glyph::default());
        self.draw_header(screen);
        self.draw_grid(screen);
        self.draw_footer(screen);
    }
}

impl PathvizModel {
    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    fn handle_key(&mut self, key: Key) -> Option<Effect> {
        let s = &mut self.session;
        let result = match key {
            Key::Char('q') | Key::Char('Q') => return Some(Effect::End),
            Key::Escape => {
                s.cancel();
                Ok(())
            }
            Key::Char(c @ ('1' | '2' | '3')) => match Algorithm::from_key(c) {
                Some(alg) => s.trigger(alg),
                None => Ok(()),
            },
            Key::Char('c') => s.clear_walls(),
            Key::Char('r') => s.reset_all(),
            Key::Char('+') | Key::Char('=') => {
                let n = s.columns() + s.config().column_step;
                s.set_columns(n)
            }
            Key::Char('-') => {
                let n = s.columns() - s.config().column_step;
                s.set_columns(n)
            }
            Key::Char('[') => {
                let ms = s.speed_ms() + s.config().speed_step_ms;
                s.set_speed(ms);
                Ok(())
            }
            Key::Char(']') => {
                let ms = s.speed_ms().saturating_sub(s.config().speed_step_ms);
                s.set_speed(ms);
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            log::debug!("key {key:?} ignored: {e}");
        }
        None
    }

    /// `pos` is relative to the grid area.
    fn handle_mouse(&mut self, action: MouseAction, pos: Point, on_area: bool) {
        let cell = Point::new(pos.x.div_euclid(CELL_WIDTH), pos.y);
        let on_grid = on_area && self.session.grid().contains(cell);
        let result = match action {
            MouseAction::Main if on_grid => self.session.pointer_down(cell),
            MouseAction::Drag => {
                self.session.set_hover(Some(cell));
                self.session.pointer_drag(cell)
            }
            MouseAction::Release => {
                self.session.pointer_up();
                Ok(())
            }
            MouseAction::Move => {
                self.session.set_hover(on_grid.then_some(cell));
                Ok(())
            }
            MouseAction::Main => Ok(()),
        };
        if let Err(e) = result {
            log::debug!("{action:?} at {cell} ignored: {e}");
        }
    }

    // -------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------

    fn draw_header(&self, screen: &mut Screen) {
        let s = &self.session;
        let bar = Style::default().with_fg(HUD_FG).with_attrs(AttrMask::REVERSE);
        for x in 0..self.width {
            screen.set(Point::new(x, 0), Glyph::default().with_style(bar));
        }
        let status_fg = match s.status() {
            Status::Done => HUD_GOOD,
            Status::NoPath | Status::Failed => HUD_BAD,
            Status::Running(_) => HUD_ACCENT,
            Status::Idle | Status::Cancelled => HUD_FG,
        };
        let mut p = screen.draw_text(Point::new(1, 0), "pathviz  ", bar.with_attrs(AttrMask::REVERSE | AttrMask::BOLD));
        p = screen.draw_text(p, &s.status().to_string(), bar.with_fg(status_fg));
        screen.draw_text(
            p,
            &format!("  |  {}  |  {} ms/step", s.label(), s.speed_ms()),
            bar,
        );

        let dim = Style::default().with_fg(HUD_DIM);
        let val = Style::default().with_fg(HUD_FG).with_attrs(AttrMask::BOLD);
        let path = s
            .metrics()
            .and_then(|m| m.path_len)
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let time = s
            .metrics()
            .map_or_else(|| "-".to_string(), |m| format!("{:.1} ms", m.elapsed.as_secs_f64() * 1000.0));
        let mut p = Point::new(1, 1);
        for (label, value) in [
            ("explored ", s.explored().to_string()),
            ("  path ", path),
            ("  time ", time),
        ] {
            p = screen.draw_text(p, label, dim);
            p = screen.draw_text(p, &value, val);
        }
        self.draw_progress(screen, p.shift(2, 0), s.progress());
    }

    fn draw_progress(&self, screen: &mut Screen, at: Point, pct: u8) {
        const BAR: i32 = 20;
        let filled = (i32::from(pct) * BAR + 50) / 100;
        let mut p = screen.draw_text(at, "[", Style::default().with_fg(HUD_DIM));
        for i in 0..BAR {
            let (ch, fg) = if i < filled { ('=', HUD_ACCENT) } else { (' ', HUD_DIM) };
            screen.set(p, Glyph::default().with_char(ch).with_style(Style::default().with_fg(fg)));
            p = p.shift(1, 0);
        }
        let p = screen.draw_text(p, "] ", Style::default().with_fg(HUD_DIM));
        screen.draw_text(p, &format!("{pct}%"), Style::default().with_fg(HUD_FG));
    }

    fn draw_grid(&self, screen: &mut Screen) {
        let area = self.grid_area();
        let grid = self.session.grid();
        let hover = self.session.hover().filter(|_| !self.session.is_running());
        for (p, state) in grid.iter() {
            let sp = Point::new(area.min.x + p.x * CELL_WIDTH, area.min.y + p.y);
            if !area.contains(sp) {
                continue;
            }
            let mut style = cell_style(state);
            if hover == Some(p) {
                style = style.with_attrs(AttrMask::REVERSE);
            }
            let ch = match state {
                CellState::Start => 'S',
                CellState::End => 'E',
                _ => ' ',
            };
            screen.set(sp, Glyph::default().with_char(ch).with_style(style));
            screen.set(sp.shift(1, 0), Glyph::default().with_char(' ').with_style(style));
        }
    }

    fn draw_footer(&self, screen: &mut Screen) {
        let y = self.height - 1;
        if y < HEADER_ROWS {
            return;
        }
        if let Some(h) = self.session.hover() {
            screen.draw_text(Point::new(1, y), &format!("({},{})", h.x, h.y), Style::default().with_fg(HUD_FG));
        }
        screen.draw_text(Point::new(HELP_X, y), HELP, Style::default().with_fg(HUD_DIM));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn model() -> PathvizModel {
        let cfg = VisualizerConfig::default()
            .with_columns(20)
            .with_speed_ms(0)
            .with_max_steps_per_tick(1000);
        let mut m = PathvizModel::new(cfg).unwrap();
        // 40 cell columns, 20 cell rows: aspect 0.5.
        m.update(Msg::Screen {
            width: 80,
            height: 23,
            time: Instant::now(),
        });
        m
    }

    fn screen_pos(cell: Point) -> Point {
        Point::new(cell.x * CELL_WIDTH + 1, cell.y + HEADER_ROWS)
    }

    #[test]
    fn screen_message_fits_grid() {
        let m = model();
        assert_eq!(m.session().label(), "20 x 10");
    }

    #[test]
    fn keys_trigger_and_quit() {
        let mut m = model();
        assert!(m.update(Msg::key(Key::Char('3'))).is_none());
        assert_eq!(m.session().status(), Status::Running(Algorithm::AStar));
        for _ in 0..10 {
            m.update(Msg::Tick(Instant::now()));
        }
        assert_eq!(m.session().status(), Status::Done);
        assert!(matches!(m.update(Msg::key(Key::Char('q'))), Some(Effect::End)));
    }

    #[test]
    fn escape_cancels() {
        let cfg = VisualizerConfig::default().with_columns(20).with_speed_ms(500);
        let mut m = PathvizModel::new(cfg).unwrap();
        m.update(Msg::key(Key::Char('1')));
        m.update(Msg::Tick(Instant::now()));
        m.update(Msg::key(Key::Escape));
        assert_eq!(m.session().status(), Status::Cancelled);
        assert!(!m.session().is_running());
    }

    #[test]
    fn column_and_speed_keys() {
        let mut m = model();
        m.update(Msg::key(Key::Char('+')));
        assert_eq!(m.session().columns(), 22);
        m.update(Msg::key(Key::Char('-')));
        m.update(Msg::key(Key::Char('-')));
        assert_eq!(m.session().columns(), 18);
        m.update(Msg::key(Key::Char('[')));
        assert_eq!(m.session().speed_ms(), 10);
        m.update(Msg::key(Key::Char(']')));
        m.update(Msg::key(Key::Char(']')));
        assert_eq!(m.session().speed_ms(), 0);
    }

    #[test]
    fn mouse_paints_walls_in_grid_area() {
        let mut m = model();
        m.update(Msg::mouse(MouseAction::Main, screen_pos(Point::new(5, 5))));
        m.update(Msg::mouse(MouseAction::Drag, screen_pos(Point::new(6, 5))));
        m.update(Msg::mouse(MouseAction::Release, screen_pos(Point::new(6, 5))));
        let g = m.session().grid();
        assert!(g.is_wall(Point::new(5, 5)));
        assert!(g.is_wall(Point::new(6, 5)));
        assert_eq!(g.count(CellState::Wall), 2);

        // A press on the header does nothing.
        m.update(Msg::mouse(MouseAction::Main, Point::new(4, 0)));
        assert_eq!(m.session().grid().count(CellState::Wall), 2);
    }

    #[test]
    fn hover_shows_in_footer() {
        let mut m = model();
        m.update(Msg::mouse(MouseAction::Move, screen_pos(Point::new(3, 4))));
        assert_eq!(m.session().hover(), Some(Point::new(3, 4)));
        let mut screen = Screen::new(80, 23);
        m.draw(&mut screen);
        let footer: String = (0..80).map(|x| screen.at(Point::new(x, 22)).ch).collect();
        assert!(footer.contains("(3,4)"), "{footer}");
    }

    #[test]
    fn draw_places_markers() {
        let m = model();
        let mut screen = Screen::new(80, 23);
        m.draw(&mut screen);
        let start = m.session().grid().start();
        assert_eq!(screen.at(screen_pos(start).shift(-1, 0)).ch, 'S');
        let header: String = (0..80).map(|x| screen.at(Point::new(x, 0)).ch).collect();
        assert!(header.contains("Idle"), "{header}");
        assert!(header.contains("20 x 10"), "{header}");
    }
}
