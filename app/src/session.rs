//! The editing and run-control surface between input and the engine.
//!
//! A [`Session`] owns the grid and at most one active [`Animator`]. While a
//! run is active every edit and trigger is refused with
//! [`Error::InvalidMutation`]; resizing, resetting and cancelling stop the
//! run instead.

use std::fmt;
use std::time::{Duration, Instant};

use pathviz_anim::{Animator, Phase, RunMetrics, RunObserver, progress_percent};
use pathviz_core::{CellState, Error, Grid, Point, Result};
use pathviz_paths::Algorithm;

use crate::config::VisualizerConfig;

/// What the status line shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Running(Algorithm),
    Done,
    NoPath,
    Cancelled,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Running(alg) => write!(f, "{alg} running\u{2026}"),
            Self::Done => f.write_str("Done"),
            Self::NoPath => f.write_str("No path"),
            Self::Cancelled => f.write_str("Cancelled"),
            Self::Failed => f.write_str("Failed"),
        }
    }
}

/// Pointer gesture in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Drag {
    #[default]
    None,
    /// Dragging the start marker.
    Start,
    /// Dragging the end marker.
    End,
    /// Painting walls.
    Paint,
}

pub struct Session {
    config: VisualizerConfig,
    grid: Grid,
    columns: i32,
    aspect: f64,
    speed_ms: u64,
    animator: Option<Animator>,
    metrics: Option<RunMetrics>,
    status: Status,
    drag: Drag,
    hover: Option<Point>,
    /// A finished run left marks on the grid.
    stale_marks: bool,
}

impl Session {
    pub fn new(config: VisualizerConfig) -> Result<Self> {
        let columns = config.clamp_columns(config.columns);
        let grid = Grid::new(columns, config.fallback_aspect)?;
        Ok(Self {
            config,
            grid,
            columns,
            aspect: config.fallback_aspect,
            speed_ms: config.clamp_speed(config.speed_ms),
            animator: None,
            metrics: None,
            status: Status::Idle,
            drag: Drag::None,
            hover: None,
            stale_marks: false,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.animator.is_some()
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Metrics of the last finished run.
    #[inline]
    pub fn metrics(&self) -> Option<&RunMetrics> {
        self.metrics.as_ref()
    }

    /// Cells explored by the active run, or by the last finished one.
    pub fn explored(&self) -> usize {
        match (&self.animator, &self.metrics) {
            (Some(a), _) => a.metrics().explored,
            (None, Some(m)) => m.explored,
            (None, None) => 0,
        }
    }

    /// Explored share of the grid, in percent.
    pub fn progress(&self) -> u8 {
        match &self.animator {
            Some(a) => a.progress(self.grid.len()),
            None if self.metrics.is_some() => progress_percent(self.explored(), self.grid.len()),
            None => 0,
        }
    }

    #[inline]
    pub fn columns(&self) -> i32 {
        self.columns
    }

    #[inline]
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    #[inline]
    pub fn drag(&self) -> Drag {
        self.drag
    }

    #[inline]
    pub fn hover(&self) -> Option<Point> {
        self.hover
    }

    /// Grid dimensions as `COLS x ROWS`.
    pub fn label(&self) -> String {
        format!("{} x {}", self.grid.width(), self.grid.height())
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Refuse edits during a run, and drop a finished run's marks before
    /// the first edit after it.
    fn begin_edit(&mut self, what: &str) -> Result<()> {
        if self.is_running() {
            log::debug!("{what} rejected: run in progress");
            return Err(Error::InvalidMutation);
        }
        if self.stale_marks {
            self.grid.clear_transient();
            self.stale_marks = false;
        }
        Ok(())
    }

    /// `Empty → Wall` at `p`.
    pub fn paint_wall(&mut self, p: Point) -> Result<bool> {
        self.begin_edit("paint_wall")?;
        Ok(self.grid.paint_wall(p))
    }

    /// `Empty ⇄ Wall` at `p`.
    pub fn toggle_wall(&mut self, p: Point) -> Result<bool> {
        self.begin_edit("toggle_wall")?;
        Ok(self.grid.toggle_wall(p))
    }

    pub fn move_start(&mut self, p: Point) -> Result<()> {
        self.begin_edit("move_start")?;
        self.grid.move_start(p)
    }

    pub fn move_end(&mut self, p: Point) -> Result<()> {
        self.begin_edit("move_end")?;
        self.grid.move_end(p)
    }

    pub fn clear_walls(&mut self) -> Result<()> {
        self.begin_edit("clear_walls")?;
        self.grid.clear_walls();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// Primary button pressed on `p`: grab a marker, or toggle a wall and
    /// start painting.
    pub fn pointer_down(&mut self, p: Point) -> Result<()> {
        self.begin_edit("pointer_down")?;
        let p = self.grid.clamp(p);
        self.drag = match self.grid.state(p) {
            Some(CellState::Start) => Drag::Start,
            Some(CellState::End) => Drag::End,
            _ => {
                self.grid.toggle_wall(p);
                Drag::Paint
            }
        };
        Ok(())
    }

    /// Pointer moved to `p` with the button held.
    pub fn pointer_drag(&mut self, p: Point) -> Result<()> {
        if self.drag == Drag::None {
            return Ok(());
        }
        self.begin_edit("pointer_drag")?;
        let p = self.grid.clamp(p);
        match self.drag {
            Drag::Start if p != self.grid.start() => self.grid.move_start(p),
            Drag::End if p != self.grid.end() => self.grid.move_end(p),
            Drag::Paint => {
                self.grid.paint_wall(p);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = Drag::None;
    }

    /// Track the cell under the pointer. Positions outside the grid clear
    /// it.
    pub fn set_hover(&mut self, p: Option<Point>) {
        self.hover = p.filter(|&p| self.grid.contains(p));
    }

    // -----------------------------------------------------------------------
    // Layout and pacing
    // -----------------------------------------------------------------------

    /// Rebuild the grid with `columns` (clamped to the configured bounds).
    /// Cancels an active run.
    pub fn set_columns(&mut self, columns: i32) -> Result<()> {
        self.cancel();
        let columns = self.config.clamp_columns(columns);
        self.grid.resize(columns, self.aspect)?;
        self.columns = columns;
        self.after_rebuild();
        Ok(())
    }

    /// Fit the grid's aspect ratio to a `width`×`height` viewport, in
    /// cells. Cancels an active run. On error the grid is unchanged, and a
    /// viewport with no area leaves the active run going.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let aspect = f64::from(height) / f64::from(width);
        if width < 1 || height < 1 {
            log::warn!("resize to {width}x{height} ignored: surface has no area");
            return Err(Error::DegenerateGrid {
                columns: self.columns,
                aspect,
            });
        }
        self.cancel();
        if let Err(e) = self.grid.resize(self.columns, aspect) {
            log::warn!("resize to {width}x{height} ignored: {e}");
            return Err(e);
        }
        self.aspect = aspect;
        self.after_rebuild();
        Ok(())
    }

    /// Rebuild an empty grid at the current size. Cancels an active run.
    pub fn reset_all(&mut self) -> Result<()> {
        self.cancel();
        self.grid.resize(self.columns, self.aspect)?;
        self.after_rebuild();
        Ok(())
    }

    fn after_rebuild(&mut self) {
        self.metrics = None;
        self.status = Status::Idle;
        self.drag = Drag::None;
        self.stale_marks = false;
        self.hover = self.hover.filter(|&p| self.grid.contains(p));
        log::debug!("grid rebuilt: {}", self.label());
    }

    /// Set the delay between animation steps, clamped to the configured
    /// maximum. Applies to the active run too.
    pub fn set_speed(&mut self, ms: u64) {
        self.speed_ms = self.config.clamp_speed(ms);
        if let Some(a) = &mut self.animator {
            a.set_delay(Duration::from_millis(self.speed_ms));
        }
    }

    // -----------------------------------------------------------------------
    // Runs
    // -----------------------------------------------------------------------

    /// Start a run of `algorithm`.
    pub fn trigger(&mut self, algorithm: Algorithm) -> Result<()> {
        self.begin_edit("trigger")?;
        let animator = Animator::new(
            algorithm,
            &mut self.grid,
            self.config.animator(self.speed_ms),
        );
        self.animator = Some(animator);
        self.metrics = None;
        self.status = Status::Running(algorithm);
        self.drag = Drag::None;
        Ok(())
    }

    /// Stop the active run. Marks drawn so far stay until the next edit.
    pub fn cancel(&mut self) {
        let Some(animator) = self.animator.take() else {
            return;
        };
        animator.cancel();
        self.status = Status::Cancelled;
        self.stale_marks = true;
    }

    /// Advance the active run by whatever is due at `now`.
    ///
    /// Returns the run's phase, or `None` when no run is active.
    pub fn tick<O: RunObserver>(
        &mut self,
        now: Instant,
        observer: &mut O,
    ) -> pathviz_anim::Result<Option<Phase>> {
        let Some(animator) = &mut self.animator else {
            return Ok(None);
        };
        let result = animator.tick(now, &mut self.grid, observer);
        self.settle(result).map(Some)
    }

    /// Play the active run to its end, calling `sleep` between steps.
    pub fn run_to_end<O, S>(
        &mut self,
        observer: &mut O,
        sleep: S,
    ) -> pathviz_anim::Result<Option<Phase>>
    where
        O: RunObserver,
        S: FnMut(Duration),
    {
        let Some(animator) = &mut self.animator else {
            return Ok(None);
        };
        let result = animator.run_to_end(&mut self.grid, observer, sleep);
        self.settle(result).map(Some)
    }

    /// Record the outcome of a finished run and release its animator.
    fn settle(&mut self, result: pathviz_anim::Result<Phase>) -> pathviz_anim::Result<Phase> {
        let phase = match result {
            Ok(phase) if !phase.is_finished() => return Ok(phase),
            Ok(phase) => phase,
            Err(e) => {
                log::error!("run aborted: {e}");
                self.animator = None;
                self.status = Status::Failed;
                self.stale_marks = true;
                return Err(e);
            }
        };
        if let Some(animator) = self.animator.take() {
            self.metrics = Some(animator.metrics());
        }
        self.status = match phase {
            Phase::Complete => Status::Done,
            Phase::NoPath => Status::NoPath,
            Phase::Cancelled => Status::Cancelled,
            Phase::Failed | Phase::Searching | Phase::Tracing => Status::Failed,
        };
        self.stale_marks = true;
        Ok(phase)
    }
}
