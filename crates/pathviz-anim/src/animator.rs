//! The step-and-callback driver that paces a [`SearchRun`] and plays back
//! its path.

use std::time::{Duration, Instant};

use pathviz_core::{CellState, Context, Grid};
use pathviz_paths::{Algorithm, Path, SearchRun, StepResult, reconstruct};

use crate::error::Result;
use crate::metrics::{MetricsCollector, RunMetrics};
use crate::observer::RunObserver;

/// Reason passed to [`RunObserver::on_run_failed`] when the end is
/// unreachable.
pub const NO_PATH: &str = "No path";

// ---------------------------------------------------------------------------
// AnimatorConfig
// ---------------------------------------------------------------------------

/// Pacing of an [`Animator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimatorConfig {
    /// Pause between two units of work. Zero means as fast as possible.
    pub delay: Duration,
    /// Most units of work a single [`Animator::tick`] performs.
    pub max_steps_per_tick: usize,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(20),
            max_steps_per_tick: 256,
        }
    }
}

impl AnimatorConfig {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay in milliseconds, as the speed control expresses it.
    pub fn with_speed_ms(self, ms: u64) -> Self {
        self.with_delay(Duration::from_millis(ms))
    }

    pub fn with_max_steps_per_tick(mut self, n: usize) -> Self {
        self.max_steps_per_tick = n.max(1);
        self
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where an [`Animator`] stands after a unit of work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Exploring the grid.
    Searching,
    /// Stamping the found path one cell at a time.
    Tracing,
    /// The path has been fully played.
    Complete,
    /// The frontier ran dry.
    NoPath,
    /// The run was cancelled before it finished.
    Cancelled,
    /// The run stopped on an internal error.
    Failed,
}

impl Phase {
    /// Whether no more work will be done.
    #[inline]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Searching | Self::Tracing)
    }
}

enum Stage {
    Searching(SearchRun),
    Tracing { next: usize },
    Finished(Phase),
}

// ---------------------------------------------------------------------------
// Animator
// ---------------------------------------------------------------------------

/// Drives one search run from its first step to the last path cell.
///
/// Each call to [`advance`](Animator::advance) does one unit of work and
/// notifies a [`RunObserver`]. [`run_to_end`](Animator::run_to_end) and
/// [`tick`](Animator::tick) layer pacing on top of it.
pub struct Animator {
    algorithm: Algorithm,
    stage: Stage,
    path: Option<Path>,
    metrics: MetricsCollector,
    config: AnimatorConfig,
    ctx: Context,
    next_due: Option<Instant>,
}

impl Animator {
    /// Clear the previous run's marks from `grid` and start a new run.
    pub fn new(algorithm: Algorithm, grid: &mut Grid, config: AnimatorConfig) -> Self {
        grid.clear_transient();
        let run = SearchRun::new(algorithm, grid);
        log::debug!(
            "{algorithm} run started on {}x{} grid, delay {:?}",
            grid.width(),
            grid.height(),
            config.delay
        );
        Self {
            algorithm,
            stage: Stage::Searching(run),
            path: None,
            metrics: MetricsCollector::start(algorithm),
            config,
            ctx: Context::new(),
            next_due: None,
        }
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[inline]
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// The inter-step delay.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.config.delay
    }

    /// Change pacing mid-run.
    pub fn set_delay(&mut self, delay: Duration) {
        self.config.delay = delay;
    }

    /// A token that cancels this run. The run notices at its next unit of
    /// work.
    pub fn cancel_token(&self) -> Context {
        self.ctx.clone()
    }

    pub fn cancel(&self) {
        self.ctx.cancel();
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Searching(_) => Phase::Searching,
            Stage::Tracing { .. } => Phase::Tracing,
            Stage::Finished(p) => p,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase().is_finished()
    }

    pub fn metrics(&self) -> RunMetrics {
        self.metrics.metrics()
    }

    /// Explored share of `total_cells`, in percent.
    pub fn progress(&self, total_cells: usize) -> u8 {
        self.metrics.progress(total_cells)
    }

    /// The reconstructed path, once the end has been found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Do one unit of work: a search step or one path cell.
    pub fn advance<O: RunObserver>(&mut self, grid: &mut Grid, observer: &mut O) -> Result<Phase> {
        if let Stage::Finished(p) = self.stage {
            return Ok(p);
        }
        if self.ctx.is_done() {
            log::debug!(
                "{} run cancelled after {} cells",
                self.algorithm,
                self.metrics.explored()
            );
            self.stage = Stage::Finished(Phase::Cancelled);
            return Ok(Phase::Cancelled);
        }

        match &mut self.stage {
            Stage::Searching(run) => match run.step(grid) {
                StepResult::Continue(_) => {
                    self.metrics.record_step();
                    observer.on_step(grid, self.metrics.explored());
                    Ok(Phase::Searching)
                }
                StepResult::Found(end) => {
                    self.metrics.record_step();
                    let path = match reconstruct(run.predecessors(), run.start(), end) {
                        Ok(path) => path,
                        Err(e) => {
                            self.metrics.finish(None);
                            self.stage = Stage::Finished(Phase::Failed);
                            return Err(e.into());
                        }
                    };
                    self.metrics.finish(Some(path.len()));
                    log::debug!("{}", self.metrics.metrics());
                    observer.on_step(grid, self.metrics.explored());
                    self.path = Some(path);
                    self.stage = Stage::Tracing { next: 0 };
                    Ok(Phase::Tracing)
                }
                StepResult::Exhausted => {
                    self.metrics.finish(None);
                    let m = self.metrics.metrics();
                    log::debug!("{m}");
                    self.stage = Stage::Finished(Phase::NoPath);
                    observer.on_run_failed(&m, NO_PATH);
                    Ok(Phase::NoPath)
                }
            },
            Stage::Tracing { next } => {
                let cells = self.path.as_ref().map_or(&[][..], Path::cells);
                if let Some(&p) = cells.get(*next) {
                    grid.mark(p, CellState::Path);
                    *next += 1;
                    observer.on_path_step(p);
                }
                if *next < cells.len() {
                    return Ok(Phase::Tracing);
                }
                self.stage = Stage::Finished(Phase::Complete);
                observer.on_run_complete(&self.metrics.metrics());
                Ok(Phase::Complete)
            }
            Stage::Finished(p) => Ok(*p),
        }
    }

    /// Drive the run to its end, calling `sleep` with the configured delay
    /// between units of work.
    pub fn run_to_end<O, S>(&mut self, grid: &mut Grid, observer: &mut O, mut sleep: S) -> Result<Phase>
    where
        O: RunObserver,
        S: FnMut(Duration),
    {
        loop {
            let phase = self.advance(grid, observer)?;
            if phase.is_finished() {
                return Ok(phase);
            }
            if !self.config.delay.is_zero() {
                sleep(self.config.delay);
            }
        }
    }

    /// Do every unit of work due at `now`, at most
    /// [`max_steps_per_tick`](AnimatorConfig::max_steps_per_tick) of them.
    ///
    /// The first call does one unit immediately. A backlog larger than the
    /// cap is dropped rather than carried over.
    pub fn tick<O: RunObserver>(&mut self, now: Instant, grid: &mut Grid, observer: &mut O) -> Result<Phase> {
        if self.ctx.is_done() || self.is_finished() {
            return self.advance(grid, observer);
        }
        let cap = self.config.max_steps_per_tick.max(1);
        let mut steps = 0;
        while steps < cap {
            let due = *self.next_due.get_or_insert(now);
            if due > now {
                return Ok(self.phase());
            }
            let phase = self.advance(grid, observer)?;
            steps += 1;
            self.next_due = Some(due + self.config.delay);
            if phase.is_finished() {
                return Ok(phase);
            }
        }
        if self.next_due.is_some_and(|due| due <= now) {
            self.next_due = Some(now + self.config.delay);
        }
        Ok(self.phase())
    }
}
