use pathviz_core::{Grid, Point};

use crate::metrics::RunMetrics;

/// Callbacks fired by an [`Animator`](crate::Animator) as a run unfolds.
///
/// Every method defaults to a no-op. Callbacks run synchronously and the
/// next step never starts before the previous callback returned.
pub trait RunObserver {
    /// A cell was expanded. `explored` counts expanded cells so far.
    fn on_step(&mut self, _grid: &Grid, _explored: usize) {}

    /// `p` was stamped as part of the path.
    fn on_path_step(&mut self, _p: Point) {}

    /// The path has been fully played.
    fn on_run_complete(&mut self, _metrics: &RunMetrics) {}

    /// The search ended without reaching the end cell.
    fn on_run_failed(&mut self, _metrics: &RunMetrics, _reason: &str) {}
}

/// Ignores everything.
impl RunObserver for () {}

impl<T: RunObserver + ?Sized> RunObserver for &mut T {
    fn on_step(&mut self, grid: &Grid, explored: usize) {
        (**self).on_step(grid, explored);
    }

    fn on_path_step(&mut self, p: Point) {
        (**self).on_path_step(p);
    }

    fn on_run_complete(&mut self, metrics: &RunMetrics) {
        (**self).on_run_complete(metrics);
    }

    fn on_run_failed(&mut self, metrics: &RunMetrics, reason: &str) {
        (**self).on_run_failed(metrics, reason);
    }
}
