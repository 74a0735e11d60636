use std::fmt;
use std::time::{Duration, Instant};

use pathviz_paths::Algorithm;

/// Statistics of one run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunMetrics {
    pub algorithm: Algorithm,
    /// Cells popped from the frontier.
    pub explored: usize,
    /// Cells on the path, start excluded. `None` when no path was found.
    pub path_len: Option<usize>,
    /// Time from run start to search termination.
    pub elapsed: Duration,
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} explored, ", self.algorithm, self.explored)?;
        match self.path_len {
            Some(n) => write!(f, "path {n}")?,
            None => f.write_str("no path")?,
        }
        write!(f, ", {:.1} ms", self.elapsed.as_secs_f64() * 1000.0)
    }
}

/// `explored` as a rounded percentage of `total_cells`, at most 100.
///
/// An empty grid reports 0.
pub fn progress_percent(explored: usize, total_cells: usize) -> u8 {
    if total_cells == 0 {
        return 0;
    }
    let pct = (explored as f64 / total_cells as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// Accumulates [`RunMetrics`] while a run is in progress.
#[derive(Clone, Debug)]
pub struct MetricsCollector {
    algorithm: Algorithm,
    started: Instant,
    explored: usize,
    path_len: Option<usize>,
    elapsed: Option<Duration>,
}

impl MetricsCollector {
    /// Start timing a run now.
    pub fn start(algorithm: Algorithm) -> Self {
        Self::start_at(algorithm, Instant::now())
    }

    pub fn start_at(algorithm: Algorithm, started: Instant) -> Self {
        Self {
            algorithm,
            started,
            explored: 0,
            path_len: None,
            elapsed: None,
        }
    }

    /// Count one popped cell.
    #[inline]
    pub fn record_step(&mut self) {
        self.explored += 1;
    }

    /// Stamp the end of the search. Only the first call counts.
    pub fn finish(&mut self, path_len: Option<usize>) {
        self.finish_at(Instant::now(), path_len);
    }

    pub fn finish_at(&mut self, now: Instant, path_len: Option<usize>) {
        if self.elapsed.is_some() {
            return;
        }
        self.elapsed = Some(now.saturating_duration_since(self.started));
        self.path_len = path_len;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed.is_some()
    }

    #[inline]
    pub fn explored(&self) -> usize {
        self.explored
    }

    /// Snapshot. Before [`finish`](Self::finish) the elapsed time is the
    /// time so far.
    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            algorithm: self.algorithm,
            explored: self.explored,
            path_len: self.path_len,
            elapsed: self.elapsed.unwrap_or_else(|| self.started.elapsed()),
        }
    }

    /// Explored cells as a rounded percentage of `total_cells`, at most 100.
    pub fn progress(&self, total_cells: usize) -> u8 {
        progress_percent(self.explored, total_cells)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn run_metrics_json() {
        let m = RunMetrics {
            algorithm: Algorithm::AStar,
            explored: 42,
            path_len: None,
            elapsed: Duration::from_millis(3),
        };
        let json = serde_json::to_string(&m).unwrap();
        let back: RunMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
