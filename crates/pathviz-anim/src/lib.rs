//! Paced playback of pathviz searches.
//!
//! An [`Animator`] owns one [`SearchRun`](pathviz_paths::SearchRun), steps
//! it one cell at a time, then stamps the reconstructed path cell by cell,
//! reporting each unit of work to a [`RunObserver`]. A
//! [`MetricsCollector`] keeps the run's [`RunMetrics`].
//!
//! Two drivers are provided: the blocking
//! [`run_to_end`](Animator::run_to_end), which sleeps between units of
//! work, and the non-blocking [`tick`](Animator::tick) for event loops.
//! Either can be stopped through the token from
//! [`cancel_token`](Animator::cancel_token).

mod animator;
mod error;
mod metrics;
mod observer;

pub use animator::{Animator, AnimatorConfig, NO_PATH, Phase};
pub use error::{Error, Result};
pub use metrics::{MetricsCollector, RunMetrics, progress_percent};
pub use observer::RunObserver;
