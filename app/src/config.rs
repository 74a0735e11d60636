//! Start-up configuration.

use std::time::Duration;

use pathviz_anim::AnimatorConfig;

/// Settings for a [`Session`](crate::Session).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualizerConfig {
    /// Initial number of grid columns.
    pub columns: i32,
    /// Smallest column count the `-` key reaches.
    pub min_columns: i32,
    /// Largest column count the `+` key reaches.
    pub max_columns: i32,
    /// Columns added or removed per key press.
    pub column_step: i32,
    /// Initial delay between animation steps, in milliseconds.
    pub speed_ms: u64,
    /// Largest selectable delay, in milliseconds.
    pub max_speed_ms: u64,
    /// Delay change per key press, in milliseconds.
    pub speed_step_ms: u64,
    /// Aspect ratio (height / width) used until the viewport size is known.
    pub fallback_aspect: f64,
    /// Most animation steps per event loop iteration.
    pub max_steps_per_tick: usize,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            columns: 40,
            min_columns: 10,
            max_columns: 120,
            column_step: 2,
            speed_ms: 20,
            max_speed_ms: 500,
            speed_step_ms: 10,
            fallback_aspect: 0.5,
            max_steps_per_tick: 256,
        }
    }
}

impl VisualizerConfig {
    pub fn with_columns(mut self, columns: i32) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_column_bounds(mut self, min: i32, max: i32) -> Self {
        self.min_columns = min;
        self.max_columns = max;
        self
    }

    pub fn with_speed_ms(mut self, ms: u64) -> Self {
        self.speed_ms = ms;
        self
    }

    pub fn with_fallback_aspect(mut self, aspect: f64) -> Self {
        self.fallback_aspect = aspect;
        self
    }

    pub fn with_max_steps_per_tick(mut self, n: usize) -> Self {
        self.max_steps_per_tick = n;
        self
    }

    /// Clamp `columns` into the configured bounds.
    pub fn clamp_columns(&self, columns: i32) -> i32 {
        columns.clamp(self.min_columns, self.max_columns.max(self.min_columns))
    }

    /// Clamp `ms` into `0..=max_speed_ms`.
    pub fn clamp_speed(&self, ms: u64) -> u64 {
        ms.min(self.max_speed_ms)
    }

    /// Animator pacing for a delay of `speed_ms`.
    pub fn animator(&self, speed_ms: u64) -> AnimatorConfig {
        AnimatorConfig::default()
            .with_delay(Duration::from_millis(speed_ms))
            .with_max_steps_per_tick(self.max_steps_per_tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps() {
        let c = VisualizerConfig::default().with_column_bounds(10, 60);
        assert_eq!(c.clamp_columns(4), 10);
        assert_eq!(c.clamp_columns(61), 60);
        assert_eq!(c.clamp_columns(30), 30);
        assert_eq!(c.clamp_speed(9000), 500);
    }

    #[test]
    fn animator_pacing() {
        let a = VisualizerConfig::default()
            .with_max_steps_per_tick(8)
            .animator(35);
        assert_eq!(a.delay, Duration::from_millis(35));
        assert_eq!(a.max_steps_per_tick, 8);
    }
}
