/// FrameTimer - fixed-step accumulator and variable-step cap.
///
/// Pure scheduling state driven by the host's `run(timestamp_ms)` ticks:
/// - fixed step: elapsed wall time feeds an accumulator; one fixed update
///   runs per whole step in it, the remainder carries over to the next tick
/// - variable step: runs at most once per tick, and only once at least one
///   frame interval has passed since it last ran
///
/// The first tick only sets the time baseline (no fixed steps) and always
/// runs the variable step.

use crate::config::EngineConfig;

/// Tolerance absorbing float error in millisecond arithmetic
const EPSILON_MS: f64 = 1e-6;

/// What one tick must execute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Fixed updates to run, in order
    pub fixed_steps: u32,
    /// Whether the variable update (+ render) runs
    pub run_variable: bool,
    /// Time since the previous variable update (ms); 0 on the first tick
    pub variable_dt_ms: f64,
}

#[derive(Debug, Clone)]
pub struct FrameTimer {
    fixed_step_ms: f64,
    frame_interval_ms: f64,
    max_delta_ms: f64,
    accumulator_ms: f64,
    last_timestamp_ms: Option<f64>,
    last_variable_ms: f64,
}

impl FrameTimer {
    pub fn new(fixed_step_ms: f64, frame_interval_ms: f64, max_delta_ms: f64) -> Self {
        Self {
            fixed_step_ms,
            frame_interval_ms,
            max_delta_ms,
            accumulator_ms: 0.0,
            last_timestamp_ms: None,
            last_variable_ms: 0.0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.fixed_step_ms(), config.frame_interval_ms(), config.max_frame_delta_ms)
    }

    /// Advance to `timestamp_ms` and report what is due
    ///
    /// Timestamps going backwards count as zero elapsed time.
    pub fn advance(&mut self, timestamp_ms: f64) -> Tick {
        let Some(last) = self.last_timestamp_ms else {
            self.last_timestamp_ms = Some(timestamp_ms);
            self.last_variable_ms = timestamp_ms;
            return Tick { fixed_steps: 0, run_variable: true, variable_dt_ms: 0.0 };
        };

        let delta = (timestamp_ms - last).clamp(0.0, self.max_delta_ms);
        self.last_timestamp_ms = Some(timestamp_ms);

        self.accumulator_ms += delta;
        let mut fixed_steps = 0;
        while self.accumulator_ms + EPSILON_MS >= self.fixed_step_ms {
            self.accumulator_ms -= self.fixed_step_ms;
            fixed_steps += 1;
        }
        self.accumulator_ms = self.accumulator_ms.max(0.0);

        let since_variable = timestamp_ms - self.last_variable_ms;
        if since_variable + EPSILON_MS >= self.frame_interval_ms {
            self.last_variable_ms = timestamp_ms;
            Tick {
                fixed_steps,
                run_variable: true,
                variable_dt_ms: since_variable.min(self.max_delta_ms),
            }
        } else {
            Tick { fixed_steps, run_variable: false, variable_dt_ms: 0.0 }
        }
    }

    /// Unconsumed fixed-step time (ms)
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    pub fn fixed_step_ms(&self) -> f64 {
        self.fixed_step_ms
    }

    /// Forget the baseline; the next tick starts over
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
        self.last_timestamp_ms = None;
    }
}

#[cfg(test)]
#[path = "frame_timer_tests.rs"]
mod tests;
