//! Global configuration constants and the time stepper's options.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Nominal frame rate the stepper derives its timestep bounds from.
pub const DEFAULT_FPS: f64 = 60.0;

/// Number of raw frame deltas kept for the adaptive timestep.
pub const DELTA_HISTORY_LIMIT: usize = 60;

/// Length of the running-FPS measurement window (milliseconds).
pub const FPS_SAMPLE_WINDOW_MS: f64 = 1000.0;

/// Default constraint solver iterations handed to the host engine.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Default gravity (screen frame, Y down).
pub const DEFAULT_GRAVITY: [f64; 2] = [0.0, 9.8];

/// Options recognised by [`TimeStepper`](crate::stepper::TimeStepper).
///
/// Only `fps`, `delta_fixed` and `frame_budget_warning` drive the stepper; the
/// remaining fields are carried for the host engine, which reads them through
/// [`TimeStepper::config`](crate::stepper::TimeStepper::config).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    pub fps: f64,
    /// Use `1 / fps` every tick instead of the adaptive timestep.
    pub delta_fixed: bool,
    pub enable_collision_detection: bool,
    /// Constraint solver iterations.
    pub iteration: u32,
    pub enable_sleeping: bool,
    pub enable_cache: bool,
    pub gravity: DVec2,
    /// Log a warning when a tick's hooks take longer than `1000 / fps` ms.
    pub frame_budget_warning: bool,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            delta_fixed: true,
            enable_collision_detection: true,
            iteration: DEFAULT_SOLVER_ITERATIONS,
            enable_sleeping: false,
            enable_cache: true,
            gravity: DVec2::from_array(DEFAULT_GRAVITY),
            frame_budget_warning: true,
        }
    }
}

impl StepperConfig {
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_delta_fixed(mut self, delta_fixed: bool) -> Self {
        self.delta_fixed = delta_fixed;
        self
    }

    pub fn with_gravity(mut self, gravity: DVec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_frame_budget_warning(mut self, enabled: bool) -> Self {
        self.frame_budget_warning = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::NonPositiveFps(self.fps));
        }
        if self.iteration == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }

    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}
