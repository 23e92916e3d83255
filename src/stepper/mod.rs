//! Frame-driven simulation loop.
//!
//! The [`TimeStepper`] turns irregular "frame available" signals into a
//! stable timestep and a fixed sequence of lifecycle calls on the host engine:
//!
//! `tick_start → before_update → update(dt, t) → after_update →
//! before_render → render(dt) → after_render → tick_end`
//!
//! The next frame is only requested once a tick has fully completed, so ticks
//! never overlap.

pub mod delta;
pub mod frames;

pub use delta::DeltaHistory;
pub use frames::{FrameHandle, FrameScheduler, ManualFrames};

use log::debug;

use crate::{
    config::{StepperConfig, DELTA_HISTORY_LIMIT, FPS_SAMPLE_WINDOW_MS},
    error::ConfigError,
    utils::logging::{warn_if_frame_budget_exceeded, TickTimer},
};

/// Host engine driven by the stepper.
///
/// Lifecycle hooks default to no-ops; `update` and `render` are required and
/// their errors abort the current tick.
pub trait Stepper {
    type Error;

    fn tick_start(&mut self) {}

    fn tick_end(&mut self) {}

    fn before_update(&mut self) {}

    fn after_update(&mut self) {}

    fn before_render(&mut self) {}

    fn after_render(&mut self) {}

    fn start(&mut self) {}

    fn pause(&mut self) {}

    /// Advances the simulation by `dt` seconds; `timestamp` is the frame time in ms.
    fn update(&mut self, dt: f64, timestamp: f64) -> Result<(), Self::Error>;

    fn render(&mut self, dt: f64) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperState {
    Stopped,
    Running,
}

/// Self-stabilising variable-timestep scheduler.
pub struct TimeStepper<S: Stepper, F: FrameScheduler = ManualFrames> {
    engine: S,
    frames: F,
    config: StepperConfig,
    state: StepperState,
    pending: Option<FrameHandle>,

    dt: f64,
    dt_min: f64,
    dt_max: f64,
    prev_time: f64,
    deltas: DeltaHistory,

    measured_fps: f64,
    frame_counter: u32,
    frame_stamp: f64,
    frame_total: u64,
    frame_limit: Option<u64>,
}

impl<S: Stepper, F: FrameScheduler> TimeStepper<S, F> {
    pub fn new(engine: S, frames: F, config: StepperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dt = 1.0 / config.fps;
        Ok(Self {
            engine,
            frames,
            config,
            state: StepperState::Stopped,
            pending: None,
            dt,
            dt_min: dt,
            dt_max: dt * 2.0,
            prev_time: 0.0,
            deltas: DeltaHistory::new(DELTA_HISTORY_LIMIT),
            measured_fps: config.fps,
            frame_counter: 0,
            frame_stamp: 0.0,
            frame_total: 0,
            frame_limit: None,
        })
    }

    /// Starts the loop and runs the first tick immediately (timestamp `0`).
    /// The frame clock restarts from that tick, so a restart after `pause`
    /// never sees a negative frame delta.
    ///
    /// A positive `frame_limit` pauses the stepper after that many ticks.
    /// Calling this while running does nothing.
    pub fn start(&mut self, frame_limit: Option<u64>) -> Result<(), S::Error> {
        if self.is_running() {
            debug!("time stepper already running");
            return Ok(());
        }
        if let Some(limit) = frame_limit.filter(|&limit| limit > 0) {
            self.frame_limit = Some(limit);
        }

        self.state = StepperState::Running;
        // The start tick is stamped 0, so the clocks restart with it.
        self.prev_time = 0.0;
        self.frame_stamp = 0.0;
        self.frame_counter = 0;
        debug!(
            "time stepper started (fps {}, delta_fixed {}, frame limit {:?})",
            self.config.fps, self.config.delta_fixed, self.frame_limit
        );
        self.engine.start();
        self.tick(0.0)
    }

    /// Stops the loop and withdraws any pending frame. Calling this while
    /// stopped does nothing.
    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }

        self.state = StepperState::Stopped;
        self.frame_total = 0;
        self.engine.pause();
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
        debug!("time stepper paused");
    }

    /// Runs one full lifecycle sequence for the frame at `timestamp` (ms).
    ///
    /// Errors from `update`/`render` propagate immediately; the remaining hooks
    /// are skipped and no further frame is requested.
    pub fn tick(&mut self, timestamp: f64) -> Result<(), S::Error> {
        self.pending = None;

        let raw = (timestamp - self.prev_time) / 1000.0;
        self.prev_time = timestamp;
        if !self.config.delta_fixed {
            let raw = if raw <= 0.0 || !raw.is_finite() { self.dt } else { raw };
            self.deltas.push(raw);
            self.dt = self.deltas.stabilised(self.dt_min, self.dt_max);
        }

        self.frame_counter += 1;
        let window = timestamp - self.frame_stamp;
        if window >= FPS_SAMPLE_WINDOW_MS {
            self.measured_fps = f64::from(self.frame_counter) / (window / 1000.0);
            self.frame_stamp = timestamp;
            self.frame_counter = 0;
        }

        let mut timer = TickTimer::start("stepper::tick");
        self.engine.tick_start();

        self.engine.before_update();
        self.engine.update(self.dt, timestamp)?;
        self.engine.after_update();
        timer.lap("update");

        self.engine.before_render();
        self.engine.render(self.dt)?;
        self.engine.after_render();
        timer.lap("render");

        self.engine.tick_end();
        if self.config.frame_budget_warning {
            warn_if_frame_budget_exceeded(timer.elapsed(), 1000.0 / self.config.fps);
        }
        drop(timer);

        self.frame_total += 1;
        if let Some(limit) = self.frame_limit {
            if self.frame_total >= limit {
                debug!("time stepper reached its frame limit ({limit})");
                self.pause();
                return Ok(());
            }
        }

        if self.is_running() {
            self.pending = Some(self.frames.request_frame());
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state == StepperState::Running
    }

    pub fn state(&self) -> StepperState {
        self.state
    }

    /// Timestep (seconds) handed to the last `update`/`render`.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn dt_min(&self) -> f64 {
        self.dt_min
    }

    pub fn dt_max(&self) -> f64 {
        self.dt_max
    }

    /// Frame rate measured over the last complete one-second window.
    pub fn measured_fps(&self) -> f64 {
        self.measured_fps
    }

    /// Ticks run since the last start; reset by [`TimeStepper::pause`].
    pub fn frame_total(&self) -> u64 {
        self.frame_total
    }

    pub fn frame_limit(&self) -> Option<u64> {
        self.frame_limit
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    pub fn engine(&self) -> &S {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut S {
        &mut self.engine
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }
}

impl<S: Stepper> TimeStepper<S, ManualFrames> {
    /// Fires the pending frame at `timestamp`. Returns `false` when no frame
    /// was pending (stopped, or the limit was reached).
    pub fn advance(&mut self, timestamp: f64) -> Result<bool, S::Error> {
        match self.frames.take() {
            Some(_) => {
                self.tick(timestamp)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Counter {
        updates: u32,
        renders: u32,
        dts: Vec<f64>,
    }

    impl Stepper for Counter {
        type Error = Infallible;

        fn update(&mut self, dt: f64, _timestamp: f64) -> Result<(), Infallible> {
            self.updates += 1;
            self.dts.push(dt);
            Ok(())
        }

        fn render(&mut self, _dt: f64) -> Result<(), Infallible> {
            self.renders += 1;
            Ok(())
        }
    }

    fn stepper(config: StepperConfig) -> TimeStepper<Counter> {
        TimeStepper::new(Counter::default(), ManualFrames::new(), config).unwrap()
    }

    #[test]
    fn rejects_non_positive_fps() {
        let result = TimeStepper::new(
            Counter::default(),
            ManualFrames::new(),
            StepperConfig::default().with_fps(-1.0),
        );
        assert!(matches!(result, Err(ConfigError::NonPositiveFps(_))));
    }

    #[test]
    fn start_ticks_immediately_and_arms_next_frame() {
        let mut stepper = stepper(StepperConfig::default());
        stepper.start(None).unwrap();
        assert!(stepper.is_running());
        assert_eq!(stepper.engine().updates, 1);
        assert_eq!(stepper.engine().renders, 1);
        assert!(stepper.frames().is_pending());
        assert_eq!(stepper.pending_frame(), stepper.frames().pending());
    }

    #[test]
    fn fixed_mode_keeps_nominal_dt() {
        let mut stepper = stepper(StepperConfig::default().with_fps(50.0));
        stepper.start(None).unwrap();
        for t in [40.0, 45.0, 400.0] {
            assert!(stepper.advance(t).unwrap());
        }
        assert!(stepper.engine().dts.iter().all(|&dt| dt == 0.02));
    }

    #[test]
    fn stopped_stepper_does_not_advance() {
        let mut stepper = stepper(StepperConfig::default());
        assert!(!stepper.advance(16.0).unwrap());
        assert_eq!(stepper.engine().updates, 0);
    }

    #[test]
    fn dt_saturates_at_max_after_sustained_stall() {
        let mut stepper = stepper(StepperConfig::default().with_delta_fixed(false));
        stepper.start(None).unwrap();
        let mut t = 0.0;
        for _ in 0..DELTA_HISTORY_LIMIT {
            t += 100.0;
            stepper.advance(t).unwrap();
        }
        assert!((stepper.dt() - 2.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn measures_fps_over_one_second_windows() {
        let mut stepper = stepper(StepperConfig::default());
        stepper.start(None).unwrap();
        assert_eq!(stepper.measured_fps(), 60.0);
        for i in 1..=40 {
            stepper.advance(f64::from(i) * 25.0).unwrap();
        }
        // 41 ticks (including the start tick at t = 0) over exactly one second.
        assert!((stepper.measured_fps() - 41.0).abs() < 1e-9);
    }
}
