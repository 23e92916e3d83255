use log::{log_enabled, trace, warn, Level};
use std::time::{Duration, Instant};

/// Times one stepper tick and the phases inside it.
///
/// Phase laps are only recorded when trace logging is on; the summary is
/// emitted when the timer is dropped.
pub struct TickTimer {
    label: &'static str,
    start: Instant,
    last_lap: Instant,
    laps: Vec<(&'static str, Duration)>,
}

impl TickTimer {
    pub fn start(label: &'static str) -> Self {
        let now = Instant::now();
        Self {
            label,
            start: now,
            last_lap: now,
            laps: Vec::new(),
        }
    }

    /// Closes the current phase under `phase`.
    pub fn lap(&mut self, phase: &'static str) {
        if log_enabled!(Level::Trace) {
            let now = Instant::now();
            self.laps.push((phase, now - self.last_lap));
            self.last_lap = now;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let phases = self
                .laps
                .iter()
                .map(|(phase, took)| format!("{phase} {} µs", took.as_micros()))
                .collect::<Vec<_>>()
                .join(", ");
            trace!("{} took {} µs [{phases}]", self.label, self.elapsed().as_micros());
        }
    }
}

/// Logs a warning when a tick overran `budget_ms`. Returns whether it did.
pub fn warn_if_frame_budget_exceeded(duration: Duration, budget_ms: f64) -> bool {
    let elapsed_ms = duration.as_secs_f64() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("Tick exceeded frame budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_check_reports_overrun_only() {
        assert!(warn_if_frame_budget_exceeded(Duration::from_millis(20), 16.6));
        assert!(!warn_if_frame_budget_exceeded(Duration::from_millis(5), 16.6));
    }

    #[test]
    fn laps_are_skipped_without_trace_logging() {
        let mut timer = TickTimer::start("test");
        timer.lap("update");
        assert!(timer.laps.len() <= 1);
        assert!(timer.elapsed() >= Duration::ZERO);
    }
}
