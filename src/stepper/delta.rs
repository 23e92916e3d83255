use std::collections::VecDeque;

use crate::utils::math::clamp;

/// Rolling window of raw frame deltas (seconds).
///
/// The effective timestep is the smallest recent delta clamped into
/// `[min, max]`: one long frame never drags the simulation forward, and a
/// sustained stall still cannot push it past `max`.
#[derive(Debug, Clone)]
pub struct DeltaHistory {
    samples: VecDeque<f64>,
    limit: usize,
}

impl DeltaHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(limit),
            limit: limit.max(1),
        }
    }

    /// Records `raw`, dropping the oldest samples beyond the limit.
    pub fn push(&mut self, raw: f64) {
        self.samples.push_back(raw);
        while self.samples.len() > self.limit {
            self.samples.pop_front();
        }
    }

    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    /// `clamp(min(history), min, max)`, or `min` when nothing has been recorded.
    pub fn stabilised(&self, min: f64, max: f64) -> f64 {
        clamp(self.min().unwrap_or(min), min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_drops_oldest() {
        let mut history = DeltaHistory::new(3);
        for raw in [0.5, 0.1, 0.2, 0.3] {
            history.push(raw);
        }
        assert_eq!(history.samples.len(), 3);
        assert_eq!(history.min(), Some(0.1));
        history.push(0.4);
        assert_eq!(history.min(), Some(0.2));
    }

    #[test]
    fn stabilised_clamps_minimum() {
        let mut history = DeltaHistory::new(60);
        history.push(0.5);
        assert_eq!(history.stabilised(0.01, 0.02), 0.02);
        history.push(0.001);
        assert_eq!(history.stabilised(0.01, 0.02), 0.01);
    }
}
