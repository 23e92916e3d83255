use serde::{Deserialize, Serialize};

/// Handle for a requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

/// Platform capability that delivers "next frame" signals to the stepper.
///
/// A browser host maps this onto `requestAnimationFrame`/`cancelAnimationFrame`;
/// a native host onto its event loop's redraw request.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Synchronous scheduler that holds at most one pending frame until the host
/// fires it through [`TimeStepper::advance`](super::TimeStepper::advance).
#[derive(Debug, Default, Clone)]
pub struct ManualFrames {
    next: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes the pending frame, if any.
    pub fn take(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Total frames requested so far.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total pending frames withdrawn so far.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_ignores_stale_handles() {
        let mut frames = ManualFrames::new();
        let first = frames.request_frame();
        assert_eq!(frames.take(), Some(first));

        let second = frames.request_frame();
        frames.cancel_frame(first);
        assert_eq!(frames.pending(), Some(second));

        frames.cancel_frame(second);
        assert!(!frames.is_pending());
        assert_eq!(frames.cancelled(), 1);
        assert_eq!(frames.requested(), 2);
    }
}
