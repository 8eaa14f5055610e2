// src/render/scheduler.rs

use tracing::trace;

/// Identifies one scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// Coalesces redraw requests into at most one repaint per animation frame.
///
/// A request made while a frame is already scheduled cancels it and schedules
/// a fresh one, so only the newest request survives to the next frame.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    next_handle: u64,
    scheduled: Option<FrameHandle>,
    cancelled: u64,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_redraw(&mut self) -> FrameHandle {
        if let Some(previous) = self.scheduled.take() {
            self.cancelled += 1;
            trace!(?previous, "Rescheduling pending frame");
        }
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.scheduled = Some(handle);
        handle
    }

    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.scheduled.take()
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Called when the frame fires. Returns the handle that is due, if any;
    /// the caller repaints exactly once for it.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.scheduled.take()
    }

    /// Frames replaced by a newer request before they fired.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_requests_one_frame() {
        let mut s = RedrawScheduler::new();
        let mut last = None;
        for _ in 0..10 {
            last = Some(s.request_redraw());
        }
        assert_eq!(s.take_frame(), last);
        assert_eq!(s.take_frame(), None);
        assert_eq!(s.cancelled(), 9);
    }

    #[test]
    fn cancel_clears_pending_frame() {
        let mut s = RedrawScheduler::new();
        s.request_redraw();
        assert!(s.is_scheduled());
        assert!(s.cancel().is_some());
        assert_eq!(s.take_frame(), None);
    }
}
