//! Coalescing of scroll-driven recomputation to one per animation frame.

use super::ScrollOffset;

/// Debounced recompute task.
///
/// The first request after a frame fires asks the caller to schedule a frame;
/// requests made while one is already scheduled only replace the pending
/// offset. When the frame fires, [`take`](Self::take) yields the most recent
/// offset.
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer {
    pending: Option<ScrollOffset>,
    scheduled: bool,
    dropped: u64,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recompute request. Returns true when the caller must
    /// schedule a frame (none is pending yet).
    #[must_use]
    pub fn request(&mut self, offset: ScrollOffset) -> bool {
        if self.pending.replace(offset).is_some() {
            self.dropped += 1;
        }
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    /// Called when the frame fires.
    pub fn take(&mut self) -> Option<ScrollOffset> {
        self.scheduled = false;
        self.pending.take()
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Requests superseded before their frame ran.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
