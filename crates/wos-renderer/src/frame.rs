//! Redraw callback scheduling
//!
//! The host drives animation with one redraw callback per display refresh.
//! A strategy that wants the next frame holds a [`FrameRequest`]; the
//! request is consumed when the frame is delivered and must be renewed to
//! keep animating. Cancelled requests never fire.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Handle to one outstanding next-frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(u64);

/// Shared handle to the host's frame scheduler
pub type SharedFrames = Rc<RefCell<FrameScheduler>>;

/// Registry of outstanding next-frame requests
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: BTreeSet<u64>,
    delivered: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler behind a shared handle
    pub fn shared() -> SharedFrames {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Ask for the next redraw callback
    pub fn request(&mut self) -> FrameRequest {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert(id);
        FrameRequest(id)
    }

    /// Withdraw a request. Returns false if it was not outstanding.
    pub fn cancel(&mut self, request: FrameRequest) -> bool {
        self.pending.remove(&request.0)
    }

    /// Consume a request as its frame is delivered.
    ///
    /// Returns false for cancelled or already-delivered requests.
    pub fn consume(&mut self, request: FrameRequest) -> bool {
        let fired = self.pending.remove(&request.0);
        if fired {
            self.delivered += 1;
        }
        fired
    }

    /// Whether a request is still waiting for its frame
    pub fn is_pending(&self, request: FrameRequest) -> bool {
        self.pending.contains(&request.0)
    }

    /// Number of outstanding requests
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total frames delivered since creation
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}
