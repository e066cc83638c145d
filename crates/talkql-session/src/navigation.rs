//! Navigation capability handed to the session by its host.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Lets the session ask its host to leave the current session view.
///
/// Called when no data source is connected at start and after a successful
/// disconnect. The host decides what leaving means (route change, loop exit).
pub trait NavigationPort: Send + Sync {
    fn leave_session(&self);
}

/// Navigator that only counts leave requests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    leaves: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the session asked to leave.
    pub fn leave_count(&self) -> usize {
        self.leaves.load(Ordering::SeqCst)
    }

    pub fn has_left(&self) -> bool {
        self.leave_count() > 0
    }
}

impl NavigationPort for RecordingNavigator {
    fn leave_session(&self) {
        self.leaves.fetch_add(1, Ordering::SeqCst);
    }
}
