use tokio::time::Duration;
use tokio::time::Instant;

/// Single-slot restartable deadline coalescing rebuild requests.
///
/// Arming an already-armed timer restarts the quiet window. The engine loop
/// sleeps on [`deadline`](RebuildTimer::deadline) and clears the slot when it
/// fires, so a build triggered by the timer can never overlap another.
#[derive(Debug, Clone)]
pub struct RebuildTimer {
    deadline: Option<Instant>,
    window: Duration,
}

impl RebuildTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            deadline: None,
            window,
        }
    }

    /// Arm (or re-arm) the timer one quiet window from now.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Clear an armed timer; a no-op when idle.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.deadline, Some(deadline) if deadline <= Instant::now())
    }
}
