//! One-shot timer slot.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Purpose of an armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Exponential-backoff retry after a failed login.
    Retry,
    /// Proactive token refresh.
    Refresh,
    /// Fixed delay after a failed refresh, re-arms the refresh timer.
    RefreshRetry,
}

/// Description of the currently armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTimer {
    pub kind: TimerKind,
    pub delay: Duration,
    pub deadline: Instant,
}

#[derive(Debug)]
struct Armed {
    id: u64,
    timer: ArmedTimer,
    handle: JoinHandle<()>,
}

/// Holds at most one armed timer.
///
/// Arming replaces (and aborts) the previous timer. A firing task calls
/// [`release`](Self::release) with its id; the call fails if the task was
/// superseded in the meantime.
#[derive(Debug)]
pub(crate) struct TimerSlot {
    next_id: u64,
    armed: Option<Armed>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            armed: None,
        }
    }

    /// Arms a timer, cancelling the previous one.
    ///
    /// `task` receives the timer id and deadline and returns the future
    /// to spawn. It must sleep until the deadline itself.
    pub fn arm<F, Fut>(&mut self, kind: TimerKind, delay: Duration, task: F)
    where
        F: FnOnce(u64, Instant) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.disarm();

        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(task(id, deadline));

        self.armed = Some(Armed {
            id,
            timer: ArmedTimer {
                kind,
                delay,
                deadline,
            },
            handle,
        });
    }

    /// Releases the slot on behalf of the firing timer `id`.
    ///
    /// Returns false when another timer was armed or the slot was
    /// disarmed since.
    pub fn release(&mut self, id: u64) -> bool {
        match &self.armed {
            Some(armed) if armed.id == id => {
                self.armed = None;
                true
            },
            _ => false,
        }
    }

    /// Cancels the armed timer, if any.
    pub fn disarm(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.handle.abort();
        }
    }

    pub fn armed(&self) -> Option<ArmedTimer> {
        self.armed.as_ref().map(|a| a.timer)
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.disarm();
    }
}
