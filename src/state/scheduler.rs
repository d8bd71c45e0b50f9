use std::time::Duration;

/// Handle of one scheduled run. Handles are never reused by a debouncer,
/// so a stale handle can be told apart from the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// A deferred run due at a point on the session clock (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTask {
    pub handle: TaskHandle,
    pub due_at: f64,
}

/// Collapses bursts of triggers into one run after a quiet period.
///
/// Holds at most one pending task. Scheduling again replaces it, which is
/// how the previous run gets cancelled.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<ScheduledTask>,
    next_handle: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_handle: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)schedule the run for `now + delay`, cancelling any pending one
    pub fn schedule(&mut self, now: f64) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(ScheduledTask {
            handle,
            due_at: now + self.delay.as_secs_f64(),
        });
        handle
    }

    /// Drop the pending run, returning it if there was one
    pub fn cancel(&mut self) -> Option<ScheduledTask> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&ScheduledTask> {
        self.pending.as_ref()
    }

    /// Fire the pending run if it is due. A task fires at most once.
    pub fn poll(&mut self, now: f64) -> Option<TaskHandle> {
        match self.pending {
            Some(task) if now >= task.due_at => {
                self.pending = None;
                Some(task.handle)
            }
            _ => None,
        }
    }
}
