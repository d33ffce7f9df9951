//! Completion barrier for in-flight fetch tasks
//!
//! The crawl is finished exactly when the number of scheduled-but-incomplete
//! tasks returns to zero. `TaskCounter` tracks that number and lets the crawl
//! initiator wait for the zero crossing; `TaskGuard` ties the decrement to
//! drop so it runs on every exit path of a task.

use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Counts outstanding fetch tasks and signals when none remain
///
/// The counter must only be incremented before the task it counts is spawned,
/// never from inside it. Together with the drop-guard decrement this closes
/// the race where the count dips to zero while a just-scheduled task has not
/// started running yet: whoever schedules holds the count above zero until
/// the new task's own guard exists.
#[derive(Debug, Default)]
pub(crate) struct TaskCounter {
    count: Mutex<usize>,
    zero: Notify,
}

impl TaskCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one outstanding task. Call before spawning the task it counts.
    pub fn increment(&self) {
        *self.count.lock().unwrap() += 1;
    }

    /// Removes one outstanding task, waking waiters on the transition to zero
    pub fn decrement(&self) {
        let mut count = self.count.lock().unwrap();
        *count -= 1;
        if *count == 0 {
            self.zero.notify_waiters();
        }
    }

    /// Waits until no tasks remain outstanding
    ///
    /// Returns immediately if the counter is already zero. Interest in the
    /// zero notification is registered before the counter is read, so a
    /// decrement landing between the read and the await cannot lose the
    /// wakeup; the count is only ever read under the same lock that guards
    /// the writes.
    pub async fn wait_for_zero(&self) {
        loop {
            let notified = self.zero.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if *self.count.lock().unwrap() == 0 {
                return;
            }

            notified.await;
        }
    }
}

/// Decrements a counter when dropped
///
/// Creation performs the increment. The scheduling side creates the guard
/// before `tokio::spawn` and moves it into the spawned task, so the matching
/// decrement runs whether the task completes, panics, or is dropped without
/// ever running.
#[derive(Debug)]
pub(crate) struct TaskGuard {
    counter: Arc<TaskCounter>,
}

impl TaskGuard {
    pub fn new(counter: Arc<TaskCounter>) -> Self {
        counter.increment();
        Self { counter }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.counter.decrement();
    }
}
