//! In-process registry of armed match timers. The registry is entirely
//! in-memory: a restart loses every unfired timer and recovery relies on the
//! poller re-discovering matches from the store on its next cycle.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use uuid::Uuid;

use matchday_models::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed | TaskState::Cancelled
        )
    }
}

struct TaskEntry {
    // Distinguishes this arming from any later re-arming under the same id,
    // so a finished task only removes its own registry entry.
    seq: u64,
    state: Arc<Mutex<TaskState>>,
    cancel: CancellationToken,
}

/// Registry mapping a task id (match id) to an armed, cancellable timer.
/// Arming is idempotent: a pending or running entry swallows further arm
/// requests for the same id, which is what prevents double simulation when the
/// poller observes a match on two successive cycles.
pub struct TaskScheduler {
    tasks: Arc<DashMap<Uuid, TaskEntry>>,
    seq: AtomicU64,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(DashMap::new()),
            seq: AtomicU64::new(0),
        }
    }

    /// Arms `task` to run at `start_at`, or immediately if `start_at` is in
    /// the past. If an entry already exists for `task_id`: a terminal entry is
    /// discarded and replaced, a pending or running one turns this call into a
    /// logged no-op.
    pub fn arm<F>(&self, task_id: Uuid, start_at: DateTime<Utc>, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        match self.tasks.entry(task_id) {
            Entry::Occupied(mut occupied) => {
                let current = *occupied.get().state.lock();
                if current.is_terminal() {
                    let entry = self.spawn_task(task_id, start_at, task);
                    occupied.insert(entry);
                    debug!("Task {} re-armed over a {:?} entry", task_id, current);
                } else {
                    debug!("Task {} is already {:?}, ignoring", task_id, current);
                }
            }
            Entry::Vacant(vacant) => {
                let entry = self.spawn_task(task_id, start_at, task);
                vacant.insert(entry);
                debug!("Task '{}' armed for '{}'", task_id, start_at);
            }
        }
    }

    /// Best-effort cancellation. Only a pending entry is cancelled and
    /// removed; a running or absent task is left alone.
    pub fn cancel(&self, task_id: Uuid) {
        let removed = self.tasks.remove_if(&task_id, |_, entry| {
            let mut state = entry.state.lock();
            if *state == TaskState::Pending {
                *state = TaskState::Cancelled;
                entry.cancel.cancel();
                true
            } else {
                false
            }
        });

        if removed.is_some() {
            debug!("Task {} cancelled", task_id);
        } else {
            debug!("Task {} is not pending, nothing to cancel", task_id);
        }
    }

    pub fn state(&self, task_id: Uuid) -> Option<TaskState> {
        self.tasks.get(&task_id).map(|entry| *entry.state.lock())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn spawn_task<F>(&self, task_id: Uuid, start_at: DateTime<Utc>, task: F) -> TaskEntry
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let state = Arc::new(Mutex::new(TaskState::Pending));
        let cancel = CancellationToken::new();

        let delay = (start_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let tasks = Arc::clone(&self.tasks);
        let task_state = Arc::clone(&state);
        let token = cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                // The canceller already flipped the state and dropped the
                // registry entry.
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            {
                let mut state = task_state.lock();
                if *state == TaskState::Cancelled {
                    return;
                }
                *state = TaskState::Running;
            }

            debug!("Running task for {}", task_id);
            let outcome = task.await;

            *task_state.lock() = if outcome.is_ok() {
                TaskState::Succeeded
            } else {
                TaskState::Failed
            };
            if let Err(e) = outcome {
                error!("Failed to run scheduled task {}: {}", task_id, e);
            }

            debug!("Task for match {} ended", task_id);
            tasks.remove_if(&task_id, |_, entry| entry.seq == seq);
        });

        TaskEntry { seq, state, cancel }
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}
