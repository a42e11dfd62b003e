//! Task poller: follows one extraction task until it reaches a terminal state.
//!
//! [`TaskPoller::start`] spawns a single polling loop and returns a
//! [`PollHandle`] that owns it. The loop fetches the task, publishes the
//! record, and either stops (terminal status) or sleeps for the interval and
//! fetches again. Each fetch starts only after the previous one resolved.
//!
//! Transient failures (transport errors, 5xx) are logged and the same fetch is
//! retried on the next tick. A permanent one (unknown task id, undecodable
//! record, other 4xx) ends polling with [`PollState::Unavailable`], which is
//! separate from a backend-reported `failed`/`blocked` task.
//!
//! Cancelling (via [`PollHandle::stop`] or dropping the handle) wakes the loop
//! out of any in-flight fetch or sleep. Publishing and cancelling share a
//! gate, so once `stop` returns nothing more is published. Update callbacks
//! run inside that gate and must not stop or drop their own handle.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use phi_core::{ExtractionTask, TaskId, TaskStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::ExtractionApi;
use crate::error::TaskUnavailable;

/// What the view layer currently knows about a polled task.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// No response has arrived yet.
    Waiting,
    /// Latest record has a non-terminal status; polling continues.
    Running(ExtractionTask),
    /// Terminal record; polling has stopped.
    Finished(ExtractionTask),
    /// The task could not be fetched and never will be; polling has stopped.
    Unavailable(TaskUnavailable),
}

impl PollState {
    #[must_use]
    pub fn task(&self) -> Option<&ExtractionTask> {
        match self {
            PollState::Waiting | PollState::Unavailable(_) => None,
            PollState::Running(task) | PollState::Finished(task) => Some(task),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, PollState::Finished(_))
    }

    /// True once no further state will follow.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, PollState::Finished(_) | PollState::Unavailable(_))
    }
}

type UpdateCallback = Box<dyn FnMut(&PollState) + Send>;

/// Builder for a polling loop.
pub struct TaskPoller<A> {
    api: Arc<A>,
    interval: Duration,
    callbacks: Vec<UpdateCallback>,
}

impl<A: ExtractionApi> TaskPoller<A> {
    #[must_use]
    pub fn new(api: Arc<A>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            callbacks: Vec::new(),
        }
    }

    /// Registers a callback invoked, in order, with every published state.
    #[must_use]
    pub fn on_update(mut self, callback: impl FnMut(&PollState) + Send + 'static) -> Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Spawns the polling loop for `task_id` on the current Tokio runtime.
    #[must_use]
    pub fn start(self, task_id: TaskId) -> PollHandle {
        let cancel = CancellationToken::new();
        let gate = Arc::new(Mutex::new(()));
        let (tx, rx) = watch::channel(PollState::Waiting);

        let publisher = Publisher {
            cancel: cancel.clone(),
            gate: Arc::clone(&gate),
            updates: tx,
            callbacks: self.callbacks,
        };
        let join = tokio::spawn(poll_loop(
            self.api,
            task_id.clone(),
            self.interval,
            publisher,
        ));

        PollHandle {
            task_id,
            cancel,
            gate,
            updates: rx,
            join,
        }
    }
}

/// Owner of a running polling loop. Dropping the handle stops the loop.
pub struct PollHandle {
    task_id: TaskId,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
    updates: watch::Receiver<PollState>,
    join: JoinHandle<()>,
}

impl PollHandle {
    #[must_use]
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Stops polling. Takes effect immediately: no state is published after
    /// this returns.
    pub fn stop(&self) {
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        self.cancel.cancel();
    }

    /// True once the loop was stopped or reached a terminal state.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.join.is_finished()
    }

    #[must_use]
    pub fn current(&self) -> PollState {
        self.updates.borrow().clone()
    }

    /// A receiver that observes every state published from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.updates.clone()
    }

    /// Waits for the terminal record, or for the task to turn out
    /// unavailable. Returns `None` if polling was stopped first.
    pub async fn wait_terminal(&self) -> Option<Result<ExtractionTask, TaskUnavailable>> {
        let mut rx = self.updates.clone();
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if let Some(outcome) = settled(snapshot) {
                return Some(outcome);
            }
            if rx.changed().await.is_err() {
                // Loop exited; the last value is final.
                return settled(rx.borrow().clone());
            }
        }
    }
}

fn settled(state: PollState) -> Option<Result<ExtractionTask, TaskUnavailable>> {
    match state {
        PollState::Finished(task) => Some(Ok(task)),
        PollState::Unavailable(err) => Some(Err(err)),
        PollState::Waiting | PollState::Running(_) => None,
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Loop-side half of the handle: publishes states unless cancelled.
struct Publisher {
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
    updates: watch::Sender<PollState>,
    callbacks: Vec<UpdateCallback>,
}

impl Publisher {
    /// Returns `false` (and publishes nothing) once cancelled.
    fn publish(&mut self, state: PollState) -> bool {
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if self.cancel.is_cancelled() {
            return false;
        }
        for callback in &mut self.callbacks {
            callback(&state);
        }
        self.updates.send_replace(state);
        true
    }
}

async fn poll_loop<A: ExtractionApi>(
    api: Arc<A>,
    task_id: TaskId,
    interval: Duration,
    mut publisher: Publisher,
) {
    let cancel = publisher.cancel.clone();
    let mut last_status: Option<TaskStatus> = None;
    let mut consecutive_failures = 0u32;

    loop {
        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = api.fetch_task(&task_id) => result,
        };

        match fetched {
            Ok(task) => {
                consecutive_failures = 0;
                if let Some(previous) = &last_status {
                    if !previous.can_transition_to(&task.status) {
                        tracing::warn!(
                            %task_id,
                            from = %previous,
                            to = %task.status,
                            "backend reported an out-of-order status"
                        );
                    }
                }
                let terminal = task.status.is_terminal();
                tracing::debug!(%task_id, status = %task.status, stage = ?task.current_stage, "task polled");
                last_status = Some(task.status.clone());

                let state = if terminal {
                    PollState::Finished(task)
                } else {
                    PollState::Running(task)
                };

                if !publisher.publish(state) {
                    break;
                }
                if terminal {
                    tracing::info!(%task_id, status = ?last_status, "task reached terminal state");
                    break;
                }
            }
            Err(err) if err.is_transient() => {
                consecutive_failures += 1;
                tracing::warn!(
                    %task_id,
                    consecutive_failures,
                    error = %err,
                    "task poll failed, retrying on next tick"
                );
            }
            Err(err) => {
                tracing::warn!(%task_id, error = %err, "task cannot be polled, giving up");
                publisher.publish(PollState::Unavailable(TaskUnavailable::new(
                    task_id.clone(),
                    &err,
                )));
                break;
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }
}
