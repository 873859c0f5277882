//! FIFO executor that runs at most one asynchronous task at a time.
//!
//! Contract:
//! - `enqueue` never rejects and never blocks the caller.
//! - Tasks start in arrival order; a task starts only after the previous one
//!   settled.
//! - A task that returns `Err` or panics is logged and the queue moves on.
//!   Reporting the failure anywhere else is the task's own job.
//! - There is no cancellation or timeout: a task that never completes stalls
//!   every task behind it.

use std::collections::VecDeque;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

type BoxTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type Thunk = Box<dyn FnOnce() -> BoxTask + Send + 'static>;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Thunk>,
    executing: bool,
}

/// Cloning shares the same queue.
#[derive(Clone)]
pub struct SerialTaskQueue {
    name: Arc<str>,
    state: Arc<Mutex<QueueState>>,
}

impl SerialTaskQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            state: Arc::new(Mutex::new(QueueState::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a task. Must be called inside a Tokio runtime.
    ///
    /// The thunk is not called until every earlier task has settled.
    pub fn enqueue<F, Fut, T, E>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let name = Arc::clone(&self.name);
        let thunk: Thunk = Box::new(move || {
            Box::pin(async move {
                let run = async move { task().await };
                match AssertUnwindSafe(run).catch_unwind().await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!(queue = %name, error = %e, "task failed"),
                    Err(_) => error!(queue = %name, "task panicked"),
                }
            })
        });

        let start_drain = {
            let mut state = self.lock();
            state.pending.push_back(thunk);
            if state.executing {
                false
            } else {
                state.executing = true;
                true
            }
        };

        if start_drain {
            tokio::spawn(drain(self.clone()));
        }
    }

    /// Enqueue a task and get its result back through a receiver.
    ///
    /// The receiver errors only if the task panicked.
    pub fn submit<F, Fut, T>(&self, task: F) -> oneshot::Receiver<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.enqueue(move || async move {
            let _ = tx.send(task().await);
            Ok::<(), std::convert::Infallible>(())
        });
        rx
    }

    /// Wait until every task enqueued before this call has settled.
    pub async fn flush(&self) {
        let _ = self.submit(|| async {}).await;
    }

    pub fn is_executing(&self) -> bool {
        self.lock().executing
    }

    /// Tasks waiting to start (not counting the running one).
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn drain(queue: SerialTaskQueue) {
    loop {
        let next = {
            let mut state = queue.lock();
            match state.pending.pop_front() {
                Some(task) => task,
                None => {
                    state.executing = false;
                    break;
                }
            }
        };
        debug!(queue = %queue.name, "running task");
        next().await;
    }
}
