use async_channel::{Receiver, Sender};

use crate::error::{PredictError, Result};
use crate::scheduler::job::Task;

/// FIFO hand-off between submitters and workers.
///
/// Backed by an unbounded multi-consumer channel: every worker holds a clone
/// of the receiver and each task is delivered to exactly one of them.
/// Closing the queue stops new submissions; tasks already queued are still
/// delivered, after which `dequeue` returns `None`.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = async_channel::unbounded();
        Self { tx, rx }
    }

    /// Append a task to the tail. Never waits.
    pub fn enqueue(&self, task: Task) -> Result<()> {
        self.tx
            .try_send(task)
            .map_err(|_| PredictError::ShuttingDown)
    }

    /// Wait for the next task. Returns `None` once the queue is closed and
    /// drained.
    pub async fn dequeue(&self) -> Option<Task> {
        self.rx.recv().await.ok()
    }

    /// Signal shutdown. Returns true if this call closed the queue.
    pub fn close(&self) -> bool {
        self.tx.close()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}
