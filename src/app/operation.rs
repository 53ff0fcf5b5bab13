// SPDX-License-Identifier: GPL-3.0-only

//! Background operations with an observable outcome
//!
//! Device and library work runs on the tokio runtime. The caller keeps an
//! [`Operation`] handle and either polls it from its own loop or awaits it.
//! Cancelling aborts the task; a cancelled operation never delivers a
//! value.

use crate::backends::camera::{BackendError, BackendResult};
use futures::future::{AbortHandle, Abortable};
use std::future::Future;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::debug;

/// Observable state of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
}

impl OperationStatus {
    fn of<T>(result: &BackendResult<T>) -> Self {
        match result {
            Ok(_) => OperationStatus::Succeeded,
            Err(BackendError::Cancelled) => OperationStatus::Cancelled,
            Err(_) => OperationStatus::Failed,
        }
    }

    pub fn is_settled(&self) -> bool {
        *self != OperationStatus::Pending
    }
}

/// Handle to a running background operation
#[derive(Debug)]
pub struct Operation<T> {
    receiver: oneshot::Receiver<BackendResult<T>>,
    abort: AbortHandle,
    status: OperationStatus,
    outcome: Option<BackendResult<T>>,
}

impl<T: Send + 'static> Operation<T> {
    /// Run a future on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = BackendResult<T>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let (abort, registration) = AbortHandle::new_pair();

        tokio::spawn(async move {
            let result = Abortable::new(future, registration)
                .await
                .unwrap_or(Err(BackendError::Cancelled));
            // The handle may already be gone; nobody is left to tell
            let _ = sender.send(result);
        });

        Self {
            receiver,
            abort,
            status: OperationStatus::Pending,
            outcome: None,
        }
    }

    /// Run a blocking closure on the blocking pool.
    ///
    /// Cancelling discards the closure's result; work already running is
    /// allowed to finish.
    pub fn spawn_blocking<F>(f: F) -> Self
    where
        F: FnOnce() -> BackendResult<T> + Send + 'static,
    {
        Self::spawn(async move {
            tokio::task::spawn_blocking(f)
                .await
                .map_err(|e| BackendError::Other(format!("Background task error: {}", e)))?
        })
    }
}

impl<T> Operation<T> {
    fn poll_outcome(&mut self) {
        if self.status.is_settled() {
            return;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            // Task dropped without answering, e.g. at runtime shutdown
            Err(TryRecvError::Closed) => Err(BackendError::Cancelled),
        };
        self.status = OperationStatus::of(&result);
        self.outcome = Some(result);
    }

    /// Current state, without blocking
    pub fn status(&mut self) -> OperationStatus {
        self.poll_outcome();
        self.status
    }

    /// Abort the operation unless it already settled
    pub fn cancel(&mut self) {
        self.poll_outcome();
        if self.status.is_settled() {
            return;
        }
        debug!("Cancelling background operation");
        self.abort.abort();
        self.status = OperationStatus::Cancelled;
        self.outcome = Some(Err(BackendError::Cancelled));
    }

    /// Take the outcome if the operation has settled.
    ///
    /// Returns `None` while pending and after the outcome was taken once.
    pub fn try_take(&mut self) -> Option<BackendResult<T>> {
        self.poll_outcome();
        self.outcome.take()
    }

    /// Wait for the outcome.
    ///
    /// Fails with [`BackendError::OutcomeTaken`] when [`Operation::try_take`]
    /// already returned it.
    pub async fn wait(mut self) -> BackendResult<T> {
        if self.status.is_settled() {
            return self.outcome.take().unwrap_or(Err(BackendError::OutcomeTaken));
        }
        match self.receiver.await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Cancelled),
        }
    }
}
