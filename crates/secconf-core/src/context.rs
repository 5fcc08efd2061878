// # Operation Context
//
// Caller-supplied cancellation and deadline for one lifecycle operation.
//
// Every remote call a handler makes goes through [`OpContext::run`], so a
// cancellation or an elapsed deadline aborts the in-flight request and
// surfaces as an operation failure. Handlers never swallow it.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Cancellation and deadline for one lifecycle operation
///
/// Cloning shares the cancellation token, so a clone handed to a signal
/// handler cancels every call made through the original.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    /// Create a context with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context driven by an existing cancellation token
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Set a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The cancellation token shared by this context
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel every call made through this context (and its clones)
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check whether the context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one remote call under this context
    ///
    /// Returns `Error::Cancelled` if the token fires first and
    /// `Error::DeadlineExceeded` if the deadline elapses first. The future
    /// is dropped in both cases, aborting the in-flight request.
    pub async fn run<F, T>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(Error::cancelled(operation));
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::deadline_exceeded(operation)),
                },
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::cancelled(operation)),
            result = bounded => result,
        }
    }
}
