//! Cancellation and deadline context threaded through every source read.

use crate::core::error::{DumpError, DumpResult, SourceError, UpstreamCall};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Per-invocation context for a dump.
///
/// Every read the engine issues is raced against the cancellation token and
/// the optional deadline. Whichever fires first aborts the read in flight.
#[derive(Debug, Clone, Default)]
pub struct DumpContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl DumpContext {
    /// Create a context with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a deadline relative to now.
    ///
    /// A timeout too large to represent as an instant leaves the context
    /// without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Use an existing cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this context when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel the context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check if the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Run one source read under this context.
    ///
    /// Source failures are tagged with `call`.
    pub async fn run<T, F>(&self, call: UpstreamCall, read: F) -> DumpResult<T>
    where
        F: Future<Output = Result<T, SourceError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(DumpError::Cancelled);
        }
        if matches!(self.deadline, Some(d) if d <= Instant::now()) {
            return Err(DumpError::DeadlineExceeded);
        }

        let deadline = async {
            match self.deadline {
                Some(d) => tokio::time::sleep_until(d).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DumpError::Cancelled),
            _ = deadline => Err(DumpError::DeadlineExceeded),
            result = read => result.map_err(|source| DumpError::upstream(call, source)),
        }
    }
}
