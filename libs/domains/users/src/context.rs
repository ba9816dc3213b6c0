//! Cancellation and deadline carried by every repository call.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why an operation was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    Canceled,
    DeadlineExceeded,
}

/// Cancellation token and optional deadline for one logical operation.
///
/// Cloning is cheap and clones share the same token.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline_at(Instant::now() + timeout)
    }

    /// Tie this context to an existing cancellation token.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Set an absolute deadline. An earlier existing deadline wins.
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the operation should not start at all.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.token.is_cancelled() {
            return Err(Interrupted::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupted::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the context is cancelled or the
    /// deadline passes first.
    ///
    /// `fut` is not polled at all when the context is already done.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Interrupted::Canceled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}
