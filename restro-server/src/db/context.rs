//! Query context: cancellation and deadline for one read
//!
//! Every store call made on behalf of a request runs through
//! [`QueryContext::run`], which races the call against the cancellation token
//! and the deadline. A store that hangs can therefore never hold a request
//! past its deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::store::{StoreError, StoreResult};

/// Cancellation token plus optional deadline carried through a computation
#[derive(Debug, Clone)]
pub struct QueryContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// Context that is never canceled and has no deadline
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Context bound to `token` with no deadline
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Context bound to `token` that expires `timeout` from now
    pub fn with_timeout(token: CancellationToken, timeout: Duration) -> Self {
        Self {
            token,
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the context is already canceled or expired
    pub fn check(&self) -> StoreResult<()> {
        if self.token.is_cancelled() {
            return Err(StoreError::Canceled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(StoreError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Run a store call, aborting it on cancellation or deadline
    pub async fn run<F, T>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(StoreError::Canceled),
            _ = wait_deadline(self.deadline) => Err(StoreError::DeadlineExceeded),
            res = fut => res,
        }
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::background()
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_through_result() {
        let ctx = QueryContext::background();
        let value = ctx.run(async { Ok::<_, StoreError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_canceled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = QueryContext::with_token(token);
        let err = ctx.run(async { Ok::<_, StoreError>(()) }).await.unwrap_err();
        assert!(matches!(err, StoreError::Canceled));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_call() {
        let token = CancellationToken::new();
        let ctx = QueryContext::with_token(token.clone());
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = ctx
            .run(std::future::pending::<StoreResult<()>>())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Canceled));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_deadline_interrupts_slow_call() {
        let ctx = QueryContext::with_timeout(CancellationToken::new(), Duration::from_millis(20));
        let err = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_check_after_deadline() {
        let ctx = QueryContext::with_timeout(CancellationToken::new(), Duration::ZERO);
        assert!(matches!(ctx.check(), Err(StoreError::DeadlineExceeded)));
    }
}
