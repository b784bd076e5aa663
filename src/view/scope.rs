//! Lifetime of one view activation.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancelled when the view is torn down; completions after that are dropped.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when the view is torn down.
    pub async fn torn_down(&self) {
        self.token.cancelled().await
    }

    /// Runs `future` in the background until it finishes or the view is torn down.
    /// The handle yields `None` in the latter case.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = future => Some(output),
            }
        })
    }
}
