//! Remote-call / view-state reconciliation
//!
//! [`ViewCell::reconcile`] is the one place a gateway call turns into a view
//! update. It flags the view as loading, awaits the call, then applies either
//! the failure branch or the success branch under a single lock.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use super::scope::ViewScope;
use super::state::{Ack, HasStatus, Severity};
use crate::error::GatewayError;
use crate::session::Session;

/// How a reconciled call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The success branch ran.
    Succeeded,
    /// The failure branch ran.
    Failed,
    /// The failure branch ran and a sign-in was requested.
    Unauthorized,
    /// The view was torn down first; nothing was applied.
    Cancelled,
    /// A newer call on the same slot was issued; nothing was applied.
    Superseded,
}

impl Settled {
    pub fn succeeded(self) -> bool {
        self == Settled::Succeeded
    }
}

/// Identifies one outstanding call on one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequestTag {
    slot: &'static str,
    seq: u64,
}

struct CellInner<S> {
    state: S,
    pending: usize,
    latest: HashMap<&'static str, u64>,
}

/// View state shared between a controller and its in-flight calls.
pub struct ViewCell<S> {
    inner: Arc<Mutex<CellInner<S>>>,
}

impl<S> Clone for ViewCell<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Default + HasStatus> Default for ViewCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: HasStatus> ViewCell<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CellInner {
                state,
                pending: 0,
                latest: HashMap::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CellInner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock().state)
    }

    /// Local edits that do not involve the gateway (form fields, filters).
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().state)
    }

    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.lock().state.clone()
    }

    /// Number of calls issued and not yet settled.
    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    fn begin(&self, slot: &'static str) -> RequestTag {
        let mut inner = self.lock();
        inner.pending += 1;
        let seq = inner.latest.get(slot).map_or(1, |seq| seq + 1);
        inner.latest.insert(slot, seq);
        let status = inner.state.status_mut();
        status.loading = true;
        status.submitted = false;
        RequestTag { slot, seq }
    }

    /// Runs `call` and folds its outcome into the view.
    ///
    /// `slot` names the state the success handler writes; two calls on the
    /// same slot never both land, the older one is discarded. On failure the
    /// banner reads `"<failure> : <message>"` and a 401 additionally asks the
    /// session for a sign-in. On success `on_success` mutates the state and
    /// returns the banner to show.
    pub async fn reconcile<T, Fut, F>(
        &self,
        scope: &ViewScope,
        session: &Session,
        slot: &'static str,
        failure: &str,
        call: Fut,
        on_success: F,
    ) -> Settled
    where
        Fut: Future<Output = Result<T, GatewayError>>,
        F: FnOnce(&mut S, T) -> Ack,
    {
        let tag = self.begin(slot);

        let outcome = tokio::select! {
            biased;
            _ = scope.torn_down() => None,
            outcome = call => Some(outcome),
        };

        let mut inner = self.lock();
        inner.pending = inner.pending.saturating_sub(1);
        let still_loading = inner.pending > 0;

        let outcome = match outcome {
            Some(outcome) if !scope.is_torn_down() => outcome,
            _ => {
                debug!(slot, "view torn down, dropping completion");
                return Settled::Cancelled;
            }
        };

        if inner.latest.get(slot) != Some(&tag.seq) {
            debug!(slot = tag.slot, seq = tag.seq, "newer call on slot, dropping completion");
            inner.state.status_mut().loading = still_loading;
            drop(inner);
            // Stale data is dropped but an expired sign-in is not.
            if matches!(&outcome, Err(err) if err.is_unauthorized()) {
                session.prompt_sign_in();
            }
            return Settled::Superseded;
        }

        match outcome {
            Err(err) => {
                let status = inner.state.status_mut();
                status.loading = still_loading;
                status.severity = Some(Severity::Warning);
                status.message = format!("{failure} : {}", err.message());
                error!(slot, code = err.code(), "{}", status.message);

                if err.is_unauthorized() {
                    drop(inner);
                    session.prompt_sign_in();
                    return Settled::Unauthorized;
                }
                Settled::Failed
            }
            Ok(value) => {
                let ack = on_success(&mut inner.state, value);
                let status = inner.state.status_mut();
                status.loading = still_loading;
                status.submitted = ack.submitted;
                if let Some(severity) = ack.severity {
                    status.severity = Some(severity);
                }
                if let Some(message) = ack.message {
                    status.message = message;
                }
                info!(slot, "{}", status.message);
                Settled::Succeeded
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ServiceError;
    use crate::view::state::ViewState;
    use tokio::sync::oneshot;

    fn service_error(code: u16, message: &str) -> GatewayError {
        GatewayError::Service(ServiceError::new(code, message))
    }

    #[tokio::test]
    async fn test_success_replaces_items() {
        let cell: ViewCell<ViewState<&str>> = ViewCell::default();
        let scope = ViewScope::new();
        let session = Session::new();

        for _ in 0..2 {
            let settled = cell
                .reconcile(
                    &scope,
                    &session,
                    "items",
                    "Failed to query",
                    async { Ok::<_, GatewayError>(vec!["a", "b"]) },
                    |state, items| {
                        state.replace_items(items);
                        Ack::listed("Query succeeded")
                    },
                )
                .await;
            assert_eq!(settled, Settled::Succeeded);
        }

        let state = cell.snapshot();
        assert_eq!(state.items, vec!["a", "b"]);
        assert!(!state.status.loading);
        assert!(state.status.submitted);
        assert_eq!(state.status.severity, Some(Severity::Success));
    }

    #[tokio::test]
    async fn test_failure_keeps_last_good_data() {
        let cell = ViewCell::new(ViewState {
            items: vec![1, 2],
            ..Default::default()
        });
        let settled = cell
            .reconcile(
                &ViewScope::new(),
                &Session::new(),
                "items",
                "Failed to query",
                async { Err::<Vec<i32>, _>(service_error(500, "boom")) },
                |state, items| {
                    state.replace_items(items);
                    Ack::listed("unreachable")
                },
            )
            .await;

        assert_eq!(settled, Settled::Failed);
        let state = cell.snapshot();
        assert_eq!(state.items, vec![1, 2]);
        assert!(!state.status.loading);
        assert_eq!(state.status.severity, Some(Severity::Warning));
        assert_eq!(state.status.message, "Failed to query : boom");
    }

    #[tokio::test]
    async fn test_unauthorized_prompts_sign_in_and_skips_success() {
        let cell: ViewCell<ViewState<i32>> = ViewCell::default();
        let session = Session::new();
        let mut ran = false;
        let settled = cell
            .reconcile(
                &ViewScope::new(),
                &session,
                "items",
                "Failed",
                async { Err::<i32, _>(service_error(401, "login required")) },
                |_, _| {
                    ran = true;
                    Ack::success("")
                },
            )
            .await;

        assert_eq!(settled, Settled::Unauthorized);
        assert!(!ran);
        assert_eq!(session.sign_in_prompts(), 1);
        assert!(!cell.snapshot().status.loading);
    }

    #[tokio::test]
    async fn test_teardown_drops_completion() {
        let cell: ViewCell<ViewState<i32>> = ViewCell::default();
        let scope = ViewScope::new();
        let session = Session::new();
        let (tx, rx) = oneshot::channel::<Vec<i32>>();

        let task = {
            let cell = cell.clone();
            let scope = scope.clone();
            tokio::spawn(async move {
                cell.reconcile(
                    &scope,
                    &session,
                    "items",
                    "Failed",
                    async move { Ok::<_, GatewayError>(rx.await.unwrap_or_default()) },
                    |state, items| {
                        state.replace_items(items);
                        Ack::listed("DONE")
                    },
                )
                .await
            })
        };

        tokio::task::yield_now().await;
        scope.teardown();
        let _ = tx.send(vec![7]);

        assert_eq!(task.await.unwrap(), Settled::Cancelled);
        let state = cell.snapshot();
        assert!(state.items.is_empty());
        assert_eq!(state.status.severity, None);
    }

    #[tokio::test]
    async fn test_older_call_on_same_slot_is_superseded() {
        let cell: ViewCell<ViewState<&str>> = ViewCell::default();
        let scope = ViewScope::new();
        let session = Session::new();
        let (old_tx, old_rx) = oneshot::channel::<&str>();
        let (new_tx, new_rx) = oneshot::channel::<&str>();

        let issue = |rx: oneshot::Receiver<&'static str>| {
            let cell = cell.clone();
            let scope = scope.clone();
            let session = session.clone();
            tokio::spawn(async move {
                cell.reconcile(
                    &scope,
                    &session,
                    "items",
                    "Failed",
                    async move { Ok::<_, GatewayError>(rx.await.unwrap_or_default()) },
                    |state, item| {
                        state.replace_items(vec![item]);
                        Ack::listed(item)
                    },
                )
                .await
            })
        };

        let old = issue(old_rx);
        tokio::task::yield_now().await;
        let new = issue(new_rx);
        tokio::task::yield_now().await;
        assert_eq!(cell.pending(), 2);

        new_tx.send("new").unwrap();
        assert_eq!(new.await.unwrap(), Settled::Succeeded);
        assert!(cell.snapshot().status.loading);

        old_tx.send("old").unwrap();
        assert_eq!(old.await.unwrap(), Settled::Superseded);

        let state = cell.snapshot();
        assert_eq!(state.items, vec!["new"]);
        assert!(!state.status.loading);
    }

    #[tokio::test]
    async fn test_superseded_unauthorized_still_prompts_sign_in() {
        let cell: ViewCell<ViewState<&str>> = ViewCell::default();
        let scope = ViewScope::new();
        let session = Session::new();
        let (old_tx, old_rx) = oneshot::channel::<Result<&str, GatewayError>>();
        let (new_tx, new_rx) = oneshot::channel::<Result<&str, GatewayError>>();

        let issue = |rx: oneshot::Receiver<Result<&'static str, GatewayError>>| {
            let cell = cell.clone();
            let scope = scope.clone();
            let session = session.clone();
            tokio::spawn(async move {
                cell.reconcile(
                    &scope,
                    &session,
                    "items",
                    "Failed",
                    async move { rx.await.unwrap_or(Ok("")) },
                    |state, item| {
                        state.replace_items(vec![item]);
                        Ack::listed(item)
                    },
                )
                .await
            })
        };

        let old = issue(old_rx);
        tokio::task::yield_now().await;
        let new = issue(new_rx);
        tokio::task::yield_now().await;

        new_tx.send(Ok("new")).unwrap();
        assert_eq!(new.await.unwrap(), Settled::Succeeded);

        old_tx
            .send(Err(service_error(401, "login required")))
            .unwrap();
        assert_eq!(old.await.unwrap(), Settled::Superseded);

        assert_eq!(session.sign_in_prompts(), 1);
        let state = cell.snapshot();
        assert_eq!(state.items, vec!["new"]);
        assert_eq!(state.status.message, "new");
        assert_eq!(state.status.severity, Some(Severity::Success));
    }
}
