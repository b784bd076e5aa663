//! Session / authentication gate
//!
//! One `Session` is created when the application starts and cloned into
//! every controller. Only the sign-in and sign-out flows write to it; every
//! other component reads or subscribes.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::error::SessionError;

/// Snapshot of the authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    /// Opaque access token handed over by the identity provider.
    pub credential: Option<String>,
}

/// Shared handle to the process-wide session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    state: watch::Sender<SessionState>,
    prompts: watch::Sender<u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Starts unauthenticated, without a credential.
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let (prompts, _) = watch::channel(0);
        Self {
            inner: Arc::new(SessionInner { state, prompts }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().authenticated
    }

    /// Token to present to the gateway, if the identity provider ever issued one.
    pub fn credential(&self) -> Option<String> {
        self.inner.state.borrow().credential.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every sign-in and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Records a successful sign-in. An empty token is not a credential and is ignored.
    pub fn sign_in(&self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.is_empty() {
            return false;
        }
        self.inner.state.send_modify(|state| {
            state.authenticated = true;
            state.credential = Some(token);
        });
        info!("session signed in");
        true
    }

    /// Signs out and overwrites the credential with an empty token, so later
    /// calls fail with 401 until the user signs in again.
    pub fn sign_out(&self) {
        self.inner.state.send_modify(|state| {
            state.authenticated = false;
            state.credential = Some(String::new());
        });
        info!("session signed out");
    }

    /// Resolves once the session is authenticated, immediately if it already is.
    ///
    /// Stays pending while the user has not signed in. The returned future does
    /// not borrow the session; it fails with [`SessionError::Closed`] when the
    /// last handle is dropped first.
    pub fn require_authentication(
        &self,
    ) -> impl Future<Output = Result<(), SessionError>> + Send + 'static {
        let mut rx = self.inner.state.subscribe();
        async move {
            rx.wait_for(|state| state.authenticated)
                .await
                .map(|_| ())
                .map_err(|_| SessionError::Closed)
        }
    }

    /// Asks the shell to show the sign-in dialog.
    pub fn prompt_sign_in(&self) {
        self.inner.prompts.send_modify(|count| *count += 1);
        info!("sign-in requested");
    }

    /// How many times a sign-in has been requested since start.
    pub fn sign_in_prompts(&self) -> u64 {
        *self.inner.prompts.borrow()
    }

    /// Receiver the shell watches to open the sign-in dialog.
    pub fn subscribe_prompts(&self) -> watch::Receiver<u64> {
        self.inner.prompts.subscribe()
    }

    /// Resolves at the next sign-in request issued after this call.
    pub fn prompted(&self) -> impl Future<Output = Result<(), SessionError>> + Send + 'static {
        let mut rx = self.inner.prompts.subscribe();
        async move { rx.changed().await.map_err(|_| SessionError::Closed) }
    }
}
