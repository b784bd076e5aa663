//! Application-wide sign-in and sign-out banner.

use tracing::info;

use super::AppContext;
use crate::session::Session;
use crate::view::{HasStatus, Severity, ViewCell, ViewStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub status: ViewStatus,
}

impl HasStatus for RootState {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

/// The only writer of the session besides the sign-in dialog.
#[derive(Clone)]
pub struct RootController {
    session: Session,
    view: ViewCell<RootState>,
}

impl RootController {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            session: ctx.session.clone(),
            view: ViewCell::default(),
        }
    }

    pub fn state(&self) -> RootState {
        self.view.snapshot()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Completes a sign-in handed back by the identity provider.
    /// Nothing changes when the provider returned no token.
    pub fn sign_in(&self, token: &str, email: &str) -> bool {
        if !self.session.sign_in(token) {
            return false;
        }
        self.view.update(|s| {
            s.status
                .announce(Severity::Success, format!("Logged in with {email}"))
        });
        info!(email, "signed in");
        true
    }

    pub fn sign_out(&self) {
        self.session.sign_out();
        self.view
            .update(|s| s.status.announce(Severity::Success, "Logged out"));
    }
}
