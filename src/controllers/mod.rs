//! Page Controllers
//!
//! One controller per page. Each owns its view state in a [`ViewCell`],
//! a [`ViewScope`] for the page's lifetime, and a shared [`AppContext`].
//! Controllers are cheap to clone, so a shell can spawn their operations.
//!
//! [`ViewCell`]: crate::view::ViewCell

pub mod all_carts;
pub mod book_detail;
pub mod cart;
pub mod cart_detail;
pub mod catalog;
pub mod create_book;
pub mod profile;
pub mod root;

use std::sync::Arc;

use crate::config::Config;
use crate::error::GatewayError;
use crate::gateway::{BookstoreApi, HttpGateway};
use crate::pagination::Pagination;
use crate::session::Session;
use crate::view::ViewScope;

pub use all_carts::AllCartsController;
pub use book_detail::BookDetailController;
pub use cart::CartController;
pub use cart_detail::CartDetailController;
pub use catalog::CatalogController;
pub use create_book::CreateBookController;
pub use profile::ProfileController;
pub use root::RootController;

/// What every controller needs: the gateway, the session and listing settings.
#[derive(Clone)]
pub struct AppContext {
    pub api: BookstoreApi,
    pub session: Session,
    page_size: usize,
}

impl AppContext {
    pub fn new(api: BookstoreApi, session: Session) -> Self {
        Self {
            api,
            session,
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
        }
    }

    /// Context backed by the HTTP gateway described by `config`.
    pub fn connect(config: &Config, session: Session) -> Result<Self, GatewayError> {
        let gateway = HttpGateway::new(config.api_url.clone(), session.clone(), config.timeout)?;
        Ok(Self::new(BookstoreApi::new(Arc::new(gateway)), session).with_page_size(config.page_size))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fresh page cursor for a listing view.
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page_size).unwrap_or_default()
    }
}

/// Asks for a sign-in when needed and waits for it.
/// Returns false if the view is torn down (or the session dropped) first.
pub(crate) async fn ensure_signed_in(scope: &ViewScope, session: &Session) -> bool {
    if session.is_authenticated() {
        return true;
    }
    session.prompt_sign_in();
    tokio::select! {
        biased;
        _ = scope.torn_down() => false,
        signed_in = session.require_authentication() => signed_in.is_ok(),
    }
}
