//! Detail page of a checked-out cart.

use futures_util::future::join;

use super::AppContext;
use crate::gateway::models::{Book, Cart};
use crate::pagination::Pagination;
use crate::view::{Ack, HasStatus, Settled, ViewCell, ViewScope, ViewStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartDetailState {
    pub cart: Cart,
    pub books: Vec<Book>,
    pub pagination: Pagination,
    pub status: ViewStatus,
}

impl CartDetailState {
    pub fn page(&self) -> &[Book] {
        self.pagination.page(&self.books)
    }

    pub fn page_array(&self) -> Vec<usize> {
        self.pagination.page_array(self.books.len())
    }
}

impl HasStatus for CartDetailState {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

#[derive(Clone)]
pub struct CartDetailController {
    ctx: AppContext,
    scope: ViewScope,
    websafe_cart_key: String,
    view: ViewCell<CartDetailState>,
}

impl CartDetailController {
    pub fn new(ctx: AppContext, websafe_cart_key: impl Into<String>) -> Self {
        let view = ViewCell::new(CartDetailState {
            pagination: ctx.pagination(),
            ..Default::default()
        });
        Self {
            ctx,
            scope: ViewScope::new(),
            websafe_cart_key: websafe_cart_key.into(),
            view,
        }
    }

    pub fn state(&self) -> CartDetailState {
        self.view.snapshot()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        self.view.update(|s| {
            let len = s.books.len();
            s.pagination.go_to(page, len)
        })
    }

    /// Fetches the cart and its books concurrently, in no particular order.
    pub async fn init(&self) -> (Settled, Settled) {
        let key = self.websafe_cart_key.as_str();
        let failure = format!("Failed to get the cart : {key}");
        let cart = self.view.reconcile(
            &self.scope,
            &self.ctx.session,
            "cart",
            &failure,
            self.ctx.api.get_cart(key),
            |s, cart| {
                s.cart = cart;
                Ack::loaded()
            },
        );
        let books = self.view.reconcile(
            &self.scope,
            &self.ctx.session,
            "books",
            "Failed to get books",
            self.ctx.api.get_book_in_cart_history(key),
            |s, books| {
                s.books = books;
                s.pagination.current_page = 0;
                Ack::listed("DONE")
            },
        );
        join(cart, books).await
    }
}
