//! My-cart page: the ongoing cart, its books and the checkout form.

use futures_util::future::join;

use super::AppContext;
use crate::gateway::models::{Book, Cart, CheckoutForm, Receipt};
use crate::pagination::Pagination;
use crate::view::{Ack, HasStatus, Settled, ViewCell, ViewScope, ViewStatus};

/// Where the shell goes after a successful checkout.
pub const THANK_YOU_LOCATION: &str = "/thankyou";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub books: Vec<Book>,
    pub cart: Cart,
    pub checkout: CheckoutForm,
    pub pagination: Pagination,
    /// Set when the page wants the shell to navigate away.
    pub next_location: Option<String>,
    pub status: ViewStatus,
}

impl CartState {
    pub fn page(&self) -> &[Book] {
        self.pagination.page(&self.books)
    }

    pub fn page_array(&self) -> Vec<usize> {
        self.pagination.page_array(self.books.len())
    }
}

impl HasStatus for CartState {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

fn refused(failure: &str, receipt: &Receipt) -> Ack {
    match receipt.reason.as_deref() {
        Some(reason) => Ack::warning(format!("{failure} : {reason}")),
        None => Ack::warning(failure),
    }
}

#[derive(Clone)]
pub struct CartController {
    ctx: AppContext,
    scope: ViewScope,
    view: ViewCell<CartState>,
}

impl CartController {
    pub fn new(ctx: AppContext) -> Self {
        let view = ViewCell::new(CartState {
            pagination: ctx.pagination(),
            ..Default::default()
        });
        Self {
            ctx,
            scope: ViewScope::new(),
            view,
        }
    }

    pub fn state(&self) -> CartState {
        self.view.snapshot()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    /// Page entry: books and cart summary are fetched concurrently.
    pub async fn init(&self) -> (Settled, Settled) {
        join(self.load_books(Ack::listed("DONE")), self.load_cart()).await
    }

    /// Refreshes the page without replacing the banner.
    pub async fn reload(&self) -> (Settled, Settled) {
        join(self.load_books(Ack::quiet()), self.load_cart()).await
    }

    async fn load_books(&self, ack: Ack) -> Settled {
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "books",
                "Failed to get books",
                self.ctx.api.get_book_in_cart(),
                |s, books| {
                    s.books = books;
                    s.pagination.current_page = 0;
                    ack
                },
            )
            .await
    }

    async fn load_cart(&self) -> Settled {
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "cart",
                "Failed to get the cart",
                self.ctx.api.get_cart_data(),
                |s, cart| {
                    s.cart = cart.unwrap_or_default();
                    Ack::quiet()
                },
            )
            .await
    }

    pub fn edit_checkout(&self, edit: impl FnOnce(&mut CheckoutForm)) {
        self.view.update(|s| edit(&mut s.checkout));
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        self.view.update(|s| {
            let len = s.books.len();
            s.pagination.go_to(page, len)
        })
    }

    /// Submits the checkout form; `None` when the form is incomplete.
    pub async fn checkout(&self) -> Option<Settled> {
        let form = self
            .view
            .read(|s| s.checkout.is_complete().then(|| s.checkout.clone()))?;
        let settled = self
            .view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "checkout",
                "Failed to checkout",
                self.ctx.api.checkout(&form),
                |s, receipt| {
                    if !receipt.accepted() {
                        return refused("Failed to checkout", &receipt);
                    }
                    s.checkout = CheckoutForm::default();
                    s.next_location = Some(THANK_YOU_LOCATION.to_string());
                    Ack::success(format!("Checked out! Thanks! : {}", receipt.name()))
                },
            )
            .await;
        Some(settled)
    }

    /// Removes one book, then refreshes the listing and the cart total.
    /// `None` when no key is given.
    pub async fn remove_book_from_cart(&self, websafe_book_key: &str) -> Option<Settled> {
        if websafe_book_key.is_empty() {
            return None;
        }
        let settled = self
            .view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "removal",
                "Failed to remove a book",
                self.ctx.api.remove_book_from_cart(websafe_book_key),
                |_, receipt| {
                    if receipt.accepted() {
                        Ack::success(format!("Removed from cart : {}", receipt.name()))
                    } else {
                        refused("Failed to remove a book", &receipt)
                    }
                },
            )
            .await;
        if settled.succeeded() {
            self.reload().await;
        }
        Some(settled)
    }
}
