//! Typed bookstore operations over any [`Gateway`].

use std::sync::Arc;

use super::envelope::{RequestEnvelope, ResponseEnvelope};
use super::models::{
    Book, BookForm, BookQueryForm, Cart, CheckoutForm, Profile, ProfileForm, Receipt,
};
use super::operation::{Operation, BOOK_KEY, CART_KEY};
use super::Gateway;
use crate::error::Result;

/// Cloneable handle the controllers call the bookstore through.
#[derive(Clone)]
pub struct BookstoreApi {
    gateway: Arc<dyn Gateway>,
}

impl BookstoreApi {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    async fn send(&self, request: RequestEnvelope) -> Result<ResponseEnvelope> {
        self.gateway.dispatch(request).await
    }

    async fn send_plain(&self, operation: Operation) -> Result<ResponseEnvelope> {
        self.send(RequestEnvelope::new(operation)).await
    }

    /// The caller's profile; `None` until one has been saved.
    pub async fn get_profile(&self) -> Result<Option<Profile>> {
        let op = Operation::GetProfile;
        self.send_plain(op).await?.into_optional_result(op)
    }

    pub async fn save_profile(&self, form: &ProfileForm) -> Result<Profile> {
        let op = Operation::SaveProfile;
        self.send(RequestEnvelope::with_form(op, form)?)
            .await?
            .into_result(op)
    }

    pub async fn create_book(&self, form: &BookForm) -> Result<Book> {
        let op = Operation::CreateBook;
        self.send(RequestEnvelope::with_form(op, form)?)
            .await?
            .into_result(op)
    }

    pub async fn query_books(&self, query: &BookQueryForm) -> Result<Vec<Book>> {
        let op = Operation::QueryBooks;
        self.send(RequestEnvelope::with_form(op, query)?)
            .await?
            .into_items(op)
    }

    pub async fn get_book(&self, websafe_book_key: &str) -> Result<Book> {
        let op = Operation::GetBook;
        self.send(RequestEnvelope::new(op).with_param(BOOK_KEY, websafe_book_key))
            .await?
            .into_result(op)
    }

    pub async fn add_book_to_cart(&self, websafe_book_key: &str) -> Result<Receipt> {
        let op = Operation::AddBookToCart;
        self.send(RequestEnvelope::new(op).with_param(BOOK_KEY, websafe_book_key))
            .await?
            .into_result(op)
    }

    pub async fn remove_book_from_cart(&self, websafe_book_key: &str) -> Result<Receipt> {
        let op = Operation::RemoveBookFromCart;
        self.send(RequestEnvelope::new(op).with_param(BOOK_KEY, websafe_book_key))
            .await?
            .into_result(op)
    }

    /// Books in the caller's ongoing cart.
    pub async fn get_book_in_cart(&self) -> Result<Vec<Book>> {
        let op = Operation::GetBookInCart;
        self.send_plain(op).await?.into_items(op)
    }

    /// The caller's ongoing cart; `None` when nothing has been added yet.
    pub async fn get_cart_data(&self) -> Result<Option<Cart>> {
        let op = Operation::GetCartData;
        self.send_plain(op).await?.into_optional_result(op)
    }

    /// Carts the caller has checked out.
    pub async fn get_cart_created(&self) -> Result<Vec<Cart>> {
        let op = Operation::GetCartCreated;
        self.send_plain(op).await?.into_items(op)
    }

    pub async fn checkout(&self, form: &CheckoutForm) -> Result<Receipt> {
        let op = Operation::Checkout;
        self.send(RequestEnvelope::with_form(op, form)?)
            .await?
            .into_result(op)
    }

    pub async fn get_cart(&self, websafe_cart_key: &str) -> Result<Cart> {
        let op = Operation::GetCart;
        self.send(RequestEnvelope::new(op).with_param(CART_KEY, websafe_cart_key))
            .await?
            .into_result(op)
    }

    pub async fn get_book_in_cart_history(&self, websafe_cart_key: &str) -> Result<Vec<Book>> {
        let op = Operation::GetBookInCartHistory;
        self.send(RequestEnvelope::new(op).with_param(CART_KEY, websafe_cart_key))
            .await?
            .into_items(op)
    }

    /// Every checked-out cart in the store.
    pub async fn get_all_cart(&self) -> Result<Vec<Cart>> {
        let op = Operation::GetAllCart;
        self.send_plain(op).await?.into_items(op)
    }
}
