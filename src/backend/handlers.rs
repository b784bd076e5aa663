//! REST API handlers for the bookstore operations
//!
//! Paths and verbs follow the gateway operation table. The caller is
//! identified by the bearer token; user operations answer 401 without one.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{error::ApiError, helpers::*, state::SharedState};
use crate::gateway::models::{
    Book, BookForm, BookQueryForm, Cart, CheckoutForm, Profile, ProfileForm, Receipt,
};

/// Root the bookstore API is served under.
pub const API_ROOT: &str = "/_ah/api/bookstore/v1";

const NO_ONGOING_CART: &str = "This user has no on-going cart.";

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Collection payload, `{"items": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookKeyQuery {
    websafe_book_key: Option<String>,
}

/// Creates routes for every bookstore operation, relative to [`API_ROOT`]
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/profile", get(get_profile).post(save_profile))
        .route("/book", post(create_book))
        .route("/queryBooks", post(query_books))
        .route("/book/:websafeBookKey", get(get_book).post(add_book_to_cart))
        .route("/removeBookFromCart", post(remove_book_from_cart))
        .route("/getBookInCart", get(get_book_in_cart))
        .route("/getCartData", get(get_cart_data))
        .route("/getCartCreated", get(get_cart_created))
        .route("/checkout", post(checkout))
        .route("/cart/detail/:websafeCartKey", get(get_cart))
        .route("/cart/:websafeCartKey", get(get_book_in_cart_history))
        .route("/getAllCart", get(get_all_cart))
}

fn book_not_found(key: &str) -> ApiError {
    ApiError::NotFound(format!("No book found with key: {key}"))
}

fn cart_not_found(key: &str) -> ApiError {
    ApiError::NotFound(format!("No cart found with key: {key}"))
}

fn load_book(state: &SharedState, key: &str) -> Result<Book, ApiError> {
    state
        .books
        .get(key)
        .map(|book| book.value().clone())
        .ok_or_else(|| book_not_found(key))
}

/// Books of a cart in insertion order. Keys whose book has vanished are skipped.
fn books_of(state: &SharedState, cart: &Cart) -> Vec<Book> {
    cart.book_keys
        .iter()
        .filter_map(|key| state.books.get(key).map(|book| book.value().clone()))
        .collect()
}

/// Endpoint: GET /profile
/// `null` until the caller has saved a profile.
async fn get_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Option<Profile>> {
    let user = caller(&headers)?;
    Ok(Json(
        state.profiles.get(&user).map(|profile| profile.value().clone()),
    ))
}

/// Endpoint: POST /profile
async fn save_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(form): Json<ProfileForm>,
) -> ApiResult<Profile> {
    let user = caller(&headers)?;
    let mut profile = state
        .profiles
        .entry(user.clone())
        .or_insert_with(|| super::state::default_profile(&user));
    if !form.display_name.is_empty() {
        profile.display_name = form.display_name;
    }
    profile.address = form.address;
    info!(user = %user, "profile saved");
    Ok(Json(profile.value().clone()))
}

/// Endpoint: POST /book
async fn create_book(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(form): Json<BookForm>,
) -> ApiResult<Book> {
    caller(&headers)?;
    let book = book_from_form(new_key(), form);
    state.books.insert(book.websafe_key.clone(), book.clone());
    info!(key = %book.websafe_key, name = %book.name, "book created");
    Ok(Json(book))
}

/// Endpoint: POST /queryBooks
async fn query_books(
    State(state): State<SharedState>,
    Json(form): Json<BookQueryForm>,
) -> ApiResult<Listing<Book>> {
    if form.filters.len() > 1 {
        return Err(ApiError::BadRequest(
            "Now allow only one filter at a time".to_string(),
        ));
    }
    let mut books: Vec<Book> = state
        .books
        .iter()
        .filter(|entry| matches(entry.value(), &form.filters))
        .map(|entry| entry.value().clone())
        .collect();
    sort_books(&mut books, &form.filters);
    Ok(Json(books.into()))
}

/// Endpoint: GET /book/{websafeBookKey}
async fn get_book(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> ApiResult<Book> {
    load_book(&state, &key).map(Json)
}

/// Endpoint: POST /book/{websafeBookKey}
/// Adds the book to the caller's ongoing cart, opening one if needed.
async fn add_book_to_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> ApiResult<Receipt> {
    let user = caller(&headers)?;
    let book = load_book(&state, &key)?;
    let cart_key = state.open_cart(&user);
    let mut stored = state
        .carts
        .get_mut(&cart_key)
        .ok_or_else(|| cart_not_found(&cart_key))?;
    stored.cart.book_keys.push(key);
    stored.cart.total += book.price;
    info!(user = %user, cart = %cart_key, book = %book.name, "added to cart");
    Ok(Json(Receipt {
        result: Some(true),
        reason: None,
        name: Some(book.name),
    }))
}

/// Endpoint: POST /removeBookFromCart?websafeBookKey=...
async fn remove_book_from_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<BookKeyQuery>,
) -> ApiResult<Receipt> {
    let user = caller(&headers)?;
    let key = query
        .websafe_book_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| book_not_found(""))?;
    let book = load_book(&state, &key)?;
    let cart_key = state
        .ongoing_cart_key(&user)
        .ok_or_else(|| ApiError::Forbidden(NO_ONGOING_CART.to_string()))?;

    let mut stored = state
        .carts
        .get_mut(&cart_key)
        .ok_or_else(|| cart_not_found(&cart_key))?;
    let position = stored
        .cart
        .book_keys
        .iter()
        .position(|k| *k == key)
        .ok_or_else(|| ApiError::NotFound(format!("Book not in cart: {key}")))?;
    stored.cart.book_keys.remove(position);
    stored.cart.total -= book.price;
    info!(user = %user, cart = %cart_key, book = %book.name, "removed from cart");
    Ok(Json(Receipt {
        result: Some(true),
        reason: None,
        name: Some(book.name),
    }))
}

/// Endpoint: GET /getBookInCart
async fn get_book_in_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Listing<Book>> {
    let user = caller(&headers)?;
    let cart = state
        .ongoing_cart_key(&user)
        .and_then(|key| state.carts.get(&key).map(|stored| stored.cart.clone()));
    let books = cart.map(|cart| books_of(&state, &cart)).unwrap_or_default();
    Ok(Json(books.into()))
}

/// Endpoint: GET /getCartData
/// `null` while the caller has no ongoing cart.
async fn get_cart_data(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Option<Cart>> {
    let user = caller(&headers)?;
    let stored = state
        .ongoing_cart_key(&user)
        .and_then(|key| state.carts.get(&key).map(|stored| stored.value().clone()));
    Ok(Json(stored.map(|stored| state.cart_view(&stored))))
}

/// Endpoint: GET /getCartCreated
async fn get_cart_created(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Listing<Cart>> {
    let user = caller(&headers)?;
    Ok(Json(state.checked_out_carts(Some(&user)).into()))
}

/// Endpoint: POST /checkout
/// Closes the ongoing cart with the shipping and payment details.
async fn checkout(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(form): Json<CheckoutForm>,
) -> ApiResult<Receipt> {
    let user = caller(&headers)?;
    let Some(cart_key) = state.ongoing_cart_key(&user) else {
        return Ok(Json(refused(NO_ONGOING_CART)));
    };
    {
        let Some(mut stored) = state.carts.get_mut(&cart_key) else {
            return Err(cart_not_found(&cart_key));
        };
        let cart = &mut stored.cart;
        cart.address = Some(form.address);
        cart.card_name = Some(form.card_name);
        cart.card_number = Some(form.card_number);
        cart.card_expiry_date = Some(form.card_expiry_date);
        cart.card_ccv = form.card_ccv;
        cart.date = Some(Utc::now().to_rfc3339());
        cart.checked_out = true;
        info!(user = %user, cart = %cart_key, "checked out: {}", format_cart_summary(cart));
    }

    let name = match state.profiles.get_mut(&user) {
        Some(mut profile) => {
            profile.on_going_cart_id = None;
            profile.display_name.clone()
        }
        None => user,
    };
    Ok(Json(Receipt {
        result: Some(true),
        reason: None,
        name: Some(name),
    }))
}

fn refused(reason: &str) -> Receipt {
    Receipt {
        result: Some(false),
        reason: Some(reason.to_string()),
        name: None,
    }
}

/// Endpoint: GET /cart/detail/{websafeCartKey}
async fn get_cart(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> ApiResult<Cart> {
    let stored = state
        .carts
        .get(&key)
        .map(|stored| stored.value().clone())
        .ok_or_else(|| cart_not_found(&key))?;
    Ok(Json(state.cart_view(&stored)))
}

/// Endpoint: GET /cart/{websafeCartKey}
async fn get_book_in_cart_history(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> ApiResult<Listing<Book>> {
    caller(&headers)?;
    let cart = state
        .carts
        .get(&key)
        .map(|stored| stored.cart.clone())
        .ok_or_else(|| cart_not_found(&key))?;
    Ok(Json(books_of(&state, &cart).into()))
}

/// Endpoint: GET /getAllCart
async fn get_all_cart(State(state): State<SharedState>) -> ApiResult<Listing<Cart>> {
    Ok(Json(state.checked_out_carts(None).into()))
}
