//! Reference Gateway Helpers
//!
//! Small pure functions used by the handlers: key generation, caller
//! identity, catalog filtering and log formatting.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use super::error::ApiError;
use crate::gateway::models::{Book, BookForm, Cart, Filter, FilterField};

/// A fresh opaque websafe key.
pub fn new_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The calling user, identified by the bearer token.
///
/// A missing header or an empty token is an anonymous caller.
pub fn caller(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::Unauthorized)
}

pub fn book_from_form(websafe_key: String, form: BookForm) -> Book {
    Book {
        websafe_key,
        name: form.name,
        description: form.description,
        category: form.category,
        author: form.author,
        price: form.price,
    }
}

fn field_value(book: &Book, field: FilterField) -> &str {
    match field {
        FilterField::Name => &book.name,
        FilterField::Author => &book.author,
    }
}

/// Filters are `field starts with value` conditions.
pub fn matches(book: &Book, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|filter| field_value(book, filter.field).starts_with(&filter.value))
}

/// Sorts a listing on the filtered field, or on the name when unfiltered.
pub fn sort_books(books: &mut [Book], filters: &[Filter]) {
    let field = filters.first().map_or(FilterField::Name, |filter| filter.field);
    books.sort_by(|a, b| field_value(a, field).cmp(field_value(b, field)));
}

/// One-line summary of a cart for the logs, e.g. `"3 book(s), total 27.50"`.
pub fn format_cart_summary(cart: &Cart) -> String {
    format!("{} book(s), total {:.2}", cart.book_keys.len(), cart.total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn book(name: &str, author: &str) -> Book {
        Book {
            name: name.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_caller_reads_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(caller(&headers), Err(ApiError::Unauthorized));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(caller(&headers), Err(ApiError::Unauthorized));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer ann"));
        assert_eq!(caller(&headers), Ok("ann".to_string()));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearerann"));
        assert_eq!(caller(&headers), Err(ApiError::Unauthorized));
    }

    #[test]
    fn test_prefix_filters() {
        let dune = book("Dune", "Frank Herbert");
        let by_name = [Filter {
            field: FilterField::Name,
            value: "Du".into(),
        }];
        let by_author = [Filter {
            field: FilterField::Author,
            value: "Herbert".into(),
        }];
        assert!(matches(&dune, &[]));
        assert!(matches(&dune, &by_name));
        assert!(!matches(&dune, &by_author));
    }

    #[test]
    fn test_sort_on_filtered_field() {
        let mut books = vec![book("B", "x"), book("A", "z"), book("C", "y")];
        sort_books(&mut books, &[]);
        assert_eq!(books[0].name, "A");

        let by_author = [Filter {
            field: FilterField::Author,
            value: String::new(),
        }];
        sort_books(&mut books, &by_author);
        let authors: Vec<_> = books.iter().map(|b| b.author.as_str()).collect();
        assert_eq!(authors, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_cart_summary() {
        let cart = Cart {
            book_keys: vec!["a".into(), "b".into()],
            total: 19.5,
            ..Default::default()
        };
        assert_eq!(format_cart_summary(&cart), "2 book(s), total 19.50");
    }
}
