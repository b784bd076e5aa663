//! Gateway operation catalogue
//!
//! Every remote procedure the views call, with the HTTP layout the bookstore
//! API serves it under.

use reqwest::Method;

/// Name of the path parameter identifying a book.
pub const BOOK_KEY: &str = "websafeBookKey";
/// Name of the path parameter identifying a cart.
pub const CART_KEY: &str = "websafeCartKey";

/// A remote procedure exposed by the bookstore gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetProfile,
    SaveProfile,
    CreateBook,
    QueryBooks,
    GetBook,
    AddBookToCart,
    RemoveBookFromCart,
    GetBookInCart,
    GetCartData,
    GetCartCreated,
    Checkout,
    GetCart,
    GetBookInCartHistory,
    GetAllCart,
}

/// Where non-path parameters travel on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPlacement {
    /// No parameters besides the path.
    None,
    /// Serialized as the JSON request body.
    Body,
    /// Appended as query string pairs.
    Query,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::GetProfile,
        Operation::SaveProfile,
        Operation::CreateBook,
        Operation::QueryBooks,
        Operation::GetBook,
        Operation::AddBookToCart,
        Operation::RemoveBookFromCart,
        Operation::GetBookInCart,
        Operation::GetCartData,
        Operation::GetCartCreated,
        Operation::Checkout,
        Operation::GetCart,
        Operation::GetBookInCartHistory,
        Operation::GetAllCart,
    ];

    /// Procedure name as the gateway publishes it.
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetProfile => "getProfile",
            Operation::SaveProfile => "saveProfile",
            Operation::CreateBook => "createBook",
            Operation::QueryBooks => "queryBooks",
            Operation::GetBook => "getBook",
            Operation::AddBookToCart => "addBookToCart",
            Operation::RemoveBookFromCart => "removeBookFromCart",
            Operation::GetBookInCart => "getBookInCart",
            Operation::GetCartData => "getCartData",
            Operation::GetCartCreated => "getCartCreated",
            Operation::Checkout => "checkout",
            Operation::GetCart => "getCart",
            Operation::GetBookInCartHistory => "getBookInCartHistory",
            Operation::GetAllCart => "getAllCart",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::SaveProfile
            | Operation::CreateBook
            | Operation::QueryBooks
            | Operation::AddBookToCart
            | Operation::RemoveBookFromCart
            | Operation::Checkout => Method::POST,
            _ => Method::GET,
        }
    }

    /// Path template relative to the API root. `{name}` segments are filled from the parameters.
    pub fn path(self) -> &'static str {
        match self {
            Operation::GetProfile | Operation::SaveProfile => "profile",
            Operation::CreateBook => "book",
            Operation::QueryBooks => "queryBooks",
            Operation::GetBook | Operation::AddBookToCart => "book/{websafeBookKey}",
            Operation::RemoveBookFromCart => "removeBookFromCart",
            Operation::GetBookInCart => "getBookInCart",
            Operation::GetCartData => "getCartData",
            Operation::GetCartCreated => "getCartCreated",
            Operation::Checkout => "checkout",
            Operation::GetCart => "cart/detail/{websafeCartKey}",
            Operation::GetBookInCartHistory => "cart/{websafeCartKey}",
            Operation::GetAllCart => "getAllCart",
        }
    }

    pub fn placement(self) -> ParamPlacement {
        match self {
            Operation::SaveProfile
            | Operation::CreateBook
            | Operation::QueryBooks
            | Operation::Checkout => ParamPlacement::Body,
            Operation::RemoveBookFromCart => ParamPlacement::Query,
            _ => ParamPlacement::None,
        }
    }

    /// True when the success payload is an `items` collection rather than a single `result`.
    pub fn returns_items(self) -> bool {
        matches!(
            self,
            Operation::QueryBooks
                | Operation::GetBookInCart
                | Operation::GetCartCreated
                | Operation::GetBookInCartHistory
                | Operation::GetAllCart
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_routes_share_a_path_but_not_a_verb() {
        assert_eq!(Operation::GetBook.path(), Operation::AddBookToCart.path());
        assert_eq!(Operation::GetBook.method(), Method::GET);
        assert_eq!(Operation::AddBookToCart.method(), Method::POST);
    }

    #[test]
    fn test_listing_operations() {
        let listings: Vec<_> = Operation::ALL
            .iter()
            .filter(|op| op.returns_items())
            .map(|op| op.name())
            .collect();
        assert_eq!(
            listings,
            vec![
                "queryBooks",
                "getBookInCart",
                "getCartCreated",
                "getBookInCartHistory",
                "getAllCart"
            ]
        );
    }
}
