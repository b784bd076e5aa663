//! Book detail page: show one book and add it to the cart.

use super::AppContext;
use crate::gateway::models::Book;
use crate::view::{Ack, HasStatus, Settled, ViewCell, ViewScope, ViewStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDetailState {
    pub book: Book,
    /// Set once the book has been added to the ongoing cart.
    pub is_user_attending: bool,
    pub status: ViewStatus,
}

impl HasStatus for BookDetailState {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

#[derive(Clone)]
pub struct BookDetailController {
    ctx: AppContext,
    scope: ViewScope,
    websafe_book_key: String,
    view: ViewCell<BookDetailState>,
}

impl BookDetailController {
    pub fn new(ctx: AppContext, websafe_book_key: impl Into<String>) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            websafe_book_key: websafe_book_key.into(),
            view: ViewCell::default(),
        }
    }

    pub fn state(&self) -> BookDetailState {
        self.view.snapshot()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    pub async fn init(&self) -> Settled {
        let key = &self.websafe_book_key;
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "book",
                &format!("Failed to get the book : {key}"),
                self.ctx.api.get_book(key),
                |s, book| {
                    s.book = book;
                    Ack::loaded()
                },
            )
            .await
    }

    pub async fn add_book_to_cart(&self) -> Settled {
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "attending",
                "Failed to add this book to cart",
                self.ctx.api.add_book_to_cart(&self.websafe_book_key),
                |s, receipt| {
                    if receipt.accepted() {
                        s.is_user_attending = true;
                        Ack::success("Successfully Added to cart")
                    } else {
                        Ack::warning("Failed to add this book to cart")
                    }
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::{context, ScriptedGateway};
    use crate::gateway::Operation;
    use crate::view::Severity;
    use serde_json::json;

    #[tokio::test]
    async fn test_init_loads_the_book() {
        let gateway = ScriptedGateway::new();
        gateway.respond_result(
            Operation::GetBook,
            json!({ "websafeKey": "abc", "name": "Dune", "price": 9.5 }),
        );
        let detail = BookDetailController::new(context(&gateway), "abc");

        assert_eq!(detail.init().await, Settled::Succeeded);

        let state = detail.state();
        assert_eq!(state.book.name, "Dune");
        assert_eq!(state.status.severity, Some(Severity::Success));
        assert_eq!(gateway.calls()[0].param_str("websafeBookKey").as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_missing_book_reports_key() {
        let gateway = ScriptedGateway::new();
        gateway.respond_error(Operation::GetBook, 404, "No book found with key: zzz");
        let detail = BookDetailController::new(context(&gateway), "zzz");

        assert_eq!(detail.init().await, Settled::Failed);
        assert_eq!(
            detail.state().status.message,
            "Failed to get the book : zzz : No book found with key: zzz"
        );
    }

    #[tokio::test]
    async fn test_add_to_cart_unauthorized_prompts_sign_in() {
        let gateway = ScriptedGateway::new();
        gateway.respond(
            Operation::AddBookToCart,
            crate::gateway::ResponseEnvelope::from_wire(json!({
                "error": { "code": 401, "message": "login required" },
                "result": { "result": true }
            })),
        );
        let ctx = context(&gateway);
        let session = ctx.session.clone();
        let detail = BookDetailController::new(ctx, "abc");

        assert_eq!(detail.add_book_to_cart().await, Settled::Unauthorized);

        let state = detail.state();
        assert!(!state.is_user_attending);
        assert!(!state.status.loading);
        assert_eq!(session.sign_in_prompts(), 1);
    }

    #[tokio::test]
    async fn test_add_to_cart_success_and_refusal() {
        let gateway = ScriptedGateway::new();
        gateway.respond_result(Operation::AddBookToCart, json!({ "result": false }));
        gateway.respond_result(Operation::AddBookToCart, json!({ "result": true }));
        let detail = BookDetailController::new(context(&gateway), "abc");

        assert_eq!(detail.add_book_to_cart().await, Settled::Succeeded);
        let refused = detail.state();
        assert!(!refused.is_user_attending);
        assert_eq!(refused.status.severity, Some(Severity::Warning));

        detail.add_book_to_cart().await;
        let added = detail.state();
        assert!(added.is_user_attending);
        assert_eq!(added.status.message, "Successfully Added to cart");
    }
}
