//! Every checked-out cart in the store.

use super::AppContext;
use crate::gateway::models::Cart;
use crate::view::{Ack, Settled, ViewCell, ViewScope, ViewState};

#[derive(Clone)]
pub struct AllCartsController {
    ctx: AppContext,
    scope: ViewScope,
    view: ViewCell<ViewState<Cart>>,
}

impl AllCartsController {
    pub fn new(ctx: AppContext) -> Self {
        let view = ViewCell::new(ViewState::with_pagination(ctx.pagination()));
        Self {
            ctx,
            scope: ViewScope::new(),
            view,
        }
    }

    pub fn state(&self) -> ViewState<Cart> {
        self.view.snapshot()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        self.view.update(|s| {
            let len = s.items.len();
            s.pagination.go_to(page, len)
        })
    }

    pub async fn init(&self) -> Settled {
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "carts",
                "Failed to query the cart created",
                self.ctx.api.get_all_cart(),
                |s, carts| {
                    s.replace_items(carts);
                    s.pagination.current_page = 0;
                    Ack::listed("DONE")
                },
            )
            .await
    }
}
