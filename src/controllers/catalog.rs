//! Catalog page: filter and list books.

use super::AppContext;
use crate::gateway::models::{Book, BookQueryForm, Filter, FilterField};
use crate::pagination::Pagination;
use crate::view::{Ack, HasStatus, Settled, ViewCell, ViewScope, ViewStatus};

/// Catalog tabs. Only the full catalog exists today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogTab {
    #[default]
    All,
}

/// A filter row as the user is editing it; rows with an empty value are not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDraft {
    pub field: FilterField,
    pub value: String,
}

impl Default for FilterDraft {
    fn default() -> Self {
        Self {
            field: FilterField::ALL[0],
            value: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub selected_tab: CatalogTab,
    pub filters: Vec<FilterDraft>,
    pub books: Vec<Book>,
    pub pagination: Pagination,
    pub status: ViewStatus,
}

impl CatalogState {
    /// The query the current filter rows describe.
    pub fn query(&self) -> BookQueryForm {
        BookQueryForm {
            filters: self
                .filters
                .iter()
                .filter(|draft| !draft.value.is_empty())
                .map(|draft| Filter {
                    field: draft.field,
                    value: draft.value.clone(),
                })
                .collect(),
        }
    }

    pub fn page(&self) -> &[Book] {
        self.pagination.page(&self.books)
    }

    pub fn page_array(&self) -> Vec<usize> {
        self.pagination.page_array(self.books.len())
    }
}

impl HasStatus for CatalogState {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

#[derive(Clone)]
pub struct CatalogController {
    ctx: AppContext,
    scope: ViewScope,
    view: ViewCell<CatalogState>,
}

impl CatalogController {
    pub fn new(ctx: AppContext) -> Self {
        let view = ViewCell::new(CatalogState {
            pagination: ctx.pagination(),
            ..Default::default()
        });
        Self {
            ctx,
            scope: ViewScope::new(),
            view,
        }
    }

    pub fn state(&self) -> CatalogState {
        self.view.snapshot()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    /// Appends an empty filter on the first filterable field.
    pub fn add_filter(&self) {
        self.view.update(|s| s.filters.push(FilterDraft::default()));
    }

    pub fn set_filter(&self, index: usize, field: FilterField, value: impl Into<String>) -> bool {
        let value = value.into();
        self.view.update(|s| match s.filters.get_mut(index) {
            Some(draft) => {
                draft.field = field;
                draft.value = value;
                true
            }
            None => false,
        })
    }

    pub fn remove_filter(&self, index: usize) -> bool {
        self.view.update(|s| {
            if index < s.filters.len() {
                s.filters.remove(index);
                true
            } else {
                false
            }
        })
    }

    pub fn clear_filters(&self) {
        self.view.update(|s| s.filters.clear());
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        self.view.update(|s| {
            let len = s.books.len();
            s.pagination.go_to(page, len)
        })
    }

    pub async fn tab_all_selected(&self) -> Settled {
        self.view.update(|s| s.selected_tab = CatalogTab::All);
        self.query_books().await
    }

    /// Queries the tab currently selected.
    pub async fn query_books(&self) -> Settled {
        match self.view.read(|s| s.selected_tab) {
            CatalogTab::All => self.query_books_all().await,
        }
    }

    async fn query_books_all(&self) -> Settled {
        let query = self.view.read(CatalogState::query);
        let described = serde_json::to_string(&query).unwrap_or_default();
        self.view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "books",
                "Failed to query",
                self.ctx.api.query_books(&query),
                |s, books| {
                    s.books = books;
                    s.pagination.current_page = 0;
                    Ack::listed(format!("Query succeeded : {described}"))
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
    async fn test_query_fills_books() {
        let gateway = ScriptedGateway::new();
        gateway.respond_items(
            Operation::QueryBooks,
            vec![json!({ "name": "bookA" }), json!({ "name": "bookB" })],
        );
        let catalog = CatalogController::new(context(&gateway));

        assert_eq!(catalog.query_books().await, Settled::Succeeded);

        let state = catalog.state();
        let names: Vec<_> = state.books.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["bookA", "bookB"]);
        assert_eq!(state.status.severity, Some(Severity::Success));
        assert!(state.status.submitted);
        assert!(!state.status.loading);
        assert_eq!(
            gateway.calls()[0].params().get("filters"),
            Some(&json!([]))
        );
    }

    #[tokio::test]
    async fn test_repeated_query_does_not_accumulate() {
        let gateway = ScriptedGateway::new();
        for _ in 0..2 {
            gateway.respond_items(Operation::QueryBooks, vec![json!({ "name": "bookA" })]);
        }
        let catalog = CatalogController::new(context(&gateway));

        catalog.query_books().await;
        catalog.query_books().await;

        assert_eq!(catalog.state().books.len(), 1);
    }

    #[tokio::test]
    async fn test_only_filled_filters_are_sent() {
        let gateway = ScriptedGateway::new();
        gateway.respond_items(Operation::QueryBooks, vec![]);
        let catalog = CatalogController::new(context(&gateway));

        catalog.add_filter();
        catalog.add_filter();
        catalog.add_filter();
        assert!(catalog.set_filter(0, FilterField::Author, "Herbert"));
        assert!(catalog.remove_filter(2));
        assert!(!catalog.remove_filter(5));
        assert_eq!(catalog.state().filters.len(), 2);

        catalog.tab_all_selected().await;

        assert_eq!(
            gateway.calls()[0].params().get("filters"),
            Some(&json!([{ "field": "AUTHOR", "value": "Herbert" }]))
        );
        assert!(catalog
            .state()
            .status
            .message
            .starts_with("Query succeeded : "));

        catalog.clear_filters();
        assert!(catalog.state().filters.is_empty());
    }

    #[tokio::test]
    async fn test_failed_query_keeps_previous_books() {
        let gateway = ScriptedGateway::new();
        gateway.respond_items(Operation::QueryBooks, vec![json!({ "name": "bookA" })]);
        gateway.respond_error(Operation::QueryBooks, 400, "Now allow only one filter at a time");
        let catalog = CatalogController::new(context(&gateway));

        catalog.query_books().await;
        assert_eq!(catalog.query_books().await, Settled::Failed);

        let state = catalog.state();
        assert_eq!(state.books.len(), 1);
        assert_eq!(state.status.severity, Some(Severity::Warning));
        assert_eq!(
            state.status.message,
            "Failed to query : Now allow only one filter at a time"
        );
    }

    #[tokio::test]
    async fn test_pages_follow_the_listing() {
        let gateway = ScriptedGateway::new();
        let books = (0..45).map(|i| json!({ "name": format!("b{i}") })).collect();
        gateway.respond_items(Operation::QueryBooks, books);
        let catalog = CatalogController::new(context(&gateway));

        catalog.query_books().await;

        assert_eq!(catalog.state().page_array(), vec![0, 1, 2]);
        assert!(catalog.go_to_page(2));
        assert_eq!(catalog.state().page().len(), 5);
        assert!(!catalog.go_to_page(3));
    }
}
