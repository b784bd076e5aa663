//! Create-book page.

use super::AppContext;
use crate::gateway::models::BookForm;
use crate::view::{Ack, HasStatus, Settled, ViewCell, ViewScope, ViewStatus};

/// Categories offered when creating a book.
pub const CATEGORIES: [&str; 34] = [
    "Art & Photography",
    "Audio Books",
    "Biography",
    "Business, Finance & Law",
    "Children Books",
    "Computing",
    "Crafts and Hobbies",
    "Crime & Thriller",
    "Dictionaries & Languages",
    "Entertainment",
    "Fiction",
    "Food & Drink",
    "Graphic Novels, Anime & Manga",
    "Health",
    "History & Archaeology",
    "Home & Garden",
    "Humour",
    "Medical",
    "Mind, Body & Spirit",
    "Natural History",
    "Personal Development",
    "Poetry & Drama",
    "Reference",
    "Religion",
    "Romance",
    "Science & Geography",
    "Science Fiction, Fantasy & Horror",
    "Society & Social Sciences",
    "Sport",
    "Stationery",
    "Teaching Resources & Education",
    "Technology & Engineering",
    "Transport",
    "Travel & Holiday Guides",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBookState {
    pub book: BookForm,
    pub status: ViewStatus,
}

impl CreateBookState {
    /// A book needs a name and a non-negative price.
    pub fn is_valid(&self) -> bool {
        !self.book.name.trim().is_empty() && self.book.price.is_finite() && self.book.price >= 0.0
    }
}

impl HasStatus for CreateBookState {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

#[derive(Clone)]
pub struct CreateBookController {
    ctx: AppContext,
    scope: ViewScope,
    view: ViewCell<CreateBookState>,
}

impl CreateBookController {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            view: ViewCell::default(),
        }
    }

    pub fn state(&self) -> CreateBookState {
        self.view.snapshot()
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    pub fn edit_book(&self, edit: impl FnOnce(&mut BookForm)) {
        self.view.update(|s| edit(&mut s.book));
    }

    /// Sends the form. Returns `None` without calling the gateway when the
    /// form is not valid.
    pub async fn create_book(&self) -> Option<Settled> {
        let form = self.view.read(|s| s.is_valid().then(|| s.book.clone()))?;
        let settled = self
            .view
            .reconcile(
                &self.scope,
                &self.ctx.session,
                "book",
                "Failed to create a book",
                self.ctx.api.create_book(&form),
                |s, created| {
                    s.book = BookForm::default();
                    Ack::success(format!("The book has been created : {}", created.name))
                },
            )
            .await;
        Some(settled)
    }
}
