//! View state records
//!
//! What a page binds to: its data plus a status banner.

use crate::pagination::Pagination;

/// Colour of the status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
}

/// Loading flags and banner shared by every view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewStatus {
    pub loading: bool,
    pub submitted: bool,
    pub message: String,
    /// `None` until the first call has completed.
    pub severity: Option<Severity>,
}

impl ViewStatus {
    /// Banner set by the view itself rather than by a gateway call.
    pub fn announce(&mut self, severity: Severity, message: impl Into<String>) {
        self.severity = Some(severity);
        self.message = message.into();
    }
}

/// Implemented by every view state so the reconciler can drive its banner.
pub trait HasStatus {
    fn status(&self) -> &ViewStatus;
    fn status_mut(&mut self) -> &mut ViewStatus;
}

/// State of a plain listing view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub status: ViewStatus,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::with_pagination(Pagination::default())
    }
}

impl<T> ViewState<T> {
    pub fn with_pagination(pagination: Pagination) -> Self {
        Self {
            items: Vec::new(),
            pagination,
            status: ViewStatus::default(),
        }
    }

    /// Swaps in a fresh listing. Listings are never appended to.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Items on the current page.
    pub fn page(&self) -> &[T] {
        self.pagination.page(&self.items)
    }

    pub fn page_array(&self) -> Vec<usize> {
        self.pagination.page_array(self.items.len())
    }
}

impl<T> HasStatus for ViewState<T> {
    fn status(&self) -> &ViewStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut ViewStatus {
        &mut self.status
    }
}

/// What a success handler reports back for the banner.
///
/// `None` fields leave the banner as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub submitted: bool,
}

impl Ack {
    /// Confirmation after which the user is expected to act again.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            severity: Some(Severity::Success),
            submitted: false,
        }
    }

    /// Confirmation of a completed listing.
    pub fn listed(message: impl Into<String>) -> Self {
        Self {
            submitted: true,
            ..Self::success(message)
        }
    }

    /// The call went through but the gateway refused the action.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            severity: Some(Severity::Warning),
            submitted: false,
        }
    }

    /// Data refreshed without touching the banner.
    pub fn quiet() -> Self {
        Self {
            message: None,
            severity: None,
            submitted: false,
        }
    }

    /// Data shown with a success banner colour, keeping the message.
    pub fn loaded() -> Self {
        Self {
            severity: Some(Severity::Success),
            ..Self::quiet()
        }
    }

    pub fn with_submitted(self, submitted: bool) -> Self {
        Self { submitted, ..self }
    }
}
