//! View Module
//!
//! The reusable part of every page controller:
//! - View state records and the status banner
//! - The per-activation scope used to cancel in-flight calls
//! - The reconciler that folds gateway outcomes into view state

pub mod cell;
pub mod scope;
pub mod state;

pub use cell::{Settled, ViewCell};
pub use scope::ViewScope;
pub use state::{Ack, HasStatus, Severity, ViewState, ViewStatus};
