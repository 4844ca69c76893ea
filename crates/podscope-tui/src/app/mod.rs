//! Application state and actions

mod action;
mod filter;
mod requests;
mod state;

pub use action::Action;
pub use filter::PodFilter;
pub use requests::{Panel, RequestTracker, Ticket};
pub use state::{AppState, Completion, ContextChoice, Flash, Screen, UiState, Viewer, ViewerKind};
