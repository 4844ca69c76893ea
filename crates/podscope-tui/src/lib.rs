//! TUI components for podscope
//!
//! This crate provides the terminal user interface for podscope,
//! including state management, keybindings, settings, event handling,
//! and UI components.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{
    Action, AppState, Completion, ContextChoice, Flash, Panel, PodFilter, RequestTracker, Screen,
    Ticket, UiState, Viewer, ViewerKind,
};
pub use config::{ContextStore, KeyBinding, KeyBindings, KeyContext, Settings};
pub use tui::{Event, EventHandler, Tui, copy_to_clipboard};
pub use ui::components::{
    ErrorPopup, HelpOverlay, ListSelector, ListSelectorExt, SpinnerOverlay, StatusBar, TextViewer,
    list_nav_hints, pod_list_hints, viewer_hints,
};
pub use ui::screens::{ContextSelectScreen, PodListScreen};
pub use ui::{Layout, Theme};
