mod error_popup;
mod help_overlay;
mod list_selector;
mod spinner;
mod status_bar;
mod text_viewer;

pub use error_popup::ErrorPopup;
pub use help_overlay::HelpOverlay;
pub use list_selector::{ListSelector, ListSelectorExt};
pub use spinner::SpinnerOverlay;
pub use status_bar::{StatusBar, list_nav_hints, pod_list_hints, viewer_hints};
pub use text_viewer::TextViewer;
