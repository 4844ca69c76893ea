//! Terminal setup, input events and clipboard

mod clipboard;
mod event;
mod terminal;

pub use clipboard::{copy_to_clipboard, osc52_sequence, write_clipboard};
pub use event::{Event, EventHandler};
pub use terminal::Tui;
