mod keybindings;
mod settings;
mod store;

pub use keybindings::{KeyBinding, KeyBindings, KeyContext};
pub use settings::{DEFAULT_SERVER_URL, ServerSettings, Settings, UiSettings};
pub use store::ContextStore;
