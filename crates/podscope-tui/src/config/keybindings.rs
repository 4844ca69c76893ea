use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    /// Context selection list
    ListNavigation,
    PodList,
    FilterInput,
    /// Logs or describe overlay
    Viewer,
}

type BindingTable = HashMap<KeyBinding, Action>;

fn table(entries: impl IntoIterator<Item = (KeyBinding, Action)>) -> BindingTable {
    entries.into_iter().collect()
}

/// j/k and the arrow keys move the selection of any list
fn list_motion() -> [(KeyBinding, Action); 4] {
    [
        (KeyBinding::new(KeyCode::Char('j')), Action::ListDown),
        (KeyBinding::new(KeyCode::Down), Action::ListDown),
        (KeyBinding::new(KeyCode::Char('k')), Action::ListUp),
        (KeyBinding::new(KeyCode::Up), Action::ListUp),
    ]
}

/// Context bindings shared by both screens
fn context_management() -> [(KeyBinding, Action); 2] {
    [
        (KeyBinding::new(KeyCode::Char('y')), Action::CopyContext),
        (KeyBinding::shift(KeyCode::Char('X')), Action::ClearContext),
    ]
}

/// Keybinding configuration, one table per focus context
pub struct KeyBindings {
    bindings: HashMap<KeyContext, BindingTable>,
}

impl KeyBindings {
    pub fn new() -> Self {
        use KeyBinding as K;

        let global = table([
            (K::new(KeyCode::Char('?')), Action::ToggleHelp),
            (K::new(KeyCode::Esc), Action::GoBack),
            (K::ctrl(KeyCode::Char('c')), Action::Quit),
            (K::new(KeyCode::Char('q')), Action::Quit),
            (K::new(KeyCode::Char('x')), Action::DismissError),
        ]);

        let contexts = table(
            list_motion()
                .into_iter()
                .chain(context_management())
                .chain([(K::new(KeyCode::Enter), Action::ListSelect)]),
        );

        let pods = table(list_motion().into_iter().chain(context_management()).chain([
            (K::new(KeyCode::Enter), Action::ViewLogs),
            (K::new(KeyCode::Char('l')), Action::ViewLogs),
            (K::new(KeyCode::Char('d')), Action::DescribePod),
            (K::new(KeyCode::Char('r')), Action::RefreshPods),
            (K::new(KeyCode::Char('/')), Action::OpenSearch),
            (K::new(KeyCode::Char('n')), Action::ClearFilter),
        ]));

        // less-like paging
        let viewer = table([
            (K::new(KeyCode::Char('j')), Action::ScrollDown(1)),
            (K::new(KeyCode::Down), Action::ScrollDown(1)),
            (K::new(KeyCode::Char('k')), Action::ScrollUp(1)),
            (K::new(KeyCode::Up), Action::ScrollUp(1)),
            (K::ctrl(KeyCode::Char('f')), Action::PageDown),
            (K::ctrl(KeyCode::Char('d')), Action::PageDown),
            (K::new(KeyCode::PageDown), Action::PageDown),
            (K::ctrl(KeyCode::Char('b')), Action::PageUp),
            (K::ctrl(KeyCode::Char('u')), Action::PageUp),
            (K::new(KeyCode::PageUp), Action::PageUp),
            (K::new(KeyCode::Char('g')), Action::ScrollToTop),
            (K::new(KeyCode::Home), Action::ScrollToTop),
            (K::shift(KeyCode::Char('G')), Action::ScrollToBottom),
            (K::new(KeyCode::End), Action::ScrollToBottom),
            (K::new(KeyCode::Char('y')), Action::CopyViewer),
            (K::new(KeyCode::Esc), Action::CloseViewer),
            (K::new(KeyCode::Char('q')), Action::CloseViewer),
        ]);

        let search = table([
            (K::new(KeyCode::Enter), Action::ApplyFilter),
            (K::new(KeyCode::Esc), Action::CloseSearch),
            (K::ctrl(KeyCode::Char('c')), Action::CloseSearch),
            (K::new(KeyCode::Backspace), Action::SearchBackspace),
            (K::ctrl(KeyCode::Char('u')), Action::SearchClear),
        ]);

        Self {
            bindings: HashMap::from([
                (KeyContext::Global, global),
                (KeyContext::ListNavigation, contexts),
                (KeyContext::PodList, pods),
                (KeyContext::Viewer, viewer),
                (KeyContext::FilterInput, search),
            ]),
        }
    }

    fn lookup(&self, context: KeyContext, binding: &KeyBinding) -> Option<Action> {
        self.bindings.get(&context)?.get(binding).cloned()
    }

    /// Action for `key` in `context`, falling back to the global table
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);
        self.lookup(context, &binding)
            .or_else(|| self.lookup(KeyContext::Global, &binding))
    }

    /// Action for `key` while the search bar has focus.
    ///
    /// Printable characters become search input; other unbound keys are ignored.
    pub fn get_filter_input_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);
        if let Some(action) = self.lookup(KeyContext::FilterInput, &binding) {
            return Some(action);
        }

        match key.code {
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                Some(Action::SearchInput(c))
            }
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_context_binding_overrides_global() {
        let keys = KeyBindings::new();
        let q = key(KeyCode::Char('q'));
        assert_eq!(keys.get_action(KeyContext::PodList, &q), Some(Action::Quit));
        assert_eq!(keys.get_action(KeyContext::Viewer, &q), Some(Action::CloseViewer));

        let esc = key(KeyCode::Esc);
        assert_eq!(keys.get_action(KeyContext::PodList, &esc), Some(Action::GoBack));
        assert_eq!(keys.get_action(KeyContext::Viewer, &esc), Some(Action::CloseViewer));
    }

    #[test]
    fn test_pod_list_actions() {
        let keys = KeyBindings::new();
        let lookup = |c| keys.get_action(KeyContext::PodList, &key(KeyCode::Char(c)));
        assert_eq!(lookup('l'), Some(Action::ViewLogs));
        assert_eq!(lookup('d'), Some(Action::DescribePod));
        assert_eq!(lookup('r'), Some(Action::RefreshPods));
        assert_eq!(lookup('y'), Some(Action::CopyContext));
        assert_eq!(lookup('z'), None);

        let shift_x = KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT);
        assert_eq!(keys.get_action(KeyContext::PodList, &shift_x), Some(Action::ClearContext));
    }

    #[test]
    fn test_context_list_keys() {
        let keys = KeyBindings::new();
        let enter = key(KeyCode::Enter);
        assert_eq!(keys.get_action(KeyContext::ListNavigation, &enter), Some(Action::ListSelect));
        assert_eq!(keys.get_action(KeyContext::PodList, &enter), Some(Action::ViewLogs));
        assert_eq!(
            keys.get_action(KeyContext::ListNavigation, &key(KeyCode::Char('y'))),
            Some(Action::CopyContext)
        );
        assert_eq!(
            keys.get_action(KeyContext::ListNavigation, &key(KeyCode::Char('d'))),
            None
        );
    }

    #[test]
    fn test_viewer_paging() {
        let keys = KeyBindings::new();
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(keys.get_action(KeyContext::Viewer, &ctrl_d), Some(Action::PageDown));
        let shift_g = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(keys.get_action(KeyContext::Viewer, &shift_g), Some(Action::ScrollToBottom));
    }

    #[test]
    fn test_filter_input_captures_characters() {
        let keys = KeyBindings::new();
        assert_eq!(
            keys.get_filter_input_action(&key(KeyCode::Char('q'))),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            keys.get_filter_input_action(&key(KeyCode::Enter)),
            Some(Action::ApplyFilter)
        );
        assert_eq!(keys.get_filter_input_action(&key(KeyCode::Tab)), None);

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(keys.get_filter_input_action(&ctrl_u), Some(Action::SearchClear));
    }
}
