use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::{Layout, Theme};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Contexts",
        &[
            ("j/k", "Move selection"),
            ("Enter", "Show pods of context"),
            ("y", "Copy context name"),
            ("X", "Forget saved context"),
        ],
    ),
    (
        "Pods",
        &[
            ("Enter/l", "View logs"),
            ("d", "Describe pod"),
            ("r", "Refresh pods"),
            ("/", "Filter pods (regex)"),
            ("n", "Clear filter"),
            ("Esc", "Back to contexts"),
        ],
    ),
    (
        "Viewer",
        &[
            ("j/k", "Scroll"),
            ("Ctrl+d/u", "Page down/up"),
            ("g/G", "Top/bottom"),
            ("y", "Copy content"),
            ("Esc", "Close"),
        ],
    ),
    (
        "Anywhere",
        &[
            ("x", "Dismiss error"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

/// Keybinding reference, toggled with `?`
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let area = Layout::fixed_popup(frame.area(), 50, 30);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(" Help ", Theme::title()));
        frame.render_widget(Paragraph::new(Self::lines()).block(block), area);
    }

    fn lines() -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(
            "Keybindings",
            Theme::text().add_modifier(Modifier::BOLD),
        ))];
        for (section, keys) in SECTIONS {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(*section, Theme::text_highlight())));
            lines.extend(keys.iter().map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("  {:>8}", key), Style::default().fg(Theme::SUCCESS)),
                    Span::styled(format!("  {}", desc), Theme::text()),
                ])
            }));
        }
        lines
    }
}
