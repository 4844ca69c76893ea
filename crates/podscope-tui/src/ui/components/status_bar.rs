use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::Theme;

/// A `(key, description)` pair shown as `[key] description`
pub type Hint<'a> = (&'a str, &'a str);

/// One-line bar: key hints on the left, a counter or flash message on the right
#[derive(Default)]
pub struct StatusBar<'a> {
    hints: Vec<Hint<'a>>,
    right_text: Option<String>,
    flash: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints(mut self, hints: impl IntoIterator<Item = Hint<'a>>) -> Self {
        self.hints = hints.into_iter().collect();
        self
    }

    pub fn right(mut self, text: impl Into<String>) -> Self {
        self.right_text = Some(text.into());
        self
    }

    /// Short-lived message shown instead of the right text
    pub fn flash(mut self, text: Option<&'a str>) -> Self {
        self.flash = text;
        self
    }

    fn hint_line(&self) -> Line<'static> {
        let spans = self.hints.iter().enumerate().flat_map(|(i, (key, desc))| {
            let gap = (i > 0).then(|| Span::styled("  ", Theme::status_bar()));
            gap.into_iter().chain([
                Span::styled(format!("[{}]", key), Theme::status_bar_key()),
                Span::styled(format!(" {}", desc), Theme::status_bar()),
            ])
        });
        Line::from(spans.collect::<Vec<_>>())
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::status_bar());

        let left = self.hint_line();
        let left_width = left.width() as u16;
        buf.set_line(area.x + 1, area.y, &left, area.width.saturating_sub(2));

        let right = match (self.flash, self.right_text) {
            (Some(flash), _) => Span::styled(format!(" {} ", flash), Theme::flash()),
            (None, Some(text)) => Span::styled(text, Theme::status_bar()),
            (None, None) => return,
        };

        // Dropped when it would overlap the hints
        let width = right.width() as u16;
        let x = area.x + area.width.saturating_sub(width + 2);
        if x > area.x + left_width + 2 {
            buf.set_span(x, area.y, &right, width);
        }
    }
}

/// Hints for the context list
pub fn list_nav_hints() -> Vec<Hint<'static>> {
    vec![
        ("↑/k", "Up"),
        ("↓/j", "Down"),
        ("Enter", "Select"),
        ("y", "Copy"),
        ("?", "Help"),
        ("q", "Quit"),
    ]
}

/// Hints for the pod table
pub fn pod_list_hints() -> Vec<Hint<'static>> {
    vec![
        ("Enter/l", "Logs"),
        ("d", "Describe"),
        ("r", "Refresh"),
        ("/", "Filter"),
        ("y", "Copy context"),
        ("Esc", "Contexts"),
        ("?", "Help"),
    ]
}

/// Hints for the logs and describe viewer
pub fn viewer_hints() -> Vec<Hint<'static>> {
    vec![
        ("j/k", "Scroll"),
        ("g/G", "Top/Bottom"),
        ("y", "Copy"),
        ("Esc", "Close"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_renders_hints_and_right_text() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints([("q", "Quit")])
            .right("3 pods")
            .render(area, &mut buf);

        let text = row(&buf, 60);
        assert!(text.contains("[q] Quit"));
        assert!(text.contains("3 pods"));
    }

    #[test]
    fn test_flash_replaces_right_text() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints([("q", "Quit")])
            .right("3 pods")
            .flash(Some("Copied!"))
            .render(area, &mut buf);

        let text = row(&buf, 60);
        assert!(text.contains("Copied!"));
        assert!(!text.contains("3 pods"));
    }
}
