use ratatui::{
    Frame,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{Layout, Theme};

/// Modal error message, dismissed with `x`
pub struct ErrorPopup;

impl ErrorPopup {
    pub fn render(frame: &mut Frame, message: &str) {
        let area = Layout::fixed_popup(frame.area(), 60, 7);
        frame.render_widget(Clear, area);

        let text = vec![
            Line::from(Span::styled(message, Theme::text())),
            Line::from(""),
            Line::from(Span::styled("[x] Dismiss", Theme::text_dim())),
        ];
        let widget = Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::error())
                .title(Span::styled(" Error ", Theme::error())),
        );

        frame.render_widget(widget, area);
    }
}
