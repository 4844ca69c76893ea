use ratatui::{
    Frame,
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::{Layout, Theme};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Small centered box telling the user a request is in flight
pub struct SpinnerOverlay;

impl SpinnerOverlay {
    /// `tick` advances the animation
    pub fn render(frame: &mut Frame, message: &str, tick: usize) {
        let width = (message.chars().count() as u16).saturating_add(8);
        let area = Layout::fixed_popup(frame.area(), width, 3);

        frame.render_widget(Clear, area);

        let line = Line::from(vec![
            Span::styled(FRAMES[tick % FRAMES.len()], Theme::text_highlight()),
            Span::styled(format!(" {}", message), Theme::text()),
        ]);
        let widget = Paragraph::new(line).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused()),
        );

        frame.render_widget(widget, area);
    }
}
