use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        Layout, Theme,
        components::{ListSelector, ListSelectorExt, StatusBar, list_nav_hints},
    },
};

/// Context selection screen
pub struct ContextSelectScreen;

impl ContextSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());

        Self::render_header(frame, header_area, state);
        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![
            Span::styled("podscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Select Context", Theme::text()),
        ];
        if let Some(saved) = &state.selected_context {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(saved.as_str(), Theme::text_highlight()));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        let selected = state.selected_context.as_deref();
        let items: Vec<(String, bool)> = state
            .contexts
            .iter()
            .map(|choice| (choice.label.clone(), selected == Some(choice.value.as_str())))
            .collect();

        let placeholder = match &state.contexts_error {
            Some(error) => Line::from(Span::styled(error.as_str(), Theme::error())),
            None => Line::from(Span::styled("No contexts loaded", Theme::text_dim())),
        };

        let selector = ListSelector::new(" Kubernetes Contexts ")
            .items(items)
            .placeholder(placeholder);

        frame.render_list_selector(list_area, selector, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        // "All contexts" is not a backend context
        let context_count = format!("{} contexts", state.contexts.len().saturating_sub(1));

        let status = StatusBar::new()
            .hints(list_nav_hints())
            .right(context_count)
            .flash(state.ui_state.flash.as_ref().map(|f| f.text.as_str()));

        frame.render_widget(status, area);
    }
}
