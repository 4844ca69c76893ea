use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::ui::Theme;

/// A bordered list with a highlighted selection
pub struct ListSelector<'a> {
    items: Vec<ListItem<'a>>,
    title: &'a str,
    highlight_symbol: &'a str,
    /// Shown instead of the items when there are none
    placeholder: Option<Line<'a>>,
}

impl<'a> ListSelector<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            items: Vec::new(),
            title,
            highlight_symbol: "▶ ",
            placeholder: None,
        }
    }

    /// Add items from an iterator of (display_text, is_current) tuples
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        self.items = items
            .into_iter()
            .map(|(text, is_current)| {
                let text = text.into();
                let line = if is_current {
                    Line::from(Span::styled(
                        format!("{} (current)", text),
                        Theme::list_item_current(),
                    ))
                } else {
                    Line::from(Span::styled(text, Theme::list_item()))
                };
                ListItem::new(line)
            })
            .collect();
        self
    }

    pub fn placeholder(mut self, line: Line<'a>) -> Self {
        self.placeholder = Some(line);
        self
    }
}

impl StatefulWidget for ListSelector<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(self.title, Theme::title()));

        if self.items.is_empty() {
            if let Some(placeholder) = self.placeholder {
                Paragraph::new(placeholder).block(block).render(area, buf);
                return;
            }
        }

        let list = List::new(self.items)
            .block(block)
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol(self.highlight_symbol);

        StatefulWidget::render(list, area, buf, state);
    }
}

/// Extension trait to render ListSelector more easily
pub trait ListSelectorExt {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState);
}

impl ListSelectorExt for ratatui::Frame<'_> {
    fn render_list_selector(&mut self, area: Rect, selector: ListSelector, state: &mut ListState) {
        self.render_stateful_widget(selector, area, state);
    }
}
