use ratatui::{
    Frame,
    layout::{Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

use crate::app::Viewer;
use super::viewer_hints;
use crate::ui::{Layout, Theme};

/// Overlay showing the text of a [`Viewer`]
pub struct TextViewer;

impl TextViewer {
    pub fn render(frame: &mut Frame, viewer: &mut Viewer) {
        let area = Layout::popup(frame.area(), 90, 90);
        frame.render_widget(Clear, area);

        let total = viewer.content.lines().count();
        let inner_height = area.height.saturating_sub(2) as usize;
        viewer.scroll = Self::clamped_scroll(viewer.scroll, viewer.follow, total, inner_height);

        let visible: Vec<Line> = viewer
            .content
            .lines()
            .skip(viewer.scroll)
            .take(inner_height)
            .map(|line| Line::from(Span::styled(line, Theme::text())))
            .collect();

        let position = if total == 0 {
            String::new()
        } else {
            format!(
                " {}-{}/{} ",
                viewer.scroll + 1,
                (viewer.scroll + inner_height).min(total),
                total
            )
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(format!(" {} ", viewer.title), Theme::title()))
            .title_bottom(Self::hints_line())
            .title_bottom(Line::from(Span::styled(position, Theme::text_dim())).right_aligned());

        frame.render_widget(Paragraph::new(visible).block(block), area);

        Self::render_scrollbar(frame, area, viewer.scroll, total, inner_height);
    }

    fn hints_line() -> Line<'static> {
        let spans: Vec<Span> = viewer_hints()
            .into_iter()
            .flat_map(|(key, desc)| {
                [
                    Span::styled(format!(" [{}]", key), Theme::text_highlight()),
                    Span::styled(format!(" {}", desc), Theme::text_dim()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    /// Scroll offset kept within the last page; follow pins it there
    fn clamped_scroll(scroll: usize, follow: bool, total: usize, inner_height: usize) -> usize {
        let max_scroll = total.saturating_sub(inner_height);
        if follow { max_scroll } else { scroll.min(max_scroll) }
    }

    fn render_scrollbar(frame: &mut Frame, area: Rect, scroll: usize, total: usize, inner_height: usize) {
        if total <= inner_height {
            return;
        }
        let max_scroll = total.saturating_sub(inner_height);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll)
            .position(scroll.min(max_scroll));

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}
