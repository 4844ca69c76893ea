use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use podscope_describe::format_age;
use podscope_types::PodSummary;

use crate::{
    app::AppState,
    ui::{
        Layout, Theme,
        components::{StatusBar, pod_list_hints},
    },
};

/// Pod table for the selected context
pub struct PodListScreen;

impl PodListScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let (header_area, content_area, status_area) = Layout::main(frame.area());

        let show_filter_bar = state.ui_state.search_active
            || state.ui_state.active_filter.is_some()
            || state.ui_state.filter_error.is_some();
        let (filter_area, table_area) = Layout::with_filter_bar(content_area, show_filter_bar);

        Self::render_header(frame, header_area, state);
        if let Some(filter_area) = filter_area {
            Self::render_filter_bar(frame, filter_area, state);
        }
        Self::render_table(frame, table_area, state, Utc::now());
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let context = if state.shows_all_contexts() {
            "All contexts"
        } else {
            state.selected_context.as_deref().unwrap_or("?")
        };

        let title = Line::from(vec![
            Span::styled("podscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(context, Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(format!("{} pods", state.pods.len()), Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![];

        if state.ui_state.search_active {
            spans.push(Span::styled(
                " /",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(" Filter: ", Theme::text_dim()));
        }

        let pattern = if state.ui_state.search_active {
            state.ui_state.search_input.as_str()
        } else if let Some(filter) = &state.ui_state.active_filter {
            filter.pattern()
        } else {
            ""
        };
        spans.push(Span::styled(pattern.to_string(), Theme::text_highlight()));

        if state.ui_state.search_active {
            spans.push(Span::styled(
                "█",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        if let Some(err) = &state.ui_state.filter_error {
            spans.push(Span::styled(" ", Theme::text()));
            spans.push(Span::styled(format!("⚠ {}", err), Style::default().fg(Color::Red)));
        }

        if state.ui_state.search_active {
            spans.push(Span::styled("  [Enter] Apply  [Esc] Cancel", Theme::text_dim()));
        } else if state.ui_state.active_filter.is_some() {
            spans.push(Span::styled("  [n] Clear  [/] Edit", Theme::text_dim()));
        }

        let border_style = if state.ui_state.search_active {
            Style::default().fg(Color::Yellow)
        } else if state.ui_state.filter_error.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Theme::border()
        };

        let filter_bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(" Filter ", Theme::title())),
        );

        frame.render_widget(filter_bar, area);
    }

    fn render_table(frame: &mut Frame, area: Rect, state: &mut AppState, now: DateTime<Utc>) {
        let with_context = state.shows_all_contexts();
        // Field borrows so the table state can be borrowed mutably below
        let filter = state.ui_state.active_filter.as_ref();
        let visible: Vec<&PodSummary> = state
            .pods
            .iter()
            .filter(|pod| filter.map_or(true, |f| f.matches(pod)))
            .collect();
        let count = visible.len();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(
                if filter.is_some() {
                    format!(" Pods ({} matching) ", count)
                } else {
                    format!(" Pods ({}) ", count)
                },
                Theme::title(),
            ));

        if let Some(error) = &state.pods_error {
            let message = Paragraph::new(Line::from(Span::styled(error.as_str(), Theme::error())))
                .centered()
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let rows: Vec<Row> = visible
            .iter()
            .map(|pod| Self::row(pod, with_context, now))
            .collect();

        let table = Table::new(rows, Self::widths(with_context))
            .header(Self::header(with_context))
            .block(block)
            .row_highlight_style(Theme::list_item_selected())
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut state.ui_state.table_state);
    }

    fn header(with_context: bool) -> Row<'static> {
        let mut titles = vec!["Name", "Namespace"];
        if with_context {
            titles.push("Context");
        }
        titles.extend(["Status", "Age", "Restarts"]);
        Row::new(titles).style(Theme::table_header())
    }

    fn widths(with_context: bool) -> Vec<Constraint> {
        let mut widths = vec![Constraint::Fill(3), Constraint::Fill(2)];
        if with_context {
            widths.push(Constraint::Fill(2));
        }
        widths.extend([
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(8),
        ]);
        widths
    }

    fn row<'a>(pod: &'a PodSummary, with_context: bool, now: DateTime<Utc>) -> Row<'a> {
        let status = pod.status.as_deref().unwrap_or("");
        let age = pod
            .age
            .as_deref()
            .map(|ts| format_age(ts, now))
            .unwrap_or_else(|| "-".to_string());

        let mut cells = vec![
            Cell::from(pod.name.as_str()).style(Theme::text()),
            Cell::from(pod.namespace.as_str()).style(Theme::text_dim()),
        ];
        if with_context {
            cells.push(Cell::from(pod.context.as_str()).style(Theme::text_dim()));
        }
        cells.push(Cell::from(status).style(Theme::phase(pod.phase())));
        cells.push(Cell::from(age).style(Theme::text_dim()));
        cells.push(Cell::from(pod.restarts.to_string()).style(Theme::restarts(pod.restarts)));
        Row::new(cells)
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let status = StatusBar::new()
            .hints(pod_list_hints())
            .right(format!("{} pods", state.pods.len()))
            .flash(state.ui_state.flash.as_ref().map(|f| f.text.as_str()));

        frame.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::TimeZone;
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    use crate::config::ContextStore;

    fn render_table(state: &mut AppState, now: DateTime<Utc>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 8)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                PodListScreen::render_table(frame, area, state, now)
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn state_with_pod(context: &str) -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(tx, ContextStore::disabled(), Duration::from_secs(2));
        state.selected_context = Some(context.to_string());

        let mut pod = PodSummary::new("web-0", "shop", "prod-cluster");
        pod.status = Some("Running".to_string());
        pod.age = Some("2024-01-15T10:30:00Z".to_string());
        pod.restarts = 2;
        state.pods = vec![pod];
        state
    }

    #[test]
    fn test_table_columns() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut state = state_with_pod("prod-cluster");
        let text = render_table(&mut state, now);

        assert!(text.contains("Pods (1)"));
        assert!(text.contains("web-0"));
        assert!(text.contains("Running"));
        assert!(text.contains("1h"));
        assert!(!text.contains("Context"));
    }

    #[test]
    fn test_context_column_for_all_contexts() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut state = state_with_pod("all");
        let text = render_table(&mut state, now);

        assert!(text.contains("Context"));
        assert!(text.contains("prod-cluster"));
    }

    #[test]
    fn test_error_replaces_table() {
        let mut state = state_with_pod("dev");
        state.pods.clear();
        state.pods_error = Some("Error loading pods".to_string());
        let text = render_table(&mut state, Utc::now());
        assert!(text.contains("Error loading pods"));
    }
}
