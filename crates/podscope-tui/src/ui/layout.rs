use ratatui::layout::{Constraint, Flex, Layout as RatatuiLayout, Rect};

/// Screen regions shared by the context list and the pod table
pub struct Layout;

impl Layout {
    /// Header (3 rows), content, and a one-row status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let [header, content, status] = RatatuiLayout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);
        (header, content, status)
    }

    /// Split content into an optional filter bar and the rest
    pub fn with_filter_bar(area: Rect, show_filter_bar: bool) -> (Option<Rect>, Rect) {
        if !show_filter_bar {
            return (None, area);
        }
        let [bar, rest] =
            RatatuiLayout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);
        (Some(bar), rest)
    }

    /// Horizontally centered column with a one-row margin above and below
    pub fn centered_list(area: Rect, width_percent: u16) -> Rect {
        let [column] = RatatuiLayout::horizontal([Constraint::Percentage(width_percent)])
            .flex(Flex::Center)
            .areas(area);
        let [_, list, _] = RatatuiLayout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(column);
        list
    }

    /// Popup covering a percentage of `area`, centered
    pub fn popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
        Self::centered(
            area,
            Constraint::Percentage(width_percent),
            Constraint::Percentage(height_percent),
        )
    }

    /// Popup of a fixed size, centered and shrunk to fit `area`
    pub fn fixed_popup(area: Rect, width: u16, height: u16) -> Rect {
        Self::centered(
            area,
            Constraint::Length(width.min(area.width)),
            Constraint::Length(height.min(area.height)),
        )
    }

    fn centered(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
        let [row] = RatatuiLayout::vertical([vertical])
            .flex(Flex::Center)
            .areas(area);
        let [cell] = RatatuiLayout::horizontal([horizontal])
            .flex(Flex::Center)
            .areas(row);
        cell
    }
}
