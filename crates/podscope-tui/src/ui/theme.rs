use ratatui::style::{Color, Modifier, Style};

use podscope_types::PodPhase;

/// Colors and styles shared by every screen
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const PRIMARY: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;
    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;

    const BAR_BG: Color = Color::DarkGray;

    fn fg(color: Color) -> Style {
        Style::default().fg(color)
    }

    fn bold(color: Color) -> Style {
        Self::fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Self::fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        Self::fg(Self::PRIMARY)
    }

    pub fn title() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn text() -> Style {
        Self::fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        Self::fg(Self::FG_DIM)
    }

    /// Search prompt, key names and the viewer position indicator
    pub fn text_highlight() -> Style {
        Self::bold(Self::HIGHLIGHT)
    }

    pub fn error() -> Style {
        Self::bold(Self::ERROR)
    }

    pub fn list_item() -> Style {
        Self::text()
    }

    pub fn list_item_selected() -> Style {
        Self::bold(Self::BG).bg(Self::PRIMARY)
    }

    /// The context the user is currently browsing
    pub fn list_item_current() -> Style {
        Self::bold(Self::SUCCESS)
    }

    pub fn table_header() -> Style {
        Self::bold(Self::FG_DIM).add_modifier(Modifier::UNDERLINED)
    }

    pub fn phase(phase: PodPhase) -> Style {
        Self::fg(phase.color())
    }

    /// Red when the pod restarted at least once, green otherwise
    pub fn restarts(count: i64) -> Style {
        Self::fg(if count > 0 { Self::ERROR } else { Self::SUCCESS })
    }

    pub fn status_bar() -> Style {
        Self::fg(Self::FG_DIM).bg(Self::BAR_BG)
    }

    pub fn status_bar_key() -> Style {
        Self::bold(Self::HIGHLIGHT).bg(Self::BAR_BG)
    }

    /// Short-lived confirmations such as "Copied!"
    pub fn flash() -> Style {
        Self::bold(Color::Black).bg(Self::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_colors() {
        assert_eq!(Theme::restarts(0).fg, Some(Color::Green));
        assert_eq!(Theme::restarts(3).fg, Some(Color::Red));
    }

    #[test]
    fn test_phase_colors() {
        assert_eq!(Theme::phase(PodPhase::from("Running")).fg, Some(Color::Green));
        assert_eq!(Theme::phase(PodPhase::from("CrashLoopBackOff")).fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_selected_item_is_bold_on_primary() {
        let style = Theme::list_item_selected();
        assert_eq!(style.bg, Some(Theme::PRIMARY));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
