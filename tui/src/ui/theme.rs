use ratatui::style::{Color, Modifier, Style};

/// Water-blue theme.
///
/// Base aesthetic:
/// - light blue foreground on a deep navy background
/// - green and amber reserved for verdicts
pub struct Theme;

impl Theme {
    // Core palette
    pub const BG: Color = Color::Rgb(8, 18, 32);
    pub const FG_WATER: Color = Color::Rgb(100, 181, 246);
    pub const FG_DIM: Color = Color::Rgb(30, 136, 229);
    pub const FG_MUTED: Color = Color::Rgb(84, 110, 122);

    // Accents
    pub const ACCENT_CYAN: Color = Color::Rgb(0, 229, 255);
    pub const ACCENT_GREEN: Color = Color::Rgb(102, 187, 106);
    pub const ACCENT_YELLOW: Color = Color::Rgb(255, 202, 40);
    pub const ACCENT_RED: Color = Color::Rgb(239, 83, 80);

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG_WATER).bg(Self::BG)
    }

    /// Panel borders.
    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM).bg(Self::BG)
    }

    /// Border of the widget holding focus.
    pub fn focused_border() -> Style {
        Style::default()
            .fg(Self::ACCENT_CYAN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::FG_WATER)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG_WATER)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    pub fn ok() -> Style {
        Style::default()
            .fg(Self::ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warn() -> Style {
        Style::default()
            .fg(Self::ACCENT_YELLOW)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ACCENT_RED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent_cyan() -> Style {
        Style::default()
            .fg(Self::ACCENT_CYAN)
            .add_modifier(Modifier::BOLD)
    }
}
