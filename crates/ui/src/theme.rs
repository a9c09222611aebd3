use ratatui::style::{Color, Modifier, Style};

/// Style set shared by tables, breadcrumbs, and the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub header: Style,
    pub row_highlight: Style,
    pub breadcrumb: Style,
    pub breadcrumb_active: Style,
    pub prompt: Style,
    pub status: Style,
    pub error: Style,
    pub empty: Style,
}

pub const DEFAULT: Theme = Theme {
    header: Style::new().fg(Color::Black).bg(Color::Gray),
    row_highlight: Style::new()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    breadcrumb: Style::new()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED),
    breadcrumb_active: Style::new()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    prompt: Style::new().fg(Color::LightCyan),
    status: Style::new().fg(Color::Gray),
    error: Style::new().fg(Color::LightRed),
    empty: Style::new().fg(Color::DarkGray),
};

pub const SLATE: Theme = Theme {
    header: Style::new()
        .fg(Color::Rgb(226, 232, 240))
        .bg(Color::Rgb(15, 23, 42)),
    row_highlight: Style::new()
        .bg(Color::Rgb(30, 41, 59))
        .fg(Color::Rgb(250, 204, 21)),
    breadcrumb: Style::new()
        .fg(Color::Rgb(125, 211, 252))
        .add_modifier(Modifier::UNDERLINED),
    breadcrumb_active: Style::new()
        .fg(Color::Rgb(226, 232, 240))
        .add_modifier(Modifier::BOLD),
    prompt: Style::new().fg(Color::LightCyan),
    status: Style::new().fg(Color::Rgb(148, 163, 184)),
    error: Style::new().fg(Color::Rgb(248, 113, 113)),
    empty: Style::new().fg(Color::DarkGray),
};

impl Default for Theme {
    fn default() -> Self {
        DEFAULT
    }
}

impl Theme {
    /// Resolve a theme by name.
    pub fn by_name(name: &str) -> Option<Theme> {
        match name {
            "default" => Some(DEFAULT),
            "slate" => Some(SLATE),
            _ => None,
        }
    }
}

/// Names accepted by [`Theme::by_name`].
pub fn theme_names() -> &'static [&'static str] {
    &["default", "slate"]
}
