use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::theme::Theme;

/// A rectangle of the given percentages, centered in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

/// Renders `[key] action` pairs on a single centered line.
pub fn render_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(format!("[{key}]"), Theme::accent_cyan()));
        spans.push(Span::styled(format!(" {action}   "), Theme::dim()));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

/// Draws `msg` on the bottom row of `area`.
pub fn draw_error_bar(f: &mut Frame, area: Rect, msg: &str) {
    let bar = Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(1),
        width: area.width.saturating_sub(2),
        height: 1.min(area.height),
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" ✖ ", Theme::error()),
            Span::styled(msg, Theme::error()),
        ])),
        bar,
    );
}
