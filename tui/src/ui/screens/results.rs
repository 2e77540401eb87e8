use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::Span,
    widgets::Paragraph,
    Frame,
};
use safesip::Report;

use crate::ui::{
    layout::{centered_rect, render_hints},
    theme::Theme,
    widgets,
};

pub fn draw(f: &mut Frame, area: Rect, report: &Report) {
    let outer = centered_rect(80, 90, area);
    let messages = report.messages();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                              // title
            Constraint::Length(1),                              // spacer
            Constraint::Length(report.summary.len() as u16 + 3), // table
            Constraint::Min(5),                                 // outcome
            Constraint::Length(1),                              // hints
        ])
        .split(outer);

    f.render_widget(
        Paragraph::new(Span::styled(
            "Water Quality Analysis",
            Theme::title().add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );
    f.render_widget(widgets::summary_table(&report.summary), chunks[2]);
    f.render_widget(
        widgets::outcome(report.outcome.as_ref().ok(), &messages),
        chunks[3],
    );

    render_hints(f, chunks[4], &[("r", "Start Over"), ("esc", "menu")]);
}
