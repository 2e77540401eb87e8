use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Wrap},
};
use safesip::{
    presenter::{SummaryRow, Verdict},
    session::Binding,
};

use super::theme::Theme;

fn panel<'a>(title: &str, focused: bool) -> Block<'a> {
    let border = if focused {
        Theme::focused_border()
    } else {
        Theme::border()
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {title} "))
        .title_style(Theme::title())
}

/// The slider track for the parameter being edited.
pub fn slider<'a>(binding: &Binding, focused: bool) -> Gauge<'a> {
    let spec = binding.spec;
    let label = format!(
        "{}  [{} .. {}]",
        spec.format(binding.value),
        spec.format(spec.min),
        spec.format(spec.max)
    );

    Gauge::default()
        .block(panel("slider", focused))
        .gauge_style(Style::default().fg(Theme::FG_DIM).bg(Theme::BG))
        .ratio(binding.slider_ratio())
        .label(Span::styled(label, Theme::text().add_modifier(Modifier::BOLD)))
}

/// The numeric field; shows `pending` while the user is typing.
pub fn entry<'a>(binding: &Binding, pending: Option<&'a str>, focused: bool) -> Paragraph<'a> {
    let mut spans = match pending {
        Some(text) => vec![Span::styled(text, Theme::ok())],
        None if binding.is_set => vec![Span::styled(binding.entry_text(), Theme::text())],
        None => vec![
            Span::styled(binding.entry_text(), Theme::muted()),
            Span::styled("  (not set)", Theme::warn()),
        ],
    };
    if !binding.spec.unit.is_empty() {
        spans.push(Span::styled(format!(" {}", binding.spec.unit), Theme::dim()));
    }
    if focused {
        spans.push(Span::styled("█", Theme::accent_cyan()));
    }

    Paragraph::new(Line::from(spans)).block(panel("value", focused))
}

/// The parameters summary table.
pub fn summary_table(rows: &[SummaryRow]) -> Table<'_> {
    let header = Row::new(vec!["Parameter", "Value"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = rows.iter().map(|row| {
        let style = if row.value == "N/A" {
            Theme::warn()
        } else {
            Theme::text()
        };
        Row::new(vec![
            Cell::from(row.parameter.as_str()),
            Cell::from(row.value.as_str()).style(style),
        ])
    });

    Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
        .header(header)
        .block(panel("Water Quality Parameters Summary", false))
}

/// The analysis outcome: verdict and confidence, or the failure messages.
pub fn outcome<'a>(verdict: Option<&Verdict>, messages: &[String]) -> Paragraph<'a> {
    let mut lines = Vec::new();

    if let Some(verdict) = verdict {
        let style = match verdict {
            Verdict::Potable { .. } => Theme::ok(),
            Verdict::NonPotable { .. } => Theme::error(),
            Verdict::Unrecognized { .. } => Theme::warn(),
        };
        lines.push(Line::from(Span::styled(verdict.headline(), style)));
        if let Some(confidence) = verdict.confidence_line() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(confidence, Theme::text())));
        }
    }

    lines.extend(
        messages
            .iter()
            .map(|m| Line::from(Span::styled(m.clone(), Theme::error()))),
    );

    Paragraph::new(lines)
        .block(panel("Analysis Result", false))
        .wrap(Wrap { trim: false })
}
