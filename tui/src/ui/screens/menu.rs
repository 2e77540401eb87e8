use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use safesip::InferencePipeline;

use crate::ui::{
    layout::{centered_rect, render_hints},
    theme::Theme,
};

use super::{analyze::AnalyzeState, Action, Screen};

const LOGO: &str = r#"
 ███████╗ █████╗ ███████╗███████╗███████╗██╗██████╗
 ██╔════╝██╔══██╗██╔════╝██╔════╝██╔════╝██║██╔══██╗
 ███████╗███████║█████╗  █████╗  ███████╗██║██████╔╝
 ╚════██║██╔══██║██╔══╝  ██╔══╝  ╚════██║██║██╔═══╝
 ███████║██║  ██║██║     ███████╗███████║██║██║
 ╚══════╝╚═╝  ╚═╝╚═╝     ╚══════╝╚══════╝╚═╝╚═╝

Is your water safe to drink?
"#;

const MENU_ITEMS: &[&str] = &["Analyze Water", "Quit"];

pub struct MenuState {
    pub selected: usize,
    /// One line per artifact that failed to load.
    pub warnings: Vec<String>,
    /// The analysis left with esc; picked up again on "Analyze Water".
    pub suspended: Option<AnalyzeState>,
}

impl MenuState {
    pub fn new(pipeline: &InferencePipeline) -> Self {
        Self {
            selected: 0,
            warnings: pipeline
                .load_errors()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            suspended: None,
        }
    }

    /// Creates a menu holding on to an analysis in progress.
    pub fn resuming(pipeline: &InferencePipeline, analysis: AnalyzeState) -> Self {
        Self {
            suspended: Some(analysis),
            ..Self::new(pipeline)
        }
    }

    fn label(&self, i: usize) -> String {
        match (&self.suspended, i) {
            (Some(analysis), 0) => {
                let (current, total) = analysis.session.progress();
                format!("Resume Analysis (step {current} of {total})")
            }
            _ => MENU_ITEMS[i].to_string(),
        }
    }
}

pub fn handle_key(state: &mut MenuState, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected = state.selected.saturating_sub(1);
            Action::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.selected < MENU_ITEMS.len() - 1 {
                state.selected += 1;
            }
            Action::None
        }
        KeyCode::Enter => match state.selected {
            0 => {
                let analysis = state.suspended.take().unwrap_or_else(AnalyzeState::new);
                Action::Transition(Screen::Analyze(analysis))
            }
            1 => Action::Quit,
            _ => Action::None,
        },
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

pub fn draw(f: &mut Frame, state: &MenuState) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let outer = centered_rect(70, 80, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(1),
            Constraint::Length(MENU_ITEMS.len() as u16 * 2 + 2),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(outer);

    draw_logo(f, chunks[0]);
    draw_menu(f, chunks[2], state);
    draw_status(f, chunks[4], state);
    render_hints(
        f,
        chunks[5],
        &[("↑↓ / j k", "navigate"), ("enter", "select"), ("q", "quit")],
    );
}

fn draw_logo(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = LOGO
        .lines()
        .map(|l| Line::from(Span::styled(l, Theme::title())))
        .collect();

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_menu(f: &mut Frame, area: Rect, state: &MenuState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(" MENU ")
        .title_alignment(Alignment::Center)
        .title_style(Theme::title());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let item_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            MENU_ITEMS
                .iter()
                .map(|_| Constraint::Length(2))
                .collect::<Vec<_>>(),
        )
        .split(inner);

    for (i, item_area) in item_areas.iter().enumerate() {
        let (prefix, style) = if i == state.selected {
            ("▶ ", Theme::title().add_modifier(Modifier::BOLD))
        } else {
            ("  ", Theme::dim())
        };

        let line = Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(state.label(i), style),
        ]);

        f.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), *item_area);
    }
}

fn draw_status(f: &mut Frame, area: Rect, state: &MenuState) {
    let lines: Vec<Line> = if state.warnings.is_empty() {
        vec![Line::from(Span::styled("model and scaler loaded", Theme::ok()))]
    } else {
        state
            .warnings
            .iter()
            .map(|w| Line::from(Span::styled(format!("⚠ {w}"), Theme::warn())))
            .collect()
    };

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
