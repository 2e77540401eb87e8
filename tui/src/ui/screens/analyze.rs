use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use safesip::{
    session::{EntryError, NavigationError},
    InferencePipeline, NavAction, Phase, Report, SessionState,
};

use crate::ui::{
    layout::{centered_rect, draw_error_bar, render_hints},
    theme::Theme,
    widgets,
};

use super::{menu::MenuState, results, Action, Screen};

/// Which of the two bound widgets receives edit keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Slider,
    Entry,
}

pub struct AnalyzeState {
    pub session: SessionState,
    pub focus: Focus,
    /// Text typed into the numeric field and not committed yet.
    pub pending: Option<String>,
    /// Computed once on submit; cleared on restart.
    pub report: Option<Report>,
    pub error: Option<String>,
}

impl AnalyzeState {
    pub fn new() -> Self {
        Self {
            session: SessionState::new(),
            focus: Focus::Slider,
            pending: None,
            report: None,
            error: None,
        }
    }

    /// Stores the pending entry text, if any.
    ///
    /// On failure the text is kept so the user can fix it.
    fn commit_pending(&mut self) -> Result<(), EntryError> {
        let Some(text) = self.pending.take() else {
            return Ok(());
        };

        self.session.commit_text(&text).map(|_| ()).map_err(|e| {
            self.pending = Some(text);
            e
        })
    }

    fn navigate(
        &mut self,
        step: fn(&mut SessionState) -> Result<usize, NavigationError>,
    ) -> Result<(), String> {
        self.commit_pending().map_err(|e| e.to_string())?;
        step(&mut self.session).map_err(|e| e.to_string())?;
        Ok(())
    }
}

pub fn handle_key(state: &mut AnalyzeState, key: KeyCode, pipeline: &InferencePipeline) -> Action {
    state.error = None;

    if key == KeyCode::Esc {
        let analysis = std::mem::replace(state, AnalyzeState::new());
        return Action::Transition(Screen::Menu(MenuState::resuming(pipeline, analysis)));
    }

    let result = match state.session.phase() {
        Phase::Results => handle_results(state, key),
        Phase::Editing(_) => handle_editing(state, key, pipeline),
    };

    if let Err(e) = result {
        log::debug!("rejected {key:?}: {e}");
        state.error = Some(e);
    }

    Action::None
}

fn handle_results(state: &mut AnalyzeState, key: KeyCode) -> Result<(), String> {
    if key == KeyCode::Char('r') {
        state.session.restart().map_err(|e| e.to_string())?;
        state.report = None;
        state.pending = None;
        state.focus = Focus::Slider;
    }
    Ok(())
}

fn handle_editing(
    state: &mut AnalyzeState,
    key: KeyCode,
    pipeline: &InferencePipeline,
) -> Result<(), String> {
    match key {
        KeyCode::Tab | KeyCode::BackTab => {
            state.focus = match state.focus {
                Focus::Slider => Focus::Entry,
                Focus::Entry => Focus::Slider,
            };
        }
        KeyCode::Char('n') => state.navigate(SessionState::advance)?,
        KeyCode::Char('p') => state.navigate(SessionState::retreat)?,
        KeyCode::Char('s') => {
            state.navigate(SessionState::submit)?;
            state.report = Some(Report::build(&state.session, pipeline));
        }
        _ => match state.focus {
            Focus::Slider => handle_slider(state, key).map_err(|e| e.to_string())?,
            Focus::Entry => handle_entry(state, key).map_err(|e| e.to_string())?,
        },
    }
    Ok(())
}

fn handle_slider(state: &mut AnalyzeState, key: KeyCode) -> Result<(), EntryError> {
    let session = &mut state.session;
    let moved = match key {
        KeyCode::Left | KeyCode::Char('h') => session.nudge(-1),
        KeyCode::Right | KeyCode::Char('l') => session.nudge(1),
        KeyCode::PageDown => session.nudge(-10),
        KeyCode::PageUp => session.nudge(10),
        KeyCode::Home => session.jump_to_min(),
        KeyCode::End => session.jump_to_max(),
        _ => return Ok(()),
    };

    // the slider owns the value now; stale typing would overwrite it
    state.pending = None;
    moved.map(|_| ())
}

fn handle_entry(state: &mut AnalyzeState, key: KeyCode) -> Result<(), EntryError> {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
            state.pending.get_or_insert_with(String::new).push(c);
        }
        KeyCode::Backspace => {
            let text = state.pending.get_or_insert_with(|| {
                state
                    .session
                    .binding()
                    .map(|b| b.entry_text())
                    .unwrap_or_default()
            });
            text.pop();
        }
        KeyCode::Enter => state.commit_pending()?,
        KeyCode::Delete => {
            state.pending = None;
            state.session.clear()?;
        }
        _ => {}
    }
    Ok(())
}

pub fn draw(f: &mut Frame, state: &AnalyzeState) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    match (state.session.phase(), &state.report) {
        (Phase::Results, Some(report)) => results::draw(f, area, report),
        _ => draw_form(f, state),
    }

    if let Some(err) = &state.error {
        draw_error_bar(f, area, err);
    }
}

fn draw_form(f: &mut Frame, state: &AnalyzeState) {
    let Some(binding) = state.session.binding() else {
        return;
    };

    let outer = centered_rect(70, 80, f.size());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // progress
            Constraint::Length(1), // spacer
            Constraint::Length(1), // parameter
            Constraint::Length(2), // description
            Constraint::Length(3), // slider
            Constraint::Length(3), // entry
            Constraint::Min(0),
            Constraint::Length(1), // buttons
            Constraint::Length(1), // hints
        ])
        .split(outer);

    let (current, total) = state.session.progress();

    f.render_widget(
        Paragraph::new(Span::styled(
            "Water Quality Analysis",
            Theme::title().add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Step {current} of {total}"),
            Theme::dim(),
        )),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled(binding.spec.label(), Theme::title())),
        chunks[3],
    );
    f.render_widget(
        Paragraph::new(Span::styled(binding.spec.description, Theme::muted()))
            .wrap(Wrap { trim: true }),
        chunks[4],
    );

    f.render_widget(
        widgets::slider(&binding, state.focus == Focus::Slider),
        chunks[5],
    );
    f.render_widget(
        widgets::entry(
            &binding,
            state.pending.as_deref(),
            state.focus == Focus::Entry,
        ),
        chunks[6],
    );

    let buttons = state
        .session
        .available_actions()
        .into_iter()
        .map(|action| {
            let key = match action {
                NavAction::Previous => "p",
                NavAction::Next => "n",
                NavAction::Submit => "s",
                NavAction::Restart => "r",
            };
            Span::styled(format!("  [{key}] {action}  "), Theme::accent_cyan())
        })
        .collect::<Vec<_>>();
    f.render_widget(Paragraph::new(Line::from(buttons)), chunks[8]);

    let hints: &[(&str, &str)] = match state.focus {
        Focus::Slider => &[
            ("←→", "step"),
            ("pgup/pgdn", "×10"),
            ("home/end", "bounds"),
            ("tab", "type a value"),
            ("esc", "menu"),
        ],
        Focus::Entry => &[
            ("0-9 . -", "type"),
            ("enter", "apply"),
            ("del", "clear"),
            ("tab", "slider"),
            ("esc", "menu"),
        ],
    };
    render_hints(f, chunks[9], hints);
}
