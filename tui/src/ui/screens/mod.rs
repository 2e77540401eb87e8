pub mod analyze;
pub mod menu;
mod results;

use crossterm::event::KeyCode;
use ratatui::Frame;
use safesip::InferencePipeline;

pub enum Action {
    None,
    Quit,
    Transition(Screen),
}

pub enum Screen {
    Menu(menu::MenuState),
    Analyze(analyze::AnalyzeState),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu(_) => "menu",
            Screen::Analyze(_) => "analyze",
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        match self {
            Screen::Menu(s) => menu::draw(f, s),
            Screen::Analyze(s) => analyze::draw(f, s),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pipeline: &InferencePipeline) -> Action {
        match self {
            Screen::Menu(s) => menu::handle_key(s, key),
            Screen::Analyze(s) => analyze::handle_key(s, key, pipeline),
        }
    }
}
