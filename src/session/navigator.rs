use std::{
    error::Error,
    fmt::{self, Display},
};

use super::{SessionState, RESULTS_STEP};
use crate::catalog::NUM_PARAMS;

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Editing the parameter at this catalog index.
    Editing(usize),
    Results,
}

/// The buttons the wizard can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Previous,
    Next,
    Submit,
    Restart,
}

impl Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NavAction::Previous => "Previous",
            NavAction::Next => "Next",
            NavAction::Submit => "Submit",
            NavAction::Restart => "Start Over",
        };

        write!(f, "{s}")
    }
}

/// An action was requested from a step where it is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationError {
    pub action: NavAction,
    pub step: usize,
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not available at step {}", self.action, self.step)
    }
}

impl Error for NavigationError {}

impl SessionState {
    /// The phase the current step maps to.
    pub fn phase(&self) -> Phase {
        if self.step > NUM_PARAMS {
            Phase::Results
        } else {
            Phase::Editing(self.step - 1)
        }
    }

    /// The actions valid from the current step, in display order.
    pub fn available_actions(&self) -> Vec<NavAction> {
        let mut actions = Vec::with_capacity(2);

        match self.step {
            RESULTS_STEP => actions.push(NavAction::Restart),
            step => {
                if step > 1 {
                    actions.push(NavAction::Previous);
                }
                if step < NUM_PARAMS {
                    actions.push(NavAction::Next);
                } else {
                    actions.push(NavAction::Submit);
                }
            }
        }

        actions
    }

    /// Whether `action` can be taken from the current step.
    pub fn can(&self, action: NavAction) -> bool {
        self.available_actions().contains(&action)
    }

    /// Progress shown above the form as `(current, total)`; stays at `N` on the results page.
    pub fn progress(&self) -> (usize, usize) {
        (self.step.min(NUM_PARAMS), NUM_PARAMS)
    }

    /// Moves to the next parameter ("Next"). Only valid from steps `1..N`.
    pub fn advance(&mut self) -> Result<usize, NavigationError> {
        self.transition(NavAction::Next, self.step + 1)
    }

    /// Moves to the previous parameter ("Previous"). Only valid from steps `2..=N`.
    pub fn retreat(&mut self) -> Result<usize, NavigationError> {
        self.transition(NavAction::Previous, self.step.saturating_sub(1))
    }

    /// Leaves the last parameter for the results page ("Submit").
    pub fn submit(&mut self) -> Result<usize, NavigationError> {
        self.transition(NavAction::Submit, RESULTS_STEP)
    }

    /// Starts over from step 1 with every value back at its default.
    /// Only offered on the results page.
    pub fn restart(&mut self) -> Result<usize, NavigationError> {
        self.transition(NavAction::Restart, 1)?;
        self.reset_values();
        Ok(self.step)
    }

    fn transition(&mut self, action: NavAction, to: usize) -> Result<usize, NavigationError> {
        if !self.can(action) {
            return Err(NavigationError {
                action,
                step: self.step,
            });
        }

        log::debug!("{action}: step {} -> {to}", self.step);
        self.step = to;
        Ok(to)
    }
}
