use std::{
    error::Error,
    fmt::{self, Display},
};

use super::{Phase, SessionState};
use crate::catalog::ParameterSpec;

/// The two widgets bound to the parameter being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Slider,
    Entry,
}

/// Why an input could not be stored.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryError {
    /// The numeric field does not hold a number.
    NotANumber { text: String },
    /// Inputs are only accepted while a parameter is being edited.
    NotEditing,
}

impl Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::NotANumber { text } => write!(f, "'{text}' is not a number"),
            EntryError::NotEditing => write!(f, "no parameter is being edited"),
        }
    }
}

impl Error for EntryError {}

/// What both widgets display for the current parameter.
///
/// Built fresh from the stored value on every render, so the slider and the
/// numeric field can never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub spec: &'static ParameterSpec,
    pub value: f64,
    /// `false` when the stored slot is unset and `value` is the default.
    pub is_set: bool,
}

impl Binding {
    /// The slider's position as a whole number of steps above `min`.
    pub fn slider_position(&self) -> i64 {
        ((self.value - self.spec.min) / self.spec.step).round() as i64
    }

    /// The slider's position as a fraction of its track.
    pub fn slider_ratio(&self) -> f64 {
        ((self.value - self.spec.min) / (self.spec.max - self.spec.min)).clamp(0.0, 1.0)
    }

    /// The text the numeric field starts out with.
    pub fn entry_text(&self) -> String {
        self.spec.format(self.value)
    }
}

impl SessionState {
    /// Binds both widgets to the parameter at the current step.
    pub fn binding(&self) -> Option<Binding> {
        let Phase::Editing(index) = self.phase() else {
            return None;
        };

        let spec = self.current_spec()?;
        let stored = self.values[index];

        Some(Binding {
            spec,
            value: stored.unwrap_or(spec.default),
            is_set: stored.is_some(),
        })
    }

    /// Stores a new value for the current parameter, whichever widget it came from.
    ///
    /// The value is clamped to the parameter's bounds and snapped to its step
    /// before it is written.
    ///
    /// # Returns
    /// The value actually stored.
    pub fn set_value(&mut self, source: InputSource, value: f64) -> Result<f64, EntryError> {
        let Phase::Editing(index) = self.phase() else {
            return Err(EntryError::NotEditing);
        };

        let spec = self.current_spec().ok_or(EntryError::NotEditing)?;
        if value.is_nan() {
            return Err(EntryError::NotANumber {
                text: value.to_string(),
            });
        }

        let stored = spec.normalize(value);
        log::debug!("{} <- {stored} ({source:?})", spec.key);
        self.values[index] = Some(stored);
        Ok(stored)
    }

    /// Moves the slider by `ticks` whole steps.
    pub fn nudge(&mut self, ticks: i64) -> Result<f64, EntryError> {
        let binding = self.binding().ok_or(EntryError::NotEditing)?;
        let position = (binding.slider_position() + ticks).clamp(0, binding.spec.ticks());
        let value = binding.spec.min + position as f64 * binding.spec.step;
        self.set_value(InputSource::Slider, value)
    }

    /// Moves the slider to its lower bound.
    pub fn jump_to_min(&mut self) -> Result<f64, EntryError> {
        let spec = self.current_spec().ok_or(EntryError::NotEditing)?;
        self.set_value(InputSource::Slider, spec.min)
    }

    /// Moves the slider to its upper bound.
    pub fn jump_to_max(&mut self) -> Result<f64, EntryError> {
        let spec = self.current_spec().ok_or(EntryError::NotEditing)?;
        self.set_value(InputSource::Slider, spec.max)
    }

    /// Parses and stores the numeric field's text.
    ///
    /// Out of range numbers are clamped. Text that does not parse as a number
    /// is rejected and leaves the stored value untouched.
    pub fn commit_text(&mut self, text: &str) -> Result<f64, EntryError> {
        let trimmed = text.trim();
        let value = trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .ok_or_else(|| EntryError::NotANumber {
                text: trimmed.to_string(),
            })?;

        self.set_value(InputSource::Entry, value)
    }

    /// Marks the current parameter as not entered.
    pub fn clear(&mut self) -> Result<(), EntryError> {
        let Phase::Editing(index) = self.phase() else {
            return Err(EntryError::NotEditing);
        };

        log::debug!("{} cleared", crate::catalog::CATALOG[index].key);
        self.values[index] = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CATALOG, NUM_PARAMS};

    fn session_at(index: usize) -> SessionState {
        let mut session = SessionState::new();
        for _ in 0..index {
            session.advance().unwrap();
        }
        session
    }

    #[test]
    fn binding_starts_at_default() {
        let binding = SessionState::new().binding().unwrap();
        assert_eq!(binding.spec.key, "ph");
        assert_eq!(binding.value, 7.0);
        assert!(binding.is_set);
        assert_eq!(binding.entry_text(), "7.0");
    }

    #[test]
    fn slider_write_is_read_back_by_entry() {
        for index in 0..NUM_PARAMS {
            let mut session = session_at(index);
            let stored = session.nudge(3).unwrap();
            let binding = session.binding().unwrap();
            assert_eq!(binding.value, stored);
            assert_eq!(binding.entry_text().parse::<f64>().unwrap(), stored);
        }
    }

    #[test]
    fn entry_write_is_read_back_by_slider() {
        for (index, spec) in CATALOG.iter().enumerate() {
            let mut session = session_at(index);
            let target = spec.normalize((spec.min + spec.max) / 3.0);
            let stored = session.commit_text(&spec.format(target)).unwrap();
            assert_eq!(stored, target);

            let binding = session.binding().unwrap();
            let from_slider = spec.min + binding.slider_position() as f64 * spec.step;
            assert_eq!(spec.normalize(from_slider), stored);
        }
    }

    #[test]
    fn writes_outside_bounds_are_clamped() {
        for (index, spec) in CATALOG.iter().enumerate() {
            let mut session = session_at(index);
            assert_eq!(
                session.set_value(InputSource::Entry, spec.max + 1000.0),
                Ok(spec.max)
            );
            assert_eq!(
                session.set_value(InputSource::Slider, spec.min - 1000.0),
                Ok(spec.min)
            );
            assert_eq!(
                session.commit_text(&format!("{}", spec.max * 10.0)),
                Ok(spec.max)
            );
            assert_eq!(session.commit_text("-inf"), Ok(spec.min));
            assert_eq!(session.value_at(index), Some(spec.min));
        }
    }

    #[test]
    fn entry_snaps_to_step() {
        let mut session = SessionState::new();
        assert_eq!(session.commit_text("7.26"), Ok(7.3));
        assert_eq!(session.binding().unwrap().entry_text(), "7.3");
    }

    #[test]
    fn garbage_text_is_rejected() {
        let mut session = SessionState::new();
        session.commit_text("8.5").unwrap();
        assert_eq!(
            session.commit_text("8,x"),
            Err(EntryError::NotANumber { text: "8,x".into() })
        );
        assert!(session.commit_text("NaN").is_err());
        assert_eq!(session.value("ph"), Some(8.5));
    }

    #[test]
    fn nudge_stops_at_bounds() {
        let mut session = SessionState::new();
        assert_eq!(session.nudge(-10_000), Ok(1.0));
        assert_eq!(session.nudge(10_000), Ok(14.0));
        assert_eq!(session.jump_to_min(), Ok(1.0));
        assert_eq!(session.jump_to_max(), Ok(14.0));
    }

    #[test]
    fn changing_step_rebinds_widgets() {
        let mut session = SessionState::new();
        session.commit_text("9.0").unwrap();
        session.advance().unwrap();
        let binding = session.binding().unwrap();
        assert_eq!(binding.spec.key, "Hardness");
        assert_eq!(binding.value, 150.0);

        session.retreat().unwrap();
        assert_eq!(session.binding().unwrap().value, 9.0);
    }

    #[test]
    fn cleared_value_shows_default_but_stays_unset() {
        let mut session = SessionState::new();
        session.commit_text("3.0").unwrap();
        session.clear().unwrap();

        let binding = session.binding().unwrap();
        assert_eq!(binding.value, 7.0);
        assert!(!binding.is_set);
        assert_eq!(session.value("ph"), None);

        session.nudge(0).unwrap();
        assert_eq!(session.value("ph"), Some(7.0));
    }

    #[test]
    fn inputs_are_refused_on_results_page() {
        let mut session = session_at(NUM_PARAMS - 1);
        session.submit().unwrap();
        assert!(session.binding().is_none());
        assert_eq!(
            session.set_value(InputSource::Slider, 1.0),
            Err(EntryError::NotEditing)
        );
        assert_eq!(session.clear(), Err(EntryError::NotEditing));
    }

    #[test]
    fn restart_restores_defaults_from_any_state() {
        let mut session = SessionState::new();
        for _ in 0..NUM_PARAMS - 1 {
            session.jump_to_max().unwrap();
            session.advance().unwrap();
        }
        session.clear().unwrap();
        session.submit().unwrap();

        assert_eq!(session.restart(), Ok(1));
        assert_eq!(session, SessionState::new());
    }
}
