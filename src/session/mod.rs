mod navigator;
mod synchronizer;

pub use navigator::{NavAction, NavigationError, Phase};
pub use synchronizer::{Binding, EntryError, InputSource};

use crate::catalog::{self, ParameterSpec, CATALOG, NUM_PARAMS};

/// Step index of the results state.
pub const RESULTS_STEP: usize = NUM_PARAMS + 1;

/// Per-session wizard state: which step is shown and what has been entered so far.
///
/// `step` is only moved by the navigator operations and `values` only by the
/// synchronizer operations; everything else reads.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    step: usize,
    values: [Option<f64>; NUM_PARAMS],
}

impl SessionState {
    /// Creates a new `SessionState` at step 1 with every parameter at its default.
    pub fn new() -> Self {
        Self {
            step: 1,
            values: CATALOG.map(|spec| Some(spec.default)),
        }
    }

    /// The current step, `1..=N` while editing and `N + 1` on the results page.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The stored value of the parameter at `index` in catalog order.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// The stored value for `key`, `None` when unset or unknown.
    pub fn value(&self, key: &str) -> Option<f64> {
        catalog::find(key).and_then(|(index, _)| self.value_at(index))
    }

    /// Iterates parameters in catalog order alongside their stored values.
    pub fn entries(&self) -> impl Iterator<Item = (&'static ParameterSpec, Option<f64>)> + '_ {
        CATALOG.iter().zip(self.values.iter().copied())
    }

    /// The parameter being edited, `None` on the results page.
    pub fn current_spec(&self) -> Option<&'static ParameterSpec> {
        match self.phase() {
            Phase::Editing(index) => Some(&CATALOG[index]),
            Phase::Results => None,
        }
    }

    fn reset_values(&mut self) {
        self.values = CATALOG.map(|spec| Some(spec.default));
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
