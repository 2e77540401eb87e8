use ndarray::{Array1, ArrayView1};

use crate::{
    catalog::{CATALOG, NUM_PARAMS},
    error::PotabilityError,
    session::SessionState,
};

/// The session's values laid out in the model's feature order.
///
/// Unset parameters hold `NaN` and are listed in `missing`.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    values: Array1<f64>,
    missing: Vec<&'static str>,
}

impl FeatureVector {
    /// Assembles the vector from a session, strictly in catalog order.
    pub fn assemble(session: &SessionState) -> Self {
        let mut values = Array1::from_elem(NUM_PARAMS, f64::NAN);
        let mut missing = Vec::new();

        for (slot, (spec, value)) in values.iter_mut().zip(session.entries()) {
            match value {
                Some(v) => *slot = v,
                None => missing.push(spec.key),
            }
        }

        if !missing.is_empty() {
            log::warn!("feature vector incomplete, missing {missing:?}");
        }

        Self { values, missing }
    }

    /// Whether any parameter was left unset.
    pub fn is_incomplete(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Keys of the parameters left unset, in catalog order.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// The raw values, NaN where a parameter is unset.
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Number of features, always the catalog size.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` only for an empty catalog.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pairs every value with its key, for diagnostics.
    pub fn labelled(&self) -> Vec<(&'static str, f64)> {
        CATALOG
            .iter()
            .map(|spec| spec.key)
            .zip(self.values.iter().copied())
            .collect()
    }

    /// Hands out the values only when every parameter is present.
    ///
    /// # Errors
    /// `IncompleteInput` listing each missing key.
    pub fn complete(&self) -> Result<ArrayView1<'_, f64>, PotabilityError> {
        if self.is_incomplete() {
            return Err(PotabilityError::IncompleteInput {
                missing: self.missing.clone(),
            });
        }

        Ok(self.view())
    }
}
