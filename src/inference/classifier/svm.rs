use ndarray::{Array1, ArrayView1};

use super::Classifier;
use crate::error::ModelError;

/// A linear support vector machine. It only separates, so it reports no probabilities.
#[derive(Debug, Clone)]
pub struct LinearSvm {
    classes: [i64; 2],
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearSvm {
    pub fn new(classes: [i64; 2], coefficients: Array1<f64>, intercept: f64) -> Result<Self, String> {
        if coefficients.is_empty() {
            return Err("svm has no coefficients".into());
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("svm has non-finite coefficients".into());
        }

        Ok(Self {
            classes,
            coefficients,
            intercept,
        })
    }

    /// Signed distance to the separating hyperplane.
    pub fn decision_function(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        super::check_len("svm input", x, self.coefficients.len())?;
        super::check_finite("svm input", x)?;
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}

impl Classifier for LinearSvm {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ModelError> {
        let d = self.decision_function(x)?;
        Ok(if d > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::inference::classifier::{Capability, Model};

    #[test]
    fn sign_of_decision_picks_class() {
        let svm = LinearSvm::new([0, 1], array![1.0, 1.0], -1.0).unwrap();
        assert_eq!(svm.predict(array![1.0, 1.0].view()), Ok(1));
        assert_eq!(svm.predict(array![0.5, 0.5].view()), Ok(0));
    }

    #[test]
    fn has_no_probability_capability() {
        let svm = LinearSvm::new([0, 1], array![1.0], 0.0).unwrap();
        let model = Model::new(Box::new(svm));
        assert_eq!(model.capability(), Capability::LabelOnly);
        assert!(model.predict_proba(array![3.0].view()).is_none());
    }
}
