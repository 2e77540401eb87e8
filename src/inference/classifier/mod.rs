mod forest;
mod mlp;
mod svm;

pub use forest::{Node, RandomForest, Tree};
pub use mlp::{Activation, Dense, Mlp};
pub use svm::LinearSvm;

use ndarray::{Array1, ArrayView1};

use crate::error::ModelError;

/// A fitted classifier: maps one feature vector to a class label.
pub trait Classifier: Send + Sync {
    /// Number of features the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// The class labels, in the order probability distributions are reported.
    fn classes(&self) -> &[i64];

    /// Predicts the label for `x`.
    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ModelError>;

    /// Returns the probability estimator for classifiers that have one.
    fn estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        None
    }
}

/// Classifiers able to report a distribution over their classes.
pub trait ProbabilityEstimator: Send + Sync {
    /// One probability per entry of [`Classifier::classes`].
    fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError>;
}

/// What a loaded model can do beyond predicting a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    LabelOnly,
    Probability,
}

/// A loaded classifier together with its capability, resolved once when it is built.
pub struct Model {
    classifier: Box<dyn Classifier>,
    capability: Capability,
}

impl Model {
    /// Creates a new `Model`.
    ///
    /// # Arguments
    /// * `classifier` - The fitted classifier.
    ///
    /// # Returns
    /// A new `Model` instance.
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        let capability = match classifier.estimator() {
            Some(_) => Capability::Probability,
            None => Capability::LabelOnly,
        };

        Self {
            classifier,
            capability,
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn n_features(&self) -> usize {
        self.classifier.n_features()
    }

    pub fn classes(&self) -> &[i64] {
        self.classifier.classes()
    }

    pub fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ModelError> {
        check_len("model input", x, self.n_features())?;
        self.classifier.predict(x)
    }

    /// The class distribution for `x`, `None` for label-only models.
    pub fn predict_proba(&self, x: ArrayView1<f64>) -> Option<Result<Array1<f64>, ModelError>> {
        match self.capability {
            Capability::LabelOnly => None,
            Capability::Probability => {
                let estimator = self.classifier.estimator()?;
                let proba = check_len("model input", x, self.n_features())
                    .and_then(|_| estimator.predict_proba(x));
                Some(proba)
            }
        }
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("n_features", &self.n_features())
            .field("classes", &self.classes())
            .field("capability", &self.capability)
            .finish()
    }
}

/// Fails with a `SizeMismatch` unless `x` holds exactly `expected` values.
pub(crate) fn check_len(
    what: &'static str,
    x: ArrayView1<f64>,
    expected: usize,
) -> Result<(), ModelError> {
    if x.len() != expected {
        return Err(ModelError::SizeMismatch {
            what,
            got: x.len(),
            expected,
        });
    }

    Ok(())
}

/// Fails with `NonFinite` at the first NaN or infinite value of `x`.
pub(crate) fn check_finite(what: &'static str, x: ArrayView1<f64>) -> Result<(), ModelError> {
    match x.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ModelError::NonFinite { what, index }),
        None => Ok(()),
    }
}

/// Index of the largest value, the first one on ties.
pub(crate) fn argmax(x: ArrayView1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in x.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }

    best.map(|(i, _)| i)
}
