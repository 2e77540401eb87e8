use std::path::Path;

use super::{
    artifact,
    classifier::{Capability, Model},
    scaler::Scaler,
};
use crate::{
    error::{PotabilityError, Result},
    features::FeatureVector,
};

/// The model's verdict on a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Potable,
    NonPotable,
    /// Anything outside the expected `{0, 1}`; kept verbatim.
    Unrecognized(i64),
}

impl Label {
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Label::Potable,
            0 => Label::NonPotable,
            other => Label::Unrecognized(other),
        }
    }
}

/// The outcome of one successful inference pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub label: Label,
    /// Probability of the predicted class, absent for label-only models.
    pub confidence: Option<f64>,
}

/// Scales a feature vector and runs it through the model.
///
/// Both artifacts are loaded once and never change afterwards, so a single
/// pipeline can serve any number of sessions by shared reference.
#[derive(Debug)]
pub struct InferencePipeline {
    model: Result<Model>,
    scaler: Result<Box<dyn Scaler>>,
}

impl InferencePipeline {
    /// Creates a new `InferencePipeline` from already loaded artifacts.
    pub fn new(model: Model, scaler: Box<dyn Scaler>) -> Self {
        Self::from_parts(Ok(model), Ok(scaler))
    }

    /// Creates a pipeline that remembers why an artifact could not be loaded.
    pub fn from_parts(model: Result<Model>, scaler: Result<Box<dyn Scaler>>) -> Self {
        Self { model, scaler }
    }

    /// Loads both artifacts from disk.
    ///
    /// Never fails: load failures are kept and reported by every [`run`](Self::run).
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, scaler_path: Q) -> Self {
        let model = artifact::load_model(model_path);
        let scaler = artifact::load_scaler(scaler_path);

        for err in [model.as_ref().err(), scaler.as_ref().err()].into_iter().flatten() {
            log::warn!("inference disabled: {err}");
        }

        Self::from_parts(model, scaler)
    }

    /// The artifact failures found at load time.
    pub fn load_errors(&self) -> Vec<&PotabilityError> {
        [self.model.as_ref().err(), self.scaler.as_ref().err()]
            .into_iter()
            .flatten()
            .collect()
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_ok() && self.scaler.is_ok()
    }

    /// Whether predictions come with a confidence figure.
    pub fn capability(&self) -> Option<Capability> {
        self.model.as_ref().ok().map(Model::capability)
    }

    /// Runs inference on an assembled vector.
    ///
    /// Checks happen in this order: incomplete input, model, scaler, scaling,
    /// prediction. Nothing is sent to the scaler unless the vector is complete.
    ///
    /// # Errors
    /// One of the named [`PotabilityError`] conditions.
    pub fn run(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let x = features.complete()?;
        let model = self.model.as_ref().map_err(Clone::clone)?;
        let scaler = self.scaler.as_ref().map_err(Clone::clone)?;

        let scaled = scaler.transform(x).map_err(|e| {
            log::error!("scaling failed: {e}");
            PotabilityError::ScalingFailure {
                reason: e.to_string(),
                vector: features.labelled(),
            }
        })?;

        let prediction_failure = |e: crate::error::ModelError| {
            log::error!("prediction failed: {e}");
            PotabilityError::PredictionFailure {
                reason: e.to_string(),
                vector: features.labelled(),
            }
        };

        let raw = model.predict(scaled.view()).map_err(prediction_failure)?;
        let distribution = model
            .predict_proba(scaled.view())
            .transpose()
            .map_err(prediction_failure)?;

        let confidence = distribution.and_then(|proba| {
            let index = model.classes().iter().position(|&c| c == raw)?;
            proba.get(index).copied()
        });

        let label = Label::from_raw(raw);
        log::info!("prediction {label:?} (raw {raw}), confidence {confidence:?}");

        Ok(PredictionResult { label, confidence })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array1, ArrayView1};

    use super::*;
    use crate::{
        error::{Artifact, ModelError},
        inference::classifier::{Classifier, ProbabilityEstimator},
        session::SessionState,
    };

    #[derive(Debug)]
    struct Identity;

    impl Scaler for Identity {
        fn n_features(&self) -> usize {
            crate::catalog::NUM_PARAMS
        }

        fn transform(&self, x: ArrayView1<f64>) -> std::result::Result<Array1<f64>, ModelError> {
            Ok(x.to_owned())
        }
    }

    struct Fixed {
        raw: i64,
        classes: Vec<i64>,
        proba: Option<Array1<f64>>,
    }

    impl Classifier for Fixed {
        fn n_features(&self) -> usize {
            crate::catalog::NUM_PARAMS
        }

        fn classes(&self) -> &[i64] {
            &self.classes
        }

        fn predict(&self, _x: ArrayView1<f64>) -> std::result::Result<i64, ModelError> {
            Ok(self.raw)
        }

        fn estimator(&self) -> Option<&dyn ProbabilityEstimator> {
            self.proba.as_ref().map(|_| self as &dyn ProbabilityEstimator)
        }
    }

    impl ProbabilityEstimator for Fixed {
        fn predict_proba(&self, _x: ArrayView1<f64>) -> std::result::Result<Array1<f64>, ModelError> {
            Ok(self.proba.clone().unwrap_or_default())
        }
    }

    /// Fails every prediction, as a model fed a vector it cannot handle would.
    struct Broken;

    impl Classifier for Broken {
        fn n_features(&self) -> usize {
            crate::catalog::NUM_PARAMS
        }

        fn classes(&self) -> &[i64] {
            &[0, 1]
        }

        fn predict(&self, _x: ArrayView1<f64>) -> std::result::Result<i64, ModelError> {
            Err(ModelError::NonFinite {
                what: "decision value",
                index: 0,
            })
        }
    }

    fn pipeline(raw: i64, proba: Option<Array1<f64>>) -> InferencePipeline {
        let model = Model::new(Box::new(Fixed {
            raw,
            classes: vec![0, 1],
            proba,
        }));
        InferencePipeline::new(model, Box::new(Identity))
    }

    fn defaults() -> FeatureVector {
        FeatureVector::assemble(&SessionState::new())
    }

    #[test]
    fn confidence_is_probability_of_predicted_class() {
        let result = pipeline(1, Some(array![0.3, 0.7])).run(&defaults()).unwrap();
        assert_eq!(result.label, Label::Potable);
        assert_eq!(result.confidence, Some(0.7));

        let result = pipeline(0, Some(array![0.6, 0.4])).run(&defaults()).unwrap();
        assert_eq!(result.label, Label::NonPotable);
        assert_eq!(result.confidence, Some(0.6));
    }

    #[test]
    fn label_only_model_yields_no_confidence() {
        let p = pipeline(0, None);
        assert_eq!(p.capability(), Some(Capability::LabelOnly));
        assert_eq!(
            p.run(&defaults()),
            Ok(PredictionResult {
                label: Label::NonPotable,
                confidence: None
            })
        );
    }

    #[test]
    fn unexpected_label_is_not_an_error() {
        let result = pipeline(7, Some(array![0.5, 0.5])).run(&defaults()).unwrap();
        assert_eq!(result.label, Label::Unrecognized(7));
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn incomplete_vector_is_reported_before_artifacts() {
        let mut session = SessionState::new();
        session.clear().unwrap();
        let features = FeatureVector::assemble(&session);

        let missing_model = InferencePipeline::from_parts(
            Err(PotabilityError::ArtifactMissing {
                artifact: Artifact::Model,
                path: "model.json".into(),
            }),
            Ok(Box::new(Identity)),
        );

        assert_eq!(
            missing_model.run(&features),
            Err(PotabilityError::IncompleteInput {
                missing: vec!["ph"]
            })
        );
    }

    #[test]
    fn missing_model_is_reported_before_missing_scaler() {
        let model_err = PotabilityError::ArtifactMissing {
            artifact: Artifact::Model,
            path: "model.json".into(),
        };
        let scaler_err = PotabilityError::ArtifactMissing {
            artifact: Artifact::Scaler,
            path: "scaler.json".into(),
        };
        let p = InferencePipeline::from_parts(Err(model_err.clone()), Err(scaler_err));

        assert!(!p.is_ready());
        assert_eq!(p.load_errors().len(), 2);
        assert_eq!(p.run(&defaults()), Err(model_err));
    }

    #[test]
    fn scaler_shape_mismatch_is_scaling_failure() {
        let model = Model::new(Box::new(Fixed {
            raw: 1,
            classes: vec![0, 1],
            proba: None,
        }));
        let scaler = crate::inference::scaler::StandardScaler::new(array![0.0], array![1.0]).unwrap();
        let p = InferencePipeline::new(model, Box::new(scaler));

        match p.run(&defaults()) {
            Err(err @ PotabilityError::ScalingFailure { .. }) => {
                let vector = err.offending_vector().unwrap();
                assert_eq!(vector.len(), crate::catalog::NUM_PARAMS);
                assert_eq!(vector[0], ("ph", 7.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failing_model_is_prediction_failure() {
        let p = InferencePipeline::new(Model::new(Box::new(Broken)), Box::new(Identity));

        match p.run(&defaults()) {
            Err(err @ PotabilityError::PredictionFailure { .. }) => {
                assert!(!err.is_permanent());
                let vector = err.offending_vector().unwrap();
                assert_eq!(vector.len(), crate::catalog::NUM_PARAMS);
                assert_eq!(vector[0], ("ph", 7.0));
                assert_eq!(vector[8], ("Turbidity", 4.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
