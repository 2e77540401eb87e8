use crate::{
    error::{Artifact, PotabilityError},
    features::FeatureVector,
    inference::{InferencePipeline, Label, PredictionResult},
    session::SessionState,
};

/// What the results page tells the user about the sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Potable { confidence: Option<f64> },
    NonPotable { confidence: Option<f64> },
    Unrecognized { raw: i64 },
}

impl Verdict {
    pub fn from_prediction(prediction: &PredictionResult) -> Self {
        let confidence = prediction.confidence;
        match prediction.label {
            Label::Potable => Verdict::Potable { confidence },
            Label::NonPotable => Verdict::NonPotable { confidence },
            Label::Unrecognized(raw) => Verdict::Unrecognized { raw },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Verdict::Potable { .. } => "Potable",
            Verdict::NonPotable { .. } => "Non-Potable",
            Verdict::Unrecognized { .. } => "Unrecognized",
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Verdict::Potable { .. } => "The water is predicted to be POTABLE.".into(),
            Verdict::NonPotable { .. } => "The water is predicted to be NON-POTABLE.".into(),
            Verdict::Unrecognized { raw } => {
                format!("Model returned an unexpected prediction value: {raw}")
            }
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            Verdict::Potable { confidence } | Verdict::NonPotable { confidence } => *confidence,
            Verdict::Unrecognized { .. } => None,
        }
    }

    /// e.g. `Model Confidence: 70.00% Potable`
    pub fn confidence_line(&self) -> Option<String> {
        self.confidence()
            .map(|c| format!("Model Confidence: {} {}", percent(c), self.title()))
    }
}

/// Formats a probability as a percentage with two decimals.
pub fn percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// One row of the parameters summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub parameter: String,
    pub value: String,
}

/// Everything the results page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Vec<SummaryRow>,
    pub outcome: Result<Verdict, PotabilityError>,
}

impl Report {
    /// Assembles the session's features, runs them through the pipeline and
    /// shapes the outcome for display. Does not touch the session.
    pub fn build(session: &SessionState, pipeline: &InferencePipeline) -> Self {
        let features = FeatureVector::assemble(session);
        let outcome = pipeline
            .run(&features)
            .map(|prediction| Verdict::from_prediction(&prediction));

        Self {
            summary: summary(session),
            outcome,
        }
    }

    /// User-facing lines describing a failed outcome, empty on success.
    pub fn messages(&self) -> Vec<String> {
        let Err(err) = &self.outcome else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        match err {
            PotabilityError::IncompleteInput { missing } => {
                lines.extend(missing.iter().map(|key| {
                    format!("Parameter '{key}' was not set. Please go back and fill all values.")
                }));
                lines.push(
                    "Cannot perform analysis because some parameters are missing. \
                     Please use the 'Start Over' button."
                        .into(),
                );
            }
            PotabilityError::ArtifactMissing { artifact, .. }
            | PotabilityError::ArtifactIncompatible { artifact, .. } => {
                lines.push(format!("{err}."));
                lines.push("Cannot perform analysis.".into());
                if *artifact == Artifact::Scaler {
                    lines.push(
                        "If your model was trained on scaled data, predictions will be \
                         incorrect without the scaler."
                            .into(),
                    );
                }
            }
            PotabilityError::ScalingFailure { .. } | PotabilityError::PredictionFailure { .. } => {
                lines.push(format!("An error occurred during prediction: {err}"));
                lines.push(
                    "Please ensure all parameters were entered correctly and the \
                     model/scaler are compatible with the input."
                        .into(),
                );
                if let Some(vector) = err.offending_vector() {
                    let data = vector
                        .iter()
                        .map(|(key, value)| format!("{key}={value}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    lines.push(format!("Data sent to scaler: {data}"));
                }
            }
        }

        lines
    }
}

/// The parameters table: display name and value, `N/A` when unset.
pub fn summary(session: &SessionState) -> Vec<SummaryRow> {
    session
        .entries()
        .map(|(spec, value)| SummaryRow {
            parameter: spec.label(),
            value: value.map_or_else(|| "N/A".into(), |v| spec.format(v)),
        })
        .collect()
}
