use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the potability core.
pub type Result<T> = std::result::Result<T, PotabilityError>;

/// Which of the two external artifacts a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Model,
    Scaler,
}

impl Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Model => write!(f, "model"),
            Artifact::Scaler => write!(f, "scaler"),
        }
    }
}

/// Every failure the analysis can end in.
///
/// An unexpected model output is not listed here: it is an informational
/// outcome carried by [`crate::inference::Label::Unrecognized`].
#[derive(Debug, Clone, PartialEq)]
pub enum PotabilityError {
    /// The artifact file does not exist. Inference stays disabled until the process restarts.
    ArtifactMissing { artifact: Artifact, path: String },
    /// The artifact exists but could not be understood.
    ArtifactIncompatible {
        artifact: Artifact,
        path: String,
        reason: String,
    },
    /// One or more parameters never received a value.
    IncompleteInput { missing: Vec<&'static str> },
    /// The scaler rejected the assembled vector.
    ScalingFailure {
        reason: String,
        vector: Vec<(&'static str, f64)>,
    },
    /// The model rejected the scaled vector.
    PredictionFailure {
        reason: String,
        vector: Vec<(&'static str, f64)>,
    },
}

impl PotabilityError {
    /// Returns the vector that was being processed when inference failed, if any.
    pub fn offending_vector(&self) -> Option<&[(&'static str, f64)]> {
        match self {
            Self::ScalingFailure { vector, .. } | Self::PredictionFailure { vector, .. } => {
                Some(vector)
            }
            _ => None,
        }
    }

    /// Whether the failure is tied to the artifacts rather than to the session's input.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::ArtifactMissing { .. } | Self::ArtifactIncompatible { .. }
        )
    }
}

impl Display for PotabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactMissing { artifact, path } => {
                write!(f, "{artifact} file not found at '{path}'")
            }
            Self::ArtifactIncompatible {
                artifact,
                path,
                reason,
            } => write!(f, "{artifact} at '{path}' is incompatible: {reason}"),
            Self::IncompleteInput { missing } => {
                write!(f, "missing parameters: {}", missing.join(", "))
            }
            Self::ScalingFailure { reason, .. } => write!(f, "scaling failed: {reason}"),
            Self::PredictionFailure { reason, .. } => write!(f, "prediction failed: {reason}"),
        }
    }
}

impl Error for PotabilityError {}

/// Numeric failures raised by scalers and classifiers while processing a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    NonFinite {
        what: &'static str,
        index: usize,
    },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::SizeMismatch {
                what,
                got,
                expected,
            } => write!(f, "{what} has {got} features, expected {expected}"),
            ModelError::NonFinite { what, index } => {
                write!(f, "{what} produced a non-finite value at position {index}")
            }
        }
    }
}

impl Error for ModelError {}
