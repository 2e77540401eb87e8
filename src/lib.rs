//! Water potability analysis: a step-by-step parameter form and the
//! inference pipeline that turns its values into a verdict.

pub mod catalog;
pub mod error;
pub mod features;
pub mod inference;
pub mod presenter;
pub mod session;

pub use catalog::{ParameterSpec, CATALOG, NUM_PARAMS};
pub use error::{Artifact, ModelError, PotabilityError, Result};
pub use features::FeatureVector;
pub use inference::{InferencePipeline, Label, PredictionResult};
pub use presenter::{Report, Verdict};
pub use session::{NavAction, Phase, SessionState};
