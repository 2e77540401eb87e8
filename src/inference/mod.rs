pub mod artifact;
pub mod classifier;
mod pipeline;
pub mod scaler;

pub use classifier::{Capability, Classifier, Model, ProbabilityEstimator};
pub use pipeline::{InferencePipeline, Label, PredictionResult};
pub use scaler::Scaler;
