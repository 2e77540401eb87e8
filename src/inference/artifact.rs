//! Loading of the model and scaler artifacts.
//!
//! Both artifacts are JSON documents with a `format_version` and a `kind`
//! tag. A file that does not exist is `ArtifactMissing`; anything else that
//! prevents building a usable model or scaler is `ArtifactIncompatible`.

use std::{fs, io, path::Path};

use ndarray::{Array1, Array2};
use serde::Deserialize;

use super::{
    classifier::{Activation, Dense, LinearSvm, Mlp, Model, RandomForest, Tree},
    scaler::{MinMaxScaler, Scaler, StandardScaler},
};
use crate::{
    catalog::NUM_PARAMS,
    error::{Artifact, PotabilityError, Result},
};

/// The only artifact layout this build understands.
pub const FORMAT_VERSION: u64 = 1;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelDocument {
    RandomForest {
        n_features: usize,
        classes: Vec<i64>,
        trees: Vec<Tree>,
    },
    Mlp {
        classes: [i64; 2],
        layers: Vec<LayerDocument>,
    },
    LinearSvm {
        classes: [i64; 2],
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

#[derive(Debug, Deserialize)]
struct LayerDocument {
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
    #[serde(default)]
    activation: Activation,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerDocument {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

/// Loads and validates the model artifact at `path`.
///
/// # Errors
/// `ArtifactMissing` if the file does not exist, `ArtifactIncompatible` for
/// any other problem, including a feature count other than the catalog's.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let incompatible = |reason: String| incompatible(Artifact::Model, path, reason);

    let value = read_document(Artifact::Model, path)?;
    let document: ModelDocument =
        serde_json::from_value(value).map_err(|e| incompatible(e.to_string()))?;

    let model = match document {
        ModelDocument::RandomForest {
            n_features,
            classes,
            trees,
        } => Model::new(Box::new(
            RandomForest::new(n_features, classes, trees).map_err(incompatible)?,
        )),
        ModelDocument::Mlp { classes, layers } => {
            let layers = layers
                .into_iter()
                .enumerate()
                .map(|(i, layer)| build_layer(layer).map_err(|e| format!("layer {i}: {e}")))
                .collect::<std::result::Result<Vec<_>, String>>()
                .map_err(incompatible)?;

            Model::new(Box::new(Mlp::new(classes, layers).map_err(incompatible)?))
        }
        ModelDocument::LinearSvm {
            classes,
            coefficients,
            intercept,
        } => Model::new(Box::new(
            LinearSvm::new(classes, Array1::from(coefficients), intercept).map_err(incompatible)?,
        )),
    };

    if model.n_features() != NUM_PARAMS {
        return Err(incompatible(format!(
            "model expects {} features, the form collects {NUM_PARAMS}",
            model.n_features()
        )));
    }

    log::info!(
        "loaded model from '{}' ({:?}, classes {:?})",
        path.display(),
        model.capability(),
        model.classes()
    );
    Ok(model)
}

/// Loads and validates the scaler artifact at `path`.
///
/// # Errors
/// Same classification as [`load_model`].
pub fn load_scaler<P: AsRef<Path>>(path: P) -> Result<Box<dyn Scaler>> {
    let path = path.as_ref();
    let incompatible = |reason: String| incompatible(Artifact::Scaler, path, reason);

    let value = read_document(Artifact::Scaler, path)?;
    let document: ScalerDocument =
        serde_json::from_value(value).map_err(|e| incompatible(e.to_string()))?;

    let scaler: Box<dyn Scaler> = match document {
        ScalerDocument::Standard { mean, scale } => Box::new(
            StandardScaler::new(Array1::from(mean), Array1::from(scale)).map_err(incompatible)?,
        ),
        ScalerDocument::MinMax { min, scale } => Box::new(
            MinMaxScaler::new(Array1::from(min), Array1::from(scale)).map_err(incompatible)?,
        ),
    };

    if scaler.n_features() != NUM_PARAMS {
        return Err(incompatible(format!(
            "scaler expects {} features, the form collects {NUM_PARAMS}",
            scaler.n_features()
        )));
    }

    log::info!("loaded scaler from '{}' ({scaler:?})", path.display());
    Ok(scaler)
}

/// Reads the file and checks its format version.
fn read_document(artifact: Artifact, path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PotabilityError::ArtifactMissing {
            artifact,
            path: path.display().to_string(),
        },
        _ => incompatible(artifact, path, format!("cannot read file: {e}")),
    })?;

    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| incompatible(artifact, path, format!("invalid JSON: {e}")))?;

    match value["format_version"].as_u64() {
        Some(FORMAT_VERSION) => Ok(value),
        Some(other) => Err(incompatible(
            artifact,
            path,
            format!("unsupported format_version {other}, expected {FORMAT_VERSION}"),
        )),
        None => Err(incompatible(
            artifact,
            path,
            "missing format_version".into(),
        )),
    }
}

fn build_layer(layer: LayerDocument) -> std::result::Result<Dense, String> {
    let n_in = layer.weights.len();
    let n_out = layer.weights.first().map_or(0, Vec::len);
    if n_in == 0 || n_out == 0 {
        return Err("empty weight matrix".into());
    }
    if layer.weights.iter().any(|row| row.len() != n_out) {
        return Err("weight rows differ in length".into());
    }

    let flat = layer.weights.into_iter().flatten().collect::<Vec<_>>();
    if flat.iter().chain(&layer.biases).any(|v| !v.is_finite()) {
        return Err("non-finite weights".into());
    }

    let w = Array2::from_shape_vec((n_in, n_out), flat).map_err(|e| e.to_string())?;
    Dense::new(w, Array1::from(layer.biases), layer.activation)
}

fn incompatible(artifact: Artifact, path: &Path, reason: String) -> PotabilityError {
    log::warn!("{artifact} at '{}' rejected: {reason}", path.display());
    PotabilityError::ArtifactIncompatible {
        artifact,
        path: path.display().to_string(),
        reason,
    }
}
