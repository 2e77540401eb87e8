use ndarray::{Array1, ArrayView1, Zip};

use super::classifier::{check_finite, check_len};
use crate::error::ModelError;

/// A fitted transformation applied to raw features before they reach the model.
pub trait Scaler: Send + Sync + std::fmt::Debug {
    /// Number of features the scaler was fitted on.
    fn n_features(&self) -> usize;

    /// Transforms one feature vector.
    fn transform(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError>;
}

/// Standardizes features: `(x - mean) / scale`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Creates a new `StandardScaler`.
    ///
    /// A zero `scale` entry is replaced by 1 so constant features pass through centered.
    ///
    /// # Errors
    /// When `mean` and `scale` differ in length or hold non-finite values.
    pub fn new(mean: Array1<f64>, scale: Array1<f64>) -> Result<Self, String> {
        fitted_pair("mean", &mean, "scale", &scale)?;
        let scale = scale.mapv(|s| if s == 0.0 { 1.0 } else { s });
        Ok(Self { mean, scale })
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        check_len("scaler input", x, self.n_features())?;
        check_finite("scaler input", x)?;

        let out = Zip::from(&x)
            .and(&self.mean)
            .and(&self.scale)
            .map_collect(|&x, &m, &s| (x - m) / s);

        check_finite("scaler output", out.view())?;
        Ok(out)
    }
}

/// Rescales features into a fitted range: `x * scale + min`.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    min: Array1<f64>,
    scale: Array1<f64>,
}

impl MinMaxScaler {
    pub fn new(min: Array1<f64>, scale: Array1<f64>) -> Result<Self, String> {
        fitted_pair("min", &min, "scale", &scale)?;
        Ok(Self { min, scale })
    }
}

impl Scaler for MinMaxScaler {
    fn n_features(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        check_len("scaler input", x, self.n_features())?;
        check_finite("scaler input", x)?;

        let out = &x * &self.scale + &self.min;

        check_finite("scaler output", out.view())?;
        Ok(out)
    }
}

fn fitted_pair(
    a_name: &str,
    a: &Array1<f64>,
    b_name: &str,
    b: &Array1<f64>,
) -> Result<(), String> {
    if a.is_empty() {
        return Err(format!("{a_name} is empty"));
    }
    if a.len() != b.len() {
        return Err(format!(
            "{a_name} has {} entries but {b_name} has {}",
            a.len(),
            b.len()
        ));
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(format!("{a_name}/{b_name} contain non-finite values"));
    }

    Ok(())
}
