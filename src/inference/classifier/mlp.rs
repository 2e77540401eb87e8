use ndarray::{array, Array1, Array2, ArrayView1};
use serde::Deserialize;

use super::{Classifier, ProbabilityEstimator};
use crate::error::ModelError;

/// Element-wise activation applied after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Identity,
    Relu,
    Sigmoid,
}

impl Activation {
    pub fn f(&self, z: f64) -> f64 {
        match self {
            Activation::Identity => z,
            Activation::Relu => z.max(0.0),
            Activation::Sigmoid => 1. / (1. + (-z).exp()),
        }
    }
}

/// A fully connected layer: `a = act(x · w + b)`.
#[derive(Debug, Clone)]
pub struct Dense {
    w: Array2<f64>,
    b: Array1<f64>,
    act_fn: Activation,
}

impl Dense {
    /// Creates a new `Dense` layer.
    ///
    /// # Arguments
    /// * `w` - The `(n_in, n_out)` weight matrix.
    /// * `b` - The `n_out` biases.
    /// * `act_fn` - The activation applied to the output.
    ///
    /// # Errors
    /// When the bias length does not match the weight matrix.
    pub fn new(w: Array2<f64>, b: Array1<f64>, act_fn: Activation) -> Result<Self, String> {
        if w.ncols() != b.len() {
            return Err(format!(
                "layer has {} outputs but {} biases",
                w.ncols(),
                b.len()
            ));
        }

        Ok(Self { w, b, act_fn })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.w.dim()
    }

    pub fn forward(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let mut z = x.dot(&self.w) + &self.b;
        z.mapv_inplace(|z| self.act_fn.f(z));
        z
    }
}

/// A feed-forward binary classifier whose single sigmoid output is `P(classes[1])`.
#[derive(Debug, Clone)]
pub struct Mlp {
    classes: [i64; 2],
    layers: Vec<Dense>,
}

impl Mlp {
    /// Creates a new `Mlp` after checking the layers chain together.
    ///
    /// # Errors
    /// A human-readable reason when consecutive layers disagree on their sizes
    /// or the network does not end in one sigmoid unit.
    pub fn new(classes: [i64; 2], layers: Vec<Dense>) -> Result<Self, String> {
        let Some(last) = layers.last() else {
            return Err("network has no layers".into());
        };

        if last.dim().1 != 1 || last.act_fn != Activation::Sigmoid {
            return Err("the output layer must be a single sigmoid unit".into());
        }

        for (i, pair) in layers.windows(2).enumerate() {
            let (out, inp) = (pair[0].dim().1, pair[1].dim().0);
            if out != inp {
                return Err(format!(
                    "layer {i} has {out} outputs but layer {} takes {inp} inputs",
                    i + 1
                ));
            }
        }

        Ok(Self { classes, layers })
    }

    fn positive_probability(&self, x: ArrayView1<f64>) -> Result<f64, ModelError> {
        super::check_len("network input", x, self.n_features())?;

        let mut a = x.to_owned();
        for layer in &self.layers {
            a = layer.forward(a.view());
        }

        super::check_finite("network output", a.view())?;
        Ok(a[0])
    }
}

impl Classifier for Mlp {
    fn n_features(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.dim().0)
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ModelError> {
        let p = self.positive_probability(x)?;
        Ok(if p >= 0.5 {
            self.classes[1]
        } else {
            self.classes[0]
        })
    }

    fn estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        Some(self)
    }
}

impl ProbabilityEstimator for Mlp {
    fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        let p = self.positive_probability(x)?;
        Ok(array![1.0 - p, p])
    }
}
