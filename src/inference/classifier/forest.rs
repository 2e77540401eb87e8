use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::{argmax, Classifier, ProbabilityEstimator};
use crate::error::ModelError;

/// A node of a fitted decision tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Go to `left` when `x[feature] <= threshold`, to `right` otherwise.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights of the training samples that ended here.
    Leaf { value: Vec<f64> },
}

/// A decision tree stored as a flat node array rooted at index 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Follows the splits down to a leaf.
    ///
    /// Validation guarantees children always point forward, so this terminates.
    fn leaf(&self, x: ArrayView1<f64>) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if x[*feature] <= *threshold { *left } else { *right },
                Node::Leaf { value } => return value,
            }
        }
    }

    fn validate(&self, t: usize, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree {t} has no nodes"));
        }

        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "tree {t} node {i} splits on feature {feature} of {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("tree {t} node {i} has a non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= len {
                            return Err(format!(
                                "tree {t} node {i} points to invalid child {child}"
                            ));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "tree {t} leaf {i} has {} class weights, expected {n_classes}",
                            value.len()
                        ));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(format!("tree {t} leaf {i} has invalid class weights"));
                    }
                }
            }
        }

        Ok(())
    }
}

/// An ensemble of decision trees voting by averaged class probabilities.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<Tree>,
}

impl RandomForest {
    /// Creates a new `RandomForest` after checking every tree is well formed.
    ///
    /// # Errors
    /// A human-readable reason when the trees do not fit `n_features` and `classes`.
    pub fn new(n_features: usize, classes: Vec<i64>, trees: Vec<Tree>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("forest has no classes".into());
        }
        if trees.is_empty() {
            return Err("forest has no trees".into());
        }

        for (t, tree) in trees.iter().enumerate() {
            tree.validate(t, n_features, classes.len())?;
        }

        Ok(Self {
            n_features,
            classes,
            trees,
        })
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ModelError> {
        let proba = self.predict_proba(x)?;
        let best = argmax(proba.view()).ok_or(ModelError::SizeMismatch {
            what: "class distribution",
            got: 0,
            expected: self.classes.len(),
        })?;

        Ok(self.classes[best])
    }

    fn estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        Some(self)
    }
}

impl ProbabilityEstimator for RandomForest {
    fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        super::check_len("forest input", x, self.n_features)?;
        super::check_finite("forest input", x)?;

        let n_classes = self.classes.len();
        let mut proba = Array1::zeros(n_classes);

        for tree in &self.trees {
            let leaf = ArrayView1::from(tree.leaf(x));
            let total = leaf.sum();
            if total > 0.0 {
                proba.scaled_add(1.0 / total, &leaf);
            } else {
                proba += 1.0 / n_classes as f64;
            }
        }

        proba /= self.trees.len() as f64;
        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    /// x[0] <= 0.5 -> mostly class 0, otherwise mostly class 1.
    fn stump(low: [f64; 2], high: [f64; 2]) -> Tree {
        Tree {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                Node::Leaf {
                    value: low.to_vec(),
                },
                Node::Leaf {
                    value: high.to_vec(),
                },
            ],
        }
    }

    #[test]
    fn averages_normalized_leaves() {
        let forest = RandomForest::new(
            2,
            vec![0, 1],
            vec![stump([8.0, 2.0], [1.0, 3.0]), stump([1.0, 0.0], [0.0, 5.0])],
        )
        .unwrap();

        let low = forest.predict_proba(array![0.0, 9.0].view()).unwrap();
        assert!((low[0] - 0.9).abs() < 1e-12);
        assert!((low[1] - 0.1).abs() < 1e-12);
        assert_eq!(forest.predict(array![0.0, 9.0].view()), Ok(0));

        let high = forest.predict_proba(array![1.0, 9.0].view()).unwrap();
        assert!((high[1] - 0.875).abs() < 1e-12);
        assert_eq!(forest.predict(array![1.0, 9.0].view()), Ok(1));
    }

    #[test]
    fn rejects_backward_children() {
        let tree = Tree {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 1,
                },
                Node::Leaf {
                    value: vec![1.0, 0.0],
                },
            ],
        };

        let err = RandomForest::new(1, vec![0, 1], vec![tree]).unwrap_err();
        assert!(err.contains("invalid child 0"), "{err}");
    }

    #[test]
    fn rejects_leaf_with_wrong_class_count() {
        let tree = Tree {
            nodes: vec![Node::Leaf {
                value: vec![1.0, 0.0, 3.0],
            }],
        };

        assert!(RandomForest::new(1, vec![0, 1], vec![tree]).is_err());
    }

    #[test]
    fn rejects_non_finite_input() {
        let forest = RandomForest::new(2, vec![0, 1], vec![stump([1.0, 0.0], [0.0, 1.0])]).unwrap();
        assert_eq!(
            forest.predict(array![f64::NAN, 0.0].view()),
            Err(ModelError::NonFinite {
                what: "forest input",
                index: 0
            })
        );
    }

    #[test]
    fn nodes_deserialize_untagged() {
        let nodes: Vec<Node> = serde_json::from_str(
            r#"[{"feature": 1, "threshold": 2.5, "left": 1, "right": 2}, {"value": [3, 1]}]"#,
        )
        .unwrap();

        assert_eq!(
            nodes[0],
            Node::Split {
                feature: 1,
                threshold: 2.5,
                left: 1,
                right: 2
            }
        );
        assert_eq!(
            nodes[1],
            Node::Leaf {
                value: vec![3.0, 1.0]
            }
        );
    }
}
