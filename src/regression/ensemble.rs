//! Decision-tree ensembles: boosted (XGB) and bagged (extra trees).

use serde::{Deserialize, Serialize};

use super::Regressor;

/// How per-tree outputs combine into the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: `base_score + Σ trees`
    Sum { base_score: Vec<f64> },
    /// Bagged forests: mean over trees
    Mean,
}

/// A node of a flat, index-linked decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// One value per model output.
    Leaf { values: Vec<f64> },
}

/// A regression tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk from the root to a leaf. Assumes [`TreeEnsemble::validate`] passed.
    fn leaf(&self, features: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { values } => return values,
            }
        }
    }

    fn validate(&self, n_features: usize, n_outputs: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {idx} splits on feature {feature}, model has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite threshold"));
                    }
                    // Children must point forward, which also rules out cycles.
                    for child in [*left, *right] {
                        if child <= idx || child >= len {
                            return Err(format!("node {idx} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { values } => {
                    if values.len() != n_outputs {
                        return Err(format!(
                            "leaf {idx} has {} values, expected {n_outputs}",
                            values.len()
                        ));
                    }
                    if values.iter().any(|v| !v.is_finite()) {
                        return Err(format!("leaf {idx} contains a non-finite value"));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Ensemble of regression trees sharing one feature/output layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub n_outputs: usize,
    pub aggregation: Aggregation,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Check tree structure, leaf widths, and aggregation parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 || self.n_outputs == 0 {
            return Err("tree ensemble needs at least one feature and one output".to_string());
        }
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        if let Aggregation::Sum { base_score } = &self.aggregation {
            if base_score.len() != self.n_outputs {
                return Err(format!(
                    "base_score has {} values, expected {}",
                    base_score.len(),
                    self.n_outputs
                ));
            }
            if base_score.iter().any(|v| !v.is_finite()) {
                return Err("non-finite base_score".to_string());
            }
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_outputs)
                .map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    fn predict(&self, features: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.n_outputs];
        for tree in &self.trees {
            for (acc, v) in out.iter_mut().zip(tree.leaf(features)) {
                *acc += v;
            }
        }
        match &self.aggregation {
            Aggregation::Sum { base_score } => {
                for (acc, base) in out.iter_mut().zip(base_score) {
                    *acc += base;
                }
            }
            Aggregation::Mean => {
                let n = self.trees.len() as f64;
                for acc in out.iter_mut() {
                    *acc /= n;
                }
            }
        }
        out
    }

    fn validate(&self) -> Result<(), String> {
        TreeEnsemble::validate(self)
    }
}
