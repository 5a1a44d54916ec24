//! Flattened decision trees
//!
//! Trees are stored as parallel node arrays, the layout produced by the
//! training pipeline's export step: `children_left[i] < 0` marks a leaf,
//! and `value[i]` holds the expected raw output of the subtree rooted at
//! node `i` (for leaves, the leaf output itself).

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// One binary decision tree in flattened form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i32>,
    pub children_right: Vec<i32>,
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    pub fn n_nodes(&self) -> usize {
        self.value.len()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] < 0
    }

    /// Expected raw output with no feature information
    pub fn root_value(&self) -> f64 {
        self.value[0]
    }

    /// Structural consistency check against the model's feature count
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.n_nodes();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        for field in [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ] {
            if field != n {
                return Err(format!("node arrays disagree on length ({} vs {})", field, n));
            }
        }
        for node in 0..n {
            if self.is_leaf(node) {
                continue;
            }
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left < 0 || right < 0 || left as usize >= n || right as usize >= n {
                return Err(format!("node {} has child index out of range", node));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!(
                    "node {} splits on feature {} but the model has {} features",
                    node, feature, n_features
                ));
            }
        }
        Ok(())
    }

    /// Index of the leaf a sample lands in
    fn descend(&self, row: ArrayView1<f64>) -> usize {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    /// Raw output for one sample
    pub fn predict_one(&self, row: ArrayView1<f64>) -> f64 {
        self.value[self.descend(row)]
    }

    /// Walk one sample's decision path, crediting each split's value shift
    /// to the feature that decided it. Returns the leaf value; after the
    /// walk, `root_value + Σ contributions == leaf value` exactly.
    pub fn path_contributions(&self, row: ArrayView1<f64>, contributions: &mut [f64]) -> f64 {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let feature = self.feature[node] as usize;
            let child = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
            contributions[feature] += self.value[child] - self.value[node];
            node = child;
        }
        self.value[node]
    }
}

/// Build a single-split stump: `x[feature] <= threshold` yields `left`,
/// otherwise `right`. `cover_left` weights the root's expected value.
pub fn stump(feature: usize, threshold: f64, left: f64, right: f64, cover_left: f64) -> DecisionTree {
    let root = left * cover_left + right * (1.0 - cover_left);
    DecisionTree {
        children_left: vec![1, -1, -1],
        children_right: vec![2, -1, -1],
        feature: vec![feature as i32, -2, -2],
        threshold: vec![threshold, 0.0, 0.0],
        value: vec![root, left, right],
    }
}
