//! Dynamic Decision Tree Classifier
use super::{node::TreeNode, params::TreeParams};
use crate::data::point_set::{PointSet, RealNumber};
use nalgebra::{DMatrix, DVector};
use std::error::Error;

/// A binary decision tree classifier over mixed-kind features that stays
/// maintainable after fitting: labeled points can be inserted and deleted,
/// and each affected subtree rebuilds itself once its pending-modification
/// budget runs out.
#[derive(Debug, Clone)]
pub struct DynamicTreeClassifier<T: RealNumber> {
    root: Option<TreeNode<T>>,
    params: TreeParams,
}

impl<T: RealNumber> Default for DynamicTreeClassifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber> DynamicTreeClassifier<T> {
    /// Creates a new instance of the classifier with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            params: TreeParams::new(),
        }
    }

    /// Creates a new instance of the classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `height` - The initial depth budget of the tree.
    /// * `min_split_points` - The minimum number of points per child of a split.
    /// * `beta` - The rebuild-amortization threshold.
    ///
    /// # Errors
    ///
    /// This method will return an error if `min_split_points` is zero or if
    /// `beta` is negative or not a number.
    pub fn with_params(
        height: Option<u16>,
        min_split_points: Option<usize>,
        beta: Option<f64>,
    ) -> Result<Self, Box<dyn Error>> {
        let mut tree = Self::new();
        if let Some(height) = height {
            tree.params.set_height(height);
        }
        if let Some(min_split_points) = min_split_points {
            tree.params.set_min_split_points(min_split_points)?;
        }
        if let Some(beta) = beta {
            tree.params.set_beta(beta)?;
        }
        Ok(tree)
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// The root node of the fitted tree, the entry point for depth-first
    /// inspection via [`TreeNode::walk`].
    pub fn root(&self) -> Option<&TreeNode<T>> {
        self.root.as_ref()
    }

    /// Builds the tree from a point set.
    ///
    /// # Errors
    ///
    /// This method will return an error if the point set is empty.
    pub fn fit(&mut self, points: PointSet<T>) -> Result<(), Box<dyn Error>> {
        if !points.is_not_empty() {
            return Err("Cannot fit the tree on an empty point set.".into());
        }
        self.root = Some(TreeNode::fit(
            points,
            self.params.height(),
            self.params.min_split_points(),
            self.params.beta(),
        ));
        Ok(())
    }

    /// Classifies a single point.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or the
    /// point width does not match the tree's feature columns.
    pub fn decide(&self, features: &DVector<T>) -> Result<bool, Box<dyn Error>> {
        let root = self.fitted_root(features.len())?;
        Ok(root.decide(features))
    }

    /// Classifies every row of a feature matrix.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or the
    /// matrix width does not match the tree's feature columns.
    pub fn predict(&self, features: &DMatrix<T>) -> Result<DVector<bool>, Box<dyn Error>> {
        let root = self.fitted_root(features.ncols())?;
        let predictions: Vec<_> = features
            .row_iter()
            .map(|row| root.decide(&row.transpose()))
            .collect();
        Ok(DVector::from_vec(predictions))
    }

    /// Adds a labeled training point, rebuilding overdue subtrees along its
    /// decision path.
    pub fn insert(&mut self, features: &DVector<T>, label: bool) -> Result<(), Box<dyn Error>> {
        self.fitted_root(features.len())?;
        self.root.as_mut().unwrap().insert(features, label);
        Ok(())
    }

    /// Removes the first training point whose feature vector equals
    /// `features`. The label is accepted for protocol symmetry and ignored:
    /// matching considers feature vectors only, and a point without a match
    /// is removed from no node.
    pub fn delete(&mut self, features: &DVector<T>, _label: bool) -> Result<(), Box<dyn Error>> {
        self.fitted_root(features.len())?;
        self.root.as_mut().unwrap().delete(features);
        Ok(())
    }

    fn fitted_root(&self, width: usize) -> Result<&TreeNode<T>, Box<dyn Error>> {
        let root = match &self.root {
            Some(root) => root,
            None => return Err("Tree wasn't built yet.".into()),
        };
        if width != root.points().n_features() {
            return Err("The point width does not match the tree's feature columns.".into());
        }
        Ok(root)
    }
}
