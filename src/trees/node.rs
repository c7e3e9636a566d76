use super::split::{best_split, Split, SplitData};
use crate::data::point_set::{PointSet, RealNumber};
use nalgebra::DVector;

/// A node of a dynamic decision tree. Owns its point set and, when split,
/// its two children. `height` is the remaining depth budget; a node whose
/// budget reaches zero, or that finds no usable split, is a leaf.
///
/// Nodes keep a counter of pending point modifications. Once the counter
/// reaches `beta * n` for the node's current point count `n`, the whole
/// subtree is rebuilt from its updated point set. With `beta` at zero the
/// first modification at a node always triggers the rebuild.
#[derive(Debug, Clone)]
pub struct TreeNode<T: RealNumber> {
    points: PointSet<T>,
    height: u16,
    min_split_points: usize,
    beta: f64,
    pending: usize,
    split: Option<Split<T>>,
    left: Option<Box<TreeNode<T>>>,
    right: Option<Box<TreeNode<T>>>,
}

impl<T: RealNumber> TreeNode<T> {
    /// Builds the subtree rooted at a new node from `points`.
    pub fn fit(points: PointSet<T>, height: u16, min_split_points: usize, beta: f64) -> Self {
        let mut node = Self {
            points,
            height,
            min_split_points,
            beta,
            pending: 0,
            split: None,
            left: None,
            right: None,
        };
        node.build();
        node
    }

    fn build(&mut self) {
        if self.height == 0 {
            return;
        }
        match best_split(&self.points, self.min_split_points) {
            Some(SplitData {
                split, left, right, ..
            }) => {
                self.left = Some(Box::new(TreeNode::fit(
                    left,
                    self.height - 1,
                    self.min_split_points,
                    self.beta,
                )));
                self.right = Some(Box::new(TreeNode::fit(
                    right,
                    self.height - 1,
                    self.min_split_points,
                    self.beta,
                )));
                self.split = Some(split);
            }
            // no usable split: the node stays a leaf, also across rebuilds
            None => self.height = 0,
        }
    }

    /// Classifies a point. Leaves answer with the majority label of their
    /// current point set, recomputed on every call.
    pub fn decide(&self, features: &DVector<T>) -> bool {
        match &self.split {
            None => self.points.majority(),
            Some(split) => {
                if split.goes_left(features) {
                    self.left.as_ref().unwrap().decide(features)
                } else {
                    self.right.as_ref().unwrap().decide(features)
                }
            }
        }
    }

    /// Adds a training point to every node on its decision path, rebuilding
    /// the first subtree whose pending-modification budget runs out.
    pub fn insert(&mut self, features: &DVector<T>, label: bool) {
        self.points = self.points.with_point(features, label);
        self.pending += 1;
        if self.rebuild_due() {
            self.rebuild();
            return;
        }
        let goes_left = match &self.split {
            Some(split) => split.goes_left(features),
            None => return,
        };
        if goes_left {
            self.left.as_mut().unwrap().insert(features, label);
        } else {
            self.right.as_mut().unwrap().insert(features, label);
        }
    }

    /// Removes the first point matching `features` from this node and from
    /// the child the point would be routed to. A node without a matching
    /// point stops the removal silently.
    pub fn delete(&mut self, features: &DVector<T>) {
        let remaining = match self.points.without_point(features) {
            Some(points) => points,
            None => return,
        };
        self.points = remaining;
        self.pending += 1;
        if self.rebuild_due() {
            self.rebuild();
            return;
        }
        let goes_left = match &self.split {
            Some(split) => split.goes_left(features),
            None => return,
        };
        if goes_left {
            self.left.as_mut().unwrap().delete(features);
        } else {
            self.right.as_mut().unwrap().delete(features);
        }
    }

    fn rebuild_due(&self) -> bool {
        self.pending as f64 >= self.beta * self.points.n_points() as f64
    }

    fn rebuild(&mut self) {
        self.pending = 0;
        self.split = None;
        self.left = None;
        self.right = None;
        self.build();
    }

    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    pub fn split(&self) -> Option<&Split<T>> {
        self.split.as_ref()
    }

    pub fn points(&self) -> &PointSet<T> {
        &self.points
    }

    pub fn n_points(&self) -> usize {
        self.points.n_points()
    }

    pub fn majority(&self) -> bool {
        self.points.majority()
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pending_modifications(&self) -> usize {
        self.pending
    }

    pub fn left(&self) -> Option<&TreeNode<T>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode<T>> {
        self.right.as_deref()
    }

    /// Visits the subtree depth-first in preorder, handing the visitor each
    /// node together with its depth below this one.
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(usize, &TreeNode<T>),
    {
        self.walk_from(0, visit);
    }

    fn walk_from<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(usize, &TreeNode<T>),
    {
        visit(depth, self);
        if let Some(left) = &self.left {
            left.walk_from(depth + 1, visit);
        }
        if let Some(right) = &self.right {
            right.walk_from(depth + 1, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::point_set::FeatureKind;
    use nalgebra::DMatrix;

    fn separable_set() -> PointSet<f64> {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 1.0, 0.0, 0.0]);
        let y = DVector::from_vec(vec![true, true, false, false]);
        PointSet::new(x, y, vec![FeatureKind::Boolean]).unwrap()
    }

    fn two_feature_set() -> PointSet<f64> {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let y = DVector::from_vec(vec![true, true, false, false]);
        PointSet::new(x, y, vec![FeatureKind::Boolean, FeatureKind::Boolean]).unwrap()
    }

    fn point(values: &[f64]) -> DVector<f64> {
        DVector::from_vec(values.to_vec())
    }

    #[test]
    fn test_zero_height_tree_answers_with_the_global_majority() {
        let node = TreeNode::fit(separable_set(), 0, 1, 0.0);

        assert!(node.is_leaf());
        assert!(node.decide(&point(&[1.0])));
        assert!(node.decide(&point(&[0.0])));
        assert!(node.decide(&point(&[42.0])));
    }

    #[test]
    fn test_height_one_tree_reproduces_a_separating_feature() {
        let node = TreeNode::fit(separable_set(), 1, 1, 0.0);

        assert!(!node.is_leaf());
        assert_eq!(node.split().unwrap(), &Split::Boolean { feature: 0 });
        assert!(node.decide(&point(&[1.0])));
        assert!(!node.decide(&point(&[0.0])));
        // identical tree state and input always answer identically
        assert!(node.decide(&point(&[1.0])));
        assert!(!node.decide(&point(&[0.0])));
    }

    #[test]
    fn test_node_without_positive_gain_becomes_a_leaf_for_good() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 1.0, 0.0, 0.0]);
        let y = DVector::from_vec(vec![true, true, true, true]);
        let set = PointSet::new(x, y, vec![FeatureKind::Boolean]).unwrap();
        let node = TreeNode::fit(set, 3, 1, 0.0);

        assert!(node.is_leaf());
        assert_eq!(node.height(), 0);
    }

    #[test]
    fn test_min_split_points_can_force_a_leaf() {
        // every candidate split leaves a side of 2 points, below the bound
        let node = TreeNode::fit(separable_set(), 1, 3, 0.0);
        assert!(node.is_leaf());
        assert_eq!(node.height(), 0);
    }

    #[test]
    fn test_insert_routes_by_the_split_predicate_when_no_rebuild_is_due() {
        let mut node = TreeNode::fit(separable_set(), 1, 1, 10.0);
        node.insert(&point(&[1.0]), true);

        assert_eq!(node.n_points(), 5);
        assert_eq!(node.left().unwrap().n_points(), 3);
        assert_eq!(node.right().unwrap().n_points(), 2);
        assert_eq!(node.pending_modifications(), 1);
        assert!(node.decide(&point(&[1.0])));
    }

    #[test]
    fn test_leaf_majority_tracks_inserts_without_a_rebuild() {
        let x = DMatrix::from_row_slice(3, 1, &[1.0, 2.0, 3.0]);
        let y = DVector::from_vec(vec![true, false, false]);
        let set = PointSet::new(x, y, vec![FeatureKind::Real]).unwrap();
        let mut node = TreeNode::fit(set, 0, 1, 1000.0);

        assert!(!node.decide(&point(&[2.0])));
        node.insert(&point(&[4.0]), true);
        node.insert(&point(&[5.0]), true);

        assert!(node.is_leaf());
        assert_eq!(node.pending_modifications(), 2);
        // 3 of 5 labels are now true, and the answer is fresh
        assert!(node.decide(&point(&[2.0])));
    }

    #[test]
    fn test_insert_then_delete_restores_every_visited_point_set() {
        let mut node = TreeNode::fit(two_feature_set(), 2, 1, 1e9);

        let mut before = Vec::new();
        node.walk(&mut |_, visited| before.push(visited.points().clone()));

        let fresh = point(&[1.0, 7.0]);
        node.insert(&fresh, true);
        node.delete(&fresh);

        let mut after = Vec::new();
        node.walk(&mut |_, visited| after.push(visited.points().clone()));
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_of_a_missing_point_is_a_silent_no_op() {
        let mut node = TreeNode::fit(separable_set(), 1, 1, 10.0);
        node.delete(&point(&[42.0]));

        assert_eq!(node.n_points(), 4);
        assert_eq!(node.pending_modifications(), 0);
    }

    #[test]
    fn test_zero_beta_rebuilds_on_every_insert() {
        let mut node = TreeNode::fit(separable_set(), 1, 1, 0.0);
        node.insert(&point(&[1.0]), true);

        // the rebuild consumed the counter and repartitioned the children
        assert_eq!(node.pending_modifications(), 0);
        assert_eq!(node.n_points(), 5);
        assert_eq!(node.left().unwrap().n_points(), 3);
        assert_eq!(node.right().unwrap().n_points(), 2);
        assert_eq!(node.left().unwrap().pending_modifications(), 0);
    }

    #[test]
    fn test_zero_beta_rebuilds_on_every_delete() {
        let mut node = TreeNode::fit(separable_set(), 1, 1, 0.0);
        node.delete(&point(&[1.0]));

        assert_eq!(node.pending_modifications(), 0);
        assert_eq!(node.n_points(), 3);
        assert_eq!(node.left().unwrap().n_points(), 1);
        assert_eq!(node.right().unwrap().n_points(), 2);
    }

    #[test]
    fn test_zero_beta_rebuild_lets_the_tree_change_shape() {
        let mut node = TreeNode::fit(two_feature_set(), 1, 1, 0.0);
        assert_eq!(node.split().unwrap().feature(), 0);

        // drown out the first feature until only the second one separates
        node.insert(&point(&[0.0, 1.0]), true);
        node.insert(&point(&[0.0, 1.0]), true);
        node.insert(&point(&[1.0, 0.0]), false);
        node.insert(&point(&[1.0, 0.0]), false);

        assert_eq!(node.n_points(), 8);
        assert_eq!(node.pending_modifications(), 0);
        assert_eq!(node.split().unwrap().feature(), 1);
    }
}
