//! Train/held-out evaluation of a dynamic tree.

use crate::data::point_set::{PointSet, RealNumber};
use crate::metrics::binary::BinaryMetrics;
use crate::trees::classifier::DynamicTreeClassifier;
use crate::trees::params::TreeParams;
use std::error::Error;

/// One evaluation run: the first `tree_size_proportion` of the dataset
/// trains the tree, the rest is held out and scored with F1.
///
/// In streaming mode every held-out point is first classified, then
/// inserted into the tree while the oldest remaining training point is
/// retired, keeping the training window at a constant size.
#[derive(Debug, Clone)]
pub struct Evaluation {
    params: TreeParams,
    tree_size_proportion: f64,
    streaming: bool,
    shuffle_seed: Option<u64>,
}

impl BinaryMetrics for Evaluation {}

impl Default for Evaluation {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluation {
    pub fn new() -> Self {
        Self {
            params: TreeParams::new(),
            tree_size_proportion: 0.8,
            streaming: false,
            shuffle_seed: None,
        }
    }

    /// Creates an evaluation with custom options.
    ///
    /// # Errors
    ///
    /// This method will return an error if `tree_size_proportion` lies
    /// outside `(0, 1]`.
    pub fn with_options(
        params: TreeParams,
        tree_size_proportion: f64,
        streaming: bool,
        shuffle_seed: Option<u64>,
    ) -> Result<Self, Box<dyn Error>> {
        if !(tree_size_proportion > 0.0 && tree_size_proportion <= 1.0) {
            return Err("The tree size proportion must lie in (0, 1].".into());
        }
        Ok(Self {
            params,
            tree_size_proportion,
            streaming,
            shuffle_seed,
        })
    }

    /// Fits a tree on the training range, scores it over the held-out
    /// range and returns the F1 score together with the final tree.
    ///
    /// # Errors
    ///
    /// This method will return an error if the training range is empty.
    pub fn run<T: RealNumber>(
        &self,
        points: PointSet<T>,
    ) -> Result<(f64, DynamicTreeClassifier<T>), Box<dyn Error>> {
        let points = match self.shuffle_seed {
            Some(seed) => points.shuffled(seed),
            None => points,
        };
        let train_len = (points.n_points() as f64 * self.tree_size_proportion) as usize;
        if train_len == 0 {
            return Err("The training range is empty; use a larger dataset or proportion.".into());
        }

        let mut tree = DynamicTreeClassifier::with_params(
            Some(self.params.height()),
            Some(self.params.min_split_points()),
            Some(self.params.beta()),
        )?;
        tree.fit(points.slice(0, train_len))?;

        let expected: Vec<bool> = (train_len..points.n_points())
            .map(|index| points.label(index))
            .collect();
        let mut actual = Vec::with_capacity(expected.len());

        if self.streaming {
            for (step, index) in (train_len..points.n_points()).enumerate() {
                let features = points.point(index);
                actual.push(tree.decide(&features)?);
                tree.insert(&features, points.label(index))?;
                // retire the oldest remaining point to keep the window size
                tree.delete(&points.point(step), points.label(step))?;
            }
        } else {
            for index in train_len..points.n_points() {
                actual.push(tree.decide(&points.point(index))?);
            }
        }

        let f1 = self.f1_score(&expected, &actual)?;
        Ok((f1, tree))
    }
}
