use nalgebra::{DMatrix, DVector, RowDVector};
use num_traits::{Float, FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::PartialOrd;
use std::error::Error;
use std::fmt::{Debug, Display};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub trait DataValue:
    Debug
    + Clone
    + Copy
    + Num
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + Display
    + 'static
{
}

impl<T> DataValue for T where
    T: Debug
        + Clone
        + Copy
        + Num
        + FromPrimitive
        + ToPrimitive
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Send
        + Sync
        + Display
        + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

pub trait RealNumber: Number + Float {}
impl<T> RealNumber for T where T: Number + Float {}

/// The kind of a feature column, fixed for the lifetime of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Boolean,
    Categorical,
    Real,
}

/// A set of labeled training points. Each row of `x` is one point, `y`
/// holds the binary labels and `kinds` the per-column feature kinds.
///
/// Point sets are never mutated in place: every addition or removal
/// produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet<T: RealNumber> {
    pub x: DMatrix<T>,
    pub y: DVector<bool>,
    pub kinds: Vec<FeatureKind>,
}

impl<T: RealNumber> PointSet<T> {
    /// Creates a point set, checking that the labels match the number of
    /// points and the kinds match the number of feature columns.
    pub fn new(
        x: DMatrix<T>,
        y: DVector<bool>,
        kinds: Vec<FeatureKind>,
    ) -> Result<Self, Box<dyn Error>> {
        if x.nrows() != y.len() {
            return Err("Features and labels are of different sizes.".into());
        }
        if x.ncols() != kinds.len() {
            return Err("Features and feature kinds are of different sizes.".into());
        }
        Ok(Self { x, y, kinds })
    }

    pub(crate) fn from_rows(
        rows: Vec<RowDVector<T>>,
        labels: Vec<bool>,
        kinds: Vec<FeatureKind>,
    ) -> Self {
        let x = if rows.is_empty() {
            DMatrix::zeros(0, kinds.len())
        } else {
            DMatrix::from_rows(&rows)
        };
        Self {
            x,
            y: DVector::from_vec(labels),
            kinds,
        }
    }

    pub fn n_points(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn is_not_empty(&self) -> bool {
        self.x.nrows() > 0
    }

    /// The feature vector of the point at `index`, as a column vector.
    pub fn point(&self, index: usize) -> DVector<T> {
        self.x.row(index).transpose()
    }

    pub fn label(&self, index: usize) -> bool {
        self.y[index]
    }

    pub fn true_count(&self) -> usize {
        self.y.iter().filter(|&&label| label).count()
    }

    /// Majority label of the set: true when the count of true labels is at
    /// least half the point count, so ties resolve to true.
    pub fn majority(&self) -> bool {
        2 * self.true_count() >= self.n_points()
    }

    /// Returns a new set with `(features, label)` appended.
    pub fn with_point(&self, features: &DVector<T>, label: bool) -> Self {
        let mut rows: Vec<RowDVector<T>> =
            self.x.row_iter().map(|row| row.clone_owned()).collect();
        rows.push(features.transpose());
        let mut labels: Vec<bool> = self.y.iter().cloned().collect();
        labels.push(label);
        Self::from_rows(rows, labels, self.kinds.clone())
    }

    /// Returns a new set with the first point whose feature vector equals
    /// `features` removed, or `None` when no point matches. Labels are not
    /// consulted when matching.
    pub fn without_point(&self, features: &DVector<T>) -> Option<Self> {
        let target = self
            .x
            .row_iter()
            .position(|row| row.iter().zip(features.iter()).all(|(a, b)| a == b))?;

        let rows = self
            .x
            .row_iter()
            .enumerate()
            .filter(|&(index, _)| index != target)
            .map(|(_, row)| row.clone_owned())
            .collect();
        let labels = self
            .y
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != target)
            .map(|(_, &label)| label)
            .collect();
        Some(Self::from_rows(rows, labels, self.kinds.clone()))
    }

    /// The sub-set covering `len` points starting at row `start`.
    pub fn slice(&self, start: usize, len: usize) -> Self {
        Self {
            x: self.x.rows(start, len).clone_owned(),
            y: self.y.rows(start, len).clone_owned(),
            kinds: self.kinds.clone(),
        }
    }

    /// A copy of the set with its rows permuted by a seeded rng.
    pub fn shuffled(&self, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices = (0..self.n_points()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);

        let rows = indices
            .iter()
            .map(|&index| self.x.row(index).clone_owned())
            .collect();
        let labels = indices.iter().map(|&index| self.y[index]).collect();
        Self::from_rows(rows, labels, self.kinds.clone())
    }
}
