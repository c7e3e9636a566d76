//! Gini impurity and split search over a point set.

use crate::data::point_set::{FeatureKind, PointSet, RealNumber};
use nalgebra::DVector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// A split predicate over one feature column. Each variant carries the
/// data its kind needs: real splits a threshold, categorical splits the
/// chosen class value together with the other class values observed when
/// the split was selected.
#[derive(Debug, Clone, PartialEq)]
pub enum Split<T: RealNumber> {
    Boolean {
        feature: usize,
    },
    Categorical {
        feature: usize,
        value: T,
        rest: Vec<T>,
    },
    Real {
        feature: usize,
        threshold: T,
    },
}

impl<T: RealNumber> Split<T> {
    pub fn feature(&self) -> usize {
        match self {
            Split::Boolean { feature } => *feature,
            Split::Categorical { feature, .. } => *feature,
            Split::Real { feature, .. } => *feature,
        }
    }

    /// Whether a feature value satisfies the split predicate.
    pub fn admits(&self, value: T) -> bool {
        match self {
            Split::Boolean { .. } => value != T::zero(),
            Split::Categorical { value: class, .. } => value == *class,
            Split::Real { threshold, .. } => value < *threshold,
        }
    }

    /// Whether a point belongs on the left, predicate-satisfying side.
    pub fn goes_left(&self, features: &DVector<T>) -> bool {
        self.admits(features[self.feature()])
    }

    /// Partitions a point set into the (predicate-true, predicate-false)
    /// halves.
    pub fn partition(&self, points: &PointSet<T>) -> (PointSet<T>, PointSet<T>) {
        let feature = self.feature();
        let mut left_rows = Vec::new();
        let mut left_labels = Vec::new();
        let mut right_rows = Vec::new();
        let mut right_labels = Vec::new();

        for (index, row) in points.x.row_iter().enumerate() {
            if self.admits(row[feature]) {
                left_rows.push(row.clone_owned());
                left_labels.push(points.y[index]);
            } else {
                right_rows.push(row.clone_owned());
                right_labels.push(points.y[index]);
            }
        }

        (
            PointSet::from_rows(left_rows, left_labels, points.kinds.clone()),
            PointSet::from_rows(right_rows, right_labels, points.kinds.clone()),
        )
    }
}

impl<T: RealNumber> Display for Split<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Split::Boolean { feature } => write!(f, "x{} is true", feature),
            Split::Categorical {
                feature,
                value,
                rest,
            } => {
                write!(f, "x{} == {} (other classes: ", feature, value)?;
                for (index, other) in rest.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", other)?;
                }
                write!(f, ")")
            }
            Split::Real { feature, threshold } => write!(f, "x{} < {}", feature, threshold),
        }
    }
}

/// The outcome of a split search: the winning split, its Gini gain and the
/// two partitions it induces.
pub struct SplitData<T: RealNumber> {
    pub split: Split<T>,
    pub gain: f64,
    pub left: PointSet<T>,
    pub right: PointSet<T>,
}

/// Gini impurity of a point set: `1 - p_true^2 - p_false^2`.
///
/// # Errors
///
/// Fails on an empty point set, where the impurity is undefined.
pub fn gini<T: RealNumber>(points: &PointSet<T>) -> Result<f64, Box<dyn Error>> {
    if !points.is_not_empty() {
        return Err("Cannot compute the Gini impurity of an empty point set.".into());
    }
    Ok(gini_of(points.true_count(), points.n_points()))
}

fn gini_of(true_count: usize, total: usize) -> f64 {
    let p_true = true_count as f64 / total as f64;
    let p_false = (total - true_count) as f64 / total as f64;
    1.0 - p_true * p_true - p_false * p_false
}

/// Size-weighted Gini impurity of the partition a split induces, or `None`
/// when the split is unusable because either side would be empty or hold
/// fewer than `min_split_points` points.
pub fn split_gini<T: RealNumber>(
    points: &PointSet<T>,
    split: &Split<T>,
    min_split_points: usize,
) -> Option<f64> {
    let feature = split.feature();
    let mut left_true = 0;
    let mut left_false = 0;
    let mut right_true = 0;
    let mut right_false = 0;

    for (index, row) in points.x.row_iter().enumerate() {
        match (split.admits(row[feature]), points.y[index]) {
            (true, true) => left_true += 1,
            (true, false) => left_false += 1,
            (false, true) => right_true += 1,
            (false, false) => right_false += 1,
        }
    }

    let left = left_true + left_false;
    let right = right_true + right_false;
    if left == 0 || right == 0 || left < min_split_points || right < min_split_points {
        return None;
    }

    let total = (left + right) as f64;
    Some((left as f64 * gini_of(left_true, left) + right as f64 * gini_of(right_true, right)) / total)
}

/// Enumerates the candidate splits of one feature column, in the order the
/// search scans them: a single candidate for a boolean column, the
/// midpoints between consecutive distinct sorted values for a real column,
/// and every distinct observed value ascending for a categorical column.
pub fn candidates<T: RealNumber>(points: &PointSet<T>, feature: usize) -> Vec<Split<T>> {
    match points.kinds[feature] {
        FeatureKind::Boolean => vec![Split::Boolean { feature }],
        FeatureKind::Real => {
            let two = T::from_f64(2.0).unwrap();
            distinct_sorted(points, feature)
                .windows(2)
                .map(|pair| Split::Real {
                    feature,
                    threshold: (pair[0] + pair[1]) / two,
                })
                .collect()
        }
        FeatureKind::Categorical => {
            let values = distinct_sorted(points, feature);
            values
                .iter()
                .map(|&value| Split::Categorical {
                    feature,
                    value,
                    rest: values.iter().cloned().filter(|&other| other != value).collect(),
                })
                .collect()
        }
    }
}

fn distinct_sorted<T: RealNumber>(points: &PointSet<T>, feature: usize) -> Vec<T> {
    let mut values: Vec<T> = points.x.column(feature).iter().cloned().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values.dedup();
    values
}

/// Searches every feature column for the split with the best Gini gain.
///
/// Columns are scanned in parallel but reduced in ascending feature order
/// with strictly-greater comparisons, so ties always resolve to the
/// earliest enumerated candidate. Returns `None` when no candidate
/// achieves a strictly positive gain under the size constraint.
pub fn best_split<T: RealNumber>(
    points: &PointSet<T>,
    min_split_points: usize,
) -> Option<SplitData<T>> {
    if !points.is_not_empty() {
        return None;
    }
    let parent = gini_of(points.true_count(), points.n_points());

    let feature_bests: Vec<Option<(Split<T>, f64)>> = (0..points.n_features())
        .into_par_iter()
        .map(|feature| {
            let mut best = None;
            let mut best_gain = 0.0;
            for split in candidates(points, feature) {
                if let Some(weighted) = split_gini(points, &split, min_split_points) {
                    let gain = parent - weighted;
                    if gain > best_gain {
                        best_gain = gain;
                        best = Some((split, gain));
                    }
                }
            }
            best
        })
        .collect();

    let mut winner: Option<(Split<T>, f64)> = None;
    for candidate in feature_bests.into_iter().flatten() {
        match &winner {
            Some((_, best_gain)) if candidate.1 <= *best_gain => {}
            _ => winner = Some(candidate),
        }
    }

    let (split, gain) = winner?;
    let (left, right) = split.partition(points);
    Some(SplitData {
        split,
        gain,
        left,
        right,
    })
}
