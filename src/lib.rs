//! # Dyntree
//!
//! `dyntree` trains binary decision tree classifiers over mixed boolean, categorical
//! and real features, using Gini impurity to pick splits. Trees stay maintainable
//! after fitting: labeled points can be inserted and deleted, and each affected
//! subtree rebuilds itself once its pending-modification budget runs out.
//!
//! ## Getting Started
//!
//! To use `dyntree`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! dyntree = "*"
//! ```
//!
//! ## Example Usage
//!
//! As a quick example, here's how you can fit a tree on a small boolean dataset and
//! keep it current while points come and go:
//!
//! ```rust
//! use dyntree::data::point_set::{FeatureKind, PointSet};
//! use dyntree::trees::classifier::DynamicTreeClassifier;
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(4, 1, &[1.0, 1.0, 0.0, 0.0]);
//! let y = DVector::from_vec(vec![true, true, false, false]);
//! let points = PointSet::new(x, y, vec![FeatureKind::Boolean]).unwrap();
//!
//! let mut tree = DynamicTreeClassifier::with_params(Some(1), Some(1), None).unwrap();
//! tree.fit(points).unwrap();
//!
//! let probe = DVector::from_vec(vec![1.0]);
//! assert!(tree.decide(&probe).unwrap());
//!
//! tree.insert(&probe, true).unwrap();
//! tree.delete(&probe, true).unwrap();
//! assert!(tree.decide(&probe).unwrap());
//! ```

/// Dataset loading and point set utilities
pub mod data;
/// Train/held-out evaluation loops
pub mod evaluation;
/// Functions for evaluating model performance
pub mod metrics;
/// Dynamic decision trees
pub mod trees;
