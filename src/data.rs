//! The dataset contract consumed by training and evaluation.
//!
//! Training never parses files itself; it sees an ordered, indexable sequence
//! of `(input, target)` column-vector pairs behind the [`Dataset`] trait.
//! [`Set`] is the in-memory implementation produced by the MNIST loader and by
//! tests.

use crate::matrix::DenseMatrix;
use crate::{Error, Result};

/// An ordered, 0-indexed collection of `(input, target)` pairs, immutable for
/// the duration of training.
///
/// Targets are one-hot column vectors over the label classes.
pub trait Dataset {
    /// Number of examples available.
    fn count(&self) -> usize;

    /// The `idx`-th example.
    ///
    /// Panics if `idx >= count()`.
    fn sample(&self, idx: usize) -> (&DenseMatrix, &DenseMatrix);
}

/// An owned, in-memory dataset of column-vector pairs.
#[derive(Debug, Clone)]
pub struct Set {
    inputs: Vec<DenseMatrix>,
    targets: Vec<DenseMatrix>,
}

impl Set {
    /// Build a set from `(input, target)` pairs.
    ///
    /// Every input must be a column vector of the same height, and likewise
    /// every target.
    pub fn from_pairs(pairs: Vec<(DenseMatrix, DenseMatrix)>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }

        let input_dim = pairs[0].0.rows();
        let target_dim = pairs[0].1.rows();
        for (i, (input, target)) in pairs.iter().enumerate() {
            if input.cols() != 1 || target.cols() != 1 {
                return Err(Error::InvalidData(format!(
                    "example {i}: inputs and targets must be column vectors"
                )));
            }
            if input.rows() != input_dim {
                return Err(Error::InvalidData(format!(
                    "example {i}: input has {} rows, expected {input_dim}",
                    input.rows()
                )));
            }
            if target.rows() != target_dim {
                return Err(Error::InvalidData(format!(
                    "example {i}: target has {} rows, expected {target_dim}",
                    target.rows()
                )));
            }
        }

        let (inputs, targets) = pairs.into_iter().unzip();
        Ok(Self { inputs, targets })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Per-example input dimension.
    #[inline]
    pub fn input_dim(&self) -> usize {
        self.inputs[0].rows()
    }

    /// Per-example target dimension.
    #[inline]
    pub fn target_dim(&self) -> usize {
        self.targets[0].rows()
    }
}

impl Dataset for Set {
    fn count(&self) -> usize {
        self.inputs.len()
    }

    fn sample(&self, idx: usize) -> (&DenseMatrix, &DenseMatrix) {
        (&self.inputs[idx], &self.targets[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_validates_shapes() {
        let ok = Set::from_pairs(vec![
            (DenseMatrix::column(&[0.0, 1.0]), DenseMatrix::column(&[1.0])),
            (DenseMatrix::column(&[1.0, 0.0]), DenseMatrix::column(&[0.0])),
        ]);
        assert!(ok.is_ok());
        let set = ok.unwrap();
        assert_eq!(set.count(), 2);
        assert_eq!(set.input_dim(), 2);
        assert_eq!(set.target_dim(), 1);

        let ragged = Set::from_pairs(vec![
            (DenseMatrix::column(&[0.0, 1.0]), DenseMatrix::column(&[1.0])),
            (DenseMatrix::column(&[1.0]), DenseMatrix::column(&[0.0])),
        ]);
        assert!(matches!(ragged, Err(Error::InvalidData(_))));

        let not_column = Set::from_pairs(vec![(
            DenseMatrix::zeros(2, 2),
            DenseMatrix::column(&[1.0]),
        )]);
        assert!(matches!(not_column, Err(Error::InvalidData(_))));

        assert!(matches!(
            Set::from_pairs(Vec::new()),
            Err(Error::InvalidData(_))
        ));
    }
}
