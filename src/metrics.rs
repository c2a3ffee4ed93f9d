//! Arg-max scoring of one-hot classification outputs.

use crate::data::Dataset;
use crate::matrix::DenseMatrix;
use crate::network::Network;
use crate::Result;

/// Index of the largest entry of a column vector.
///
/// Ties go to the first occurrence: a later index replaces an earlier one only
/// on a strictly greater value.
pub fn argmax(v: &DenseMatrix) -> usize {
    let mut best_idx = 0;
    let mut best_val = v.get(0, 0);
    for i in 1..v.rows() {
        let val = v.get(i, 0);
        if val > best_val {
            best_idx = i;
            best_val = val;
        }
    }
    best_idx
}

/// True when the prediction's arg-max agrees with the target's.
#[inline]
pub fn is_correct(output: &DenseMatrix, target: &DenseMatrix) -> bool {
    argmax(output) == argmax(target)
}

impl Network {
    /// Number of test examples whose predicted class (arg-max of the output
    /// vector) matches the target's class.
    pub fn evaluate<D: Dataset + ?Sized>(&self, test: &D) -> Result<usize> {
        let mut num_correct = 0;
        for idx in 0..test.count() {
            let (input, target) = test.sample(idx);
            let output = self.feed_forward(input)?;
            if is_correct(&output, target) {
                num_correct += 1;
            }
        }
        Ok(num_correct)
    }
}
