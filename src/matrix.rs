//! Dense row-major matrices.
//!
//! `DenseMatrix` is the only numeric container in this crate. Shapes are fixed
//! at construction and every binary operation checks its operands before
//! touching any data: a mismatch returns [`Error::DimensionMismatch`] and
//! leaves both operands untouched. There is no implicit broadcasting or
//! reshaping; the one deliberate broadcast is [`DenseMatrix::outer`].
//!
//! Non-`_assign` operations allocate and return a new matrix. `_assign`
//! variants mutate the receiver only; the argument is never written to.

use crate::{Error, Result};

use rand::Rng;
use rand_distr::StandardNormal;

/// A fixed-shape 2-D matrix of `f64`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// A `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// A column vector (`values.len() x 1`) holding `values`.
    pub fn column(values: &[f64]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    /// Build a matrix from a row-major flat buffer.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::DimensionMismatch(format!(
                "flat buffer has {} entries, expected {rows}x{cols} = {}",
                data.len(),
                rows * cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at row `i`, column `j`.
    ///
    /// Panics if the indices are out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index ({i},{j}) out of bounds");
        self.data[i * self.cols + j]
    }

    /// Overwrite the entry at row `i`, column `j`.
    ///
    /// Panics if the indices are out of bounds.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "index ({i},{j}) out of bounds");
        self.data[i * self.cols + j] = value;
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn check_same_shape(&self, rhs: &Self, op: &str) -> Result<()> {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(Error::DimensionMismatch(format!(
                "{op}: lhs is {}x{}, rhs is {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }
        Ok(())
    }

    /// Elementwise sum. Shapes must match exactly.
    pub fn add(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs, "add")?;
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Elementwise sum into `self`. Shapes must match exactly.
    pub fn add_assign(&mut self, rhs: &Self) -> Result<()> {
        self.check_same_shape(rhs, "add_assign")?;
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += b;
        }
        Ok(())
    }

    /// Elementwise difference. Shapes must match exactly.
    pub fn sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs, "sub")?;
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Elementwise difference into `self`. Shapes must match exactly.
    pub fn sub_assign(&mut self, rhs: &Self) -> Result<()> {
        self.check_same_shape(rhs, "sub_assign")?;
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a -= b;
        }
        Ok(())
    }

    /// Multiply every entry by `k`.
    pub fn scale(&self, k: f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|a| k * a).collect(),
        }
    }

    /// Multiply every entry of `self` by `k`.
    pub fn scale_assign(&mut self, k: f64) {
        for a in &mut self.data {
            *a *= k;
        }
    }

    /// Elementwise (Hadamard) product. Shapes must match exactly.
    pub fn hadamard(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs, "hadamard")?;
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a * b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Elementwise (Hadamard) product into `self`. Shapes must match exactly.
    pub fn hadamard_assign(&mut self, rhs: &Self) -> Result<()> {
        self.check_same_shape(rhs, "hadamard_assign")?;
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a *= b;
        }
        Ok(())
    }

    /// Matrix product `self * rhs`. Requires `self.cols == rhs.rows`.
    ///
    /// Plain triple-loop accumulation; no blocking or compensated summation.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch(format!(
                "matmul: lhs is {}x{}, rhs is {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }
        let (n, m, q) = (self.rows, self.cols, rhs.cols);
        let mut result = Self::zeros(n, q);
        for i in 0..n {
            for j in 0..q {
                let mut acc = 0.0;
                for k in 0..m {
                    acc += self.data[i * m + k] * rhs.data[k * q + j];
                }
                result.data[i * q + j] = acc;
            }
        }
        Ok(result)
    }

    /// The transposed matrix (`cols x rows`).
    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros(self.cols, self.rows);
        for i in 0..result.rows {
            for j in 0..result.cols {
                result.data[i * result.cols + j] = self.data[j * self.cols + i];
            }
        }
        result
    }

    /// Fused affine map `self * x + b` without materializing `self * x`.
    ///
    /// `x` and `b` must be column vectors with `self.cols == x.rows` and
    /// `self.rows == b.rows`. This is the forward-pass primitive.
    pub fn affine(&self, x: &Self, b: &Self) -> Result<Self> {
        if self.cols != x.rows || self.rows != b.rows || x.cols != 1 || b.cols != 1 {
            return Err(Error::DimensionMismatch(format!(
                "affine: A is {}x{}, x is {}x{}, b is {}x{}",
                self.rows, self.cols, x.rows, x.cols, b.rows, b.cols
            )));
        }
        let (n, m) = (self.rows, self.cols);
        let mut result = Self::zeros(n, 1);
        for i in 0..n {
            let mut acc = b.data[i];
            for k in 0..m {
                acc += self.data[i * m + k] * x.data[k];
            }
            result.data[i] = acc;
        }
        Ok(result)
    }

    /// Outer product of two column vectors: `result[i][j] = self[i] * v[j]`,
    /// shape `self.rows x v.rows`.
    ///
    /// Used to form a weight gradient from an error vector and an activation
    /// vector.
    pub fn outer(&self, v: &Self) -> Result<Self> {
        if self.cols != 1 || v.cols != 1 {
            return Err(Error::DimensionMismatch(format!(
                "outer: operands must be column vectors, got {}x{} and {}x{}",
                self.rows, self.cols, v.rows, v.cols
            )));
        }
        let mut result = Self::zeros(self.rows, v.rows);
        for i in 0..result.rows {
            for j in 0..result.cols {
                result.data[i * result.cols + j] = self.data[i] * v.data[j];
            }
        }
        Ok(result)
    }

    /// Apply `f` to every entry, returning a new matrix.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&a| f(a)).collect(),
        }
    }

    /// Apply `f` to every entry of `self` in place.
    pub fn map_assign<F: Fn(f64) -> f64>(&mut self, f: F) {
        for a in &mut self.data {
            *a = f(*a);
        }
    }

    /// Fill every entry with a standard-normal sample from `rng`.
    ///
    /// The RNG is always supplied by the caller so that runs are reproducible
    /// given a seed.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for a in &mut self.data {
            *a = rng.sample(StandardNormal);
        }
    }
}
