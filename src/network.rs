//! The feedforward network: construction, inference, and backpropagation.
//!
//! A `Network` is described by its layer sizes. For sizes `[2, 3, 1]` the
//! network has an input layer of 2 neurons, one hidden layer of 3, and an
//! output layer of 1. Layer 0 is input-only: it has no weights into it and no
//! biases, so a network with `sizes.len() == n` owns `n - 1` weight matrices
//! and `n - 1` bias vectors.
//!
//! Every nonlinearity is the logistic sigmoid, and the cost whose gradient
//! [`Network::backprop`] computes is the per-example squared error
//! `0.5 * |a - y|^2` (its derivative with respect to the output activation is
//! `a - y`).

use crate::matrix::DenseMatrix;
use crate::{Error, Result};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A fully-connected sigmoid network.
#[derive(Debug, Clone)]
pub struct Network {
    sizes: Vec<usize>,
    /// `weights[i]` has shape `sizes[i+1] x sizes[i]`.
    weights: Vec<DenseMatrix>,
    /// `biases[i]` has shape `sizes[i+1] x 1`.
    biases: Vec<DenseMatrix>,
}

/// Per-layer parameter gradients, in layer order.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub d_weights: Vec<DenseMatrix>,
    pub d_biases: Vec<DenseMatrix>,
}

impl Gradients {
    /// Fold another example's gradients into this accumulator elementwise.
    pub fn accumulate(&mut self, other: &Gradients) -> Result<()> {
        if self.d_weights.len() != other.d_weights.len()
            || self.d_biases.len() != other.d_biases.len()
        {
            return Err(Error::DimensionMismatch(format!(
                "gradient layer counts differ: {} vs {}",
                self.d_weights.len(),
                other.d_weights.len()
            )));
        }
        for (acc, g) in self.d_weights.iter_mut().zip(&other.d_weights) {
            acc.add_assign(g)?;
        }
        for (acc, g) in self.d_biases.iter_mut().zip(&other.d_biases) {
            acc.add_assign(g)?;
        }
        Ok(())
    }
}

impl Network {
    /// Build a network with the given layer sizes, initializing every weight
    /// and bias from a standard normal using a deterministic seed.
    pub fn new_with_seed(sizes: &[usize], seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(sizes, &mut rng)
    }

    /// Build a network with the given layer sizes, sampling initial weights
    /// and biases from the provided RNG.
    ///
    /// Sampling order is fixed (all weight matrices in layer order, then all
    /// bias vectors), so the same RNG state always yields the same network.
    pub fn new_with_rng<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(Error::InvalidConfig(
                "sizes must include input and output dims".to_owned(),
            ));
        }
        if sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "all layer sizes must be > 0".to_owned(),
            ));
        }

        let num_param_layers = sizes.len() - 1;
        let mut weights = Vec::with_capacity(num_param_layers);
        for i in 0..num_param_layers {
            let mut w = DenseMatrix::zeros(sizes[i + 1], sizes[i]);
            w.randomize(rng);
            weights.push(w);
        }
        let mut biases = Vec::with_capacity(num_param_layers);
        for i in 0..num_param_layers {
            let mut b = DenseMatrix::zeros(sizes[i + 1], 1);
            b.randomize(rng);
            biases.push(b);
        }

        Ok(Self {
            sizes: sizes.to_vec(),
            weights,
            biases,
        })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.sizes[0]
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        *self.sizes.last().expect("sizes has at least two entries")
    }

    /// Number of layers, counting the input layer.
    #[inline]
    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    /// Number of layers carrying parameters (`num_layers() - 1`).
    #[inline]
    fn num_param_layers(&self) -> usize {
        self.sizes.len() - 1
    }

    /// Forward inference: repeatedly apply `sigmoid(W a + b)` and return the
    /// final activation vector.
    pub fn feed_forward(&self, input: &DenseMatrix) -> Result<DenseMatrix> {
        let mut activation = self.weights[0].affine(input, &self.biases[0])?;
        activation.map_assign(sigmoid);
        for i in 1..self.num_param_layers() {
            activation = self.weights[i].affine(&activation, &self.biases[i])?;
            activation.map_assign(sigmoid);
        }
        Ok(activation)
    }

    /// Gradients of the squared-error cost for a single `(input, target)`
    /// example, by backpropagation.
    ///
    /// Returned matrices have the same shapes as the corresponding weights and
    /// biases, in layer order.
    pub fn backprop(&self, input: &DenseMatrix, target: &DenseMatrix) -> Result<Gradients> {
        let num_param_layers = self.num_param_layers();

        // Forward pass, caching every pre-activation z and activation.
        let mut activations: Vec<DenseMatrix> = Vec::with_capacity(self.sizes.len());
        activations.push(input.clone());
        let mut zs: Vec<DenseMatrix> = Vec::with_capacity(num_param_layers);
        for i in 0..num_param_layers {
            let z = self.weights[i].affine(&activations[i], &self.biases[i])?;
            activations.push(z.map(sigmoid));
            zs.push(z);
        }

        let mut d_weights: Vec<DenseMatrix> = Vec::with_capacity(num_param_layers);
        let mut d_biases: Vec<DenseMatrix> = Vec::with_capacity(num_param_layers);

        // Output layer: delta = (a_L - y) .* sigma'(z_{L-1}).
        let mut delta = activations[num_param_layers].sub(target)?;
        delta.hadamard_assign(&zs[num_param_layers - 1].map(sigmoid_prime))?;
        d_weights.push(delta.outer(&activations[num_param_layers - 1])?);
        d_biases.push(delta.clone());

        // Reverse sweep: each layer's error is the next layer's error pushed
        // back through the transposed weight matrix.
        for l in (0..num_param_layers - 1).rev() {
            delta = self.weights[l + 1].transpose().matmul(&delta)?;
            delta.hadamard_assign(&zs[l].map(sigmoid_prime))?;
            d_weights.push(delta.outer(&activations[l])?);
            d_biases.push(delta.clone());
        }

        d_weights.reverse();
        d_biases.reverse();
        Ok(Gradients {
            d_weights,
            d_biases,
        })
    }

    /// Scale accumulated mini-batch gradients by `factor` and subtract them
    /// from the parameters in place.
    pub(crate) fn apply_update(&mut self, mut grads: Gradients, factor: f64) -> Result<()> {
        for (w, g) in self.weights.iter_mut().zip(&mut grads.d_weights) {
            g.scale_assign(factor);
            w.sub_assign(g)?;
        }
        for (b, g) in self.biases.iter_mut().zip(&mut grads.d_biases) {
            g.scale_assign(factor);
            b.sub_assign(g)?;
        }
        Ok(())
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[inline]
fn sigmoid_prime(z: f64) -> f64 {
    sigmoid(z) * (1.0 - sigmoid(z))
}
