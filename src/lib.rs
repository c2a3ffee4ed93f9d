//! A from-scratch MLP digit classifier trained with mini-batch SGD.
//!
//! `sgdnet` implements the classic fully-connected sigmoid network on top of a
//! small strict-shape dense-matrix library, with nothing hidden behind an
//! autodiff framework: forward inference, backpropagation, and the mini-batch
//! update are all spelled out.
//!
//! # Design goals
//!
//! - Clear contracts: shapes are explicit and a mismatch in any matrix
//!   operation is an [`Error::DimensionMismatch`], never a silent broadcast.
//! - Reproducibility: every random source (weight initialization, per-epoch
//!   shuffling) is an explicitly seeded RNG threaded through the API; the same
//!   seeds reproduce identical weight trajectories and evaluation counts.
//! - Single-threaded simplicity: training is fully sequential, and the
//!   network's parameters are the only long-lived mutable state.
//!
//! # Quick start
//!
//! ```rust
//! use sgdnet::{DenseMatrix, Network, Set, SgdConfig};
//!
//! # fn main() -> sgdnet::Result<()> {
//! let train = Set::from_pairs(vec![
//!     (DenseMatrix::column(&[0.0, 0.0]), DenseMatrix::column(&[1.0, 0.0])),
//!     (DenseMatrix::column(&[1.0, 1.0]), DenseMatrix::column(&[0.0, 1.0])),
//! ])?;
//!
//! let mut net = Network::new_with_seed(&[2, 4, 2], 0)?;
//! net.sgd(
//!     &train,
//!     SgdConfig {
//!         epochs: 50,
//!         batch_size: 2,
//!         lr: 1.0,
//!         shuffle_seed: 1,
//!     },
//! )?;
//! let correct = net.evaluate(&train)?;
//! assert!(correct <= train.len());
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod mnist;
pub mod network;
pub mod sweep;
pub mod train;

pub use data::{Dataset, Set};
pub use error::{Error, Result};
pub use matrix::DenseMatrix;
pub use metrics::argmax;
pub use network::{Gradients, Network};
pub use sweep::Sweeper;
pub use train::SgdConfig;
