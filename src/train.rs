//! Mini-batch stochastic gradient descent.

use crate::data::Dataset;
use crate::network::{Gradients, Network};
use crate::sweep::Sweeper;
use crate::{Error, Result};

use log::info;

/// Hyperparameters for [`Network::sgd`].
#[derive(Debug, Clone, Copy)]
pub struct SgdConfig {
    pub epochs: usize,
    /// Nominal mini-batch size. Each epoch processes `floor(N / batch_size)`
    /// batches; a trailing remainder is skipped for that epoch.
    pub batch_size: usize,
    /// Learning rate (eta).
    pub lr: f64,
    /// Seed for the per-epoch shuffle.
    pub shuffle_seed: u64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            batch_size: 10,
            lr: 3.0,
            shuffle_seed: 1,
        }
    }
}

impl Network {
    /// Train with mini-batch SGD.
    ///
    /// Each epoch reshuffles the example order and walks it in windows of
    /// `batch_size`, averaging per-example backprop gradients into one
    /// parameter update per window. When the dataset size is not a multiple of
    /// `batch_size`, the trailing remainder is dropped for that epoch; this
    /// floor-division policy is intentional.
    pub fn sgd<D: Dataset + ?Sized>(&mut self, train: &D, cfg: SgdConfig) -> Result<()> {
        if cfg.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if cfg.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if !(cfg.lr.is_finite() && cfg.lr > 0.0) {
            return Err(Error::InvalidConfig("lr must be finite and > 0".to_owned()));
        }
        let n = train.count();
        if n == 0 {
            return Err(Error::InvalidData(
                "train dataset must not be empty".to_owned(),
            ));
        }
        let (sample_input, sample_target) = train.sample(0);
        if sample_input.rows() != self.input_dim() {
            return Err(Error::InvalidData(format!(
                "train input dim {} does not match network input dim {}",
                sample_input.rows(),
                self.input_dim()
            )));
        }
        if sample_target.rows() != self.output_dim() {
            return Err(Error::InvalidData(format!(
                "train target dim {} does not match network output dim {}",
                sample_target.rows(),
                self.output_dim()
            )));
        }

        let mut sweeper = Sweeper::new(train, cfg.shuffle_seed);
        for epoch in 1..=cfg.epochs {
            sweeper.shuffle();
            let mut k = 0;
            while k + cfg.batch_size <= n {
                sweeper.set_bounds(k, k + cfg.batch_size);
                self.update_mini_batch(&mut sweeper, cfg.batch_size, cfg.lr)?;
                k += cfg.batch_size;
            }
            info!("epoch {epoch}/{} complete", cfg.epochs);
        }
        Ok(())
    }

    /// Drain the sweeper's current window, sum per-example gradients, and
    /// apply the averaged update.
    ///
    /// The accumulator starts as `None` and is seeded from the first example's
    /// gradients, so an empty window leaves the parameters untouched.
    fn update_mini_batch<D: Dataset + ?Sized>(
        &mut self,
        sweeper: &mut Sweeper<'_, D>,
        batch_size: usize,
        lr: f64,
    ) -> Result<()> {
        let mut acc: Option<Gradients> = None;
        while let Some((input, target)) = sweeper.next() {
            let grads = self.backprop(input, target)?;
            match acc.as_mut() {
                None => acc = Some(grads),
                Some(total) => total.accumulate(&grads)?,
            }
        }

        if let Some(total) = acc {
            self.apply_update(total, lr / batch_size as f64)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Set;
    use crate::matrix::DenseMatrix;

    fn single_example_set() -> Set {
        Set::from_pairs(vec![(
            DenseMatrix::column(&[1.0, 0.0]),
            DenseMatrix::column(&[1.0]),
        )])
        .unwrap()
    }

    #[test]
    fn config_validation() {
        let set = single_example_set();

        let mut net = Network::new_with_seed(&[2, 2, 1], 0).unwrap();
        let bad_epochs = SgdConfig {
            epochs: 0,
            ..SgdConfig::default()
        };
        assert!(matches!(
            net.sgd(&set, bad_epochs),
            Err(Error::InvalidConfig(_))
        ));

        let bad_batch = SgdConfig {
            batch_size: 0,
            ..SgdConfig::default()
        };
        assert!(matches!(
            net.sgd(&set, bad_batch),
            Err(Error::InvalidConfig(_))
        ));

        let bad_lr = SgdConfig {
            lr: f64::NAN,
            ..SgdConfig::default()
        };
        assert!(matches!(net.sgd(&set, bad_lr), Err(Error::InvalidConfig(_))));

        let mut wrong_dims = Network::new_with_seed(&[3, 2, 1], 0).unwrap();
        assert!(matches!(
            wrong_dims.sgd(&set, SgdConfig::default()),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn one_step_moves_output_toward_target() {
        let set = single_example_set();
        let (input, _) = set.sample(0);

        let mut net = Network::new_with_seed(&[2, 2, 1], 7).unwrap();
        let before = net.feed_forward(input).unwrap().get(0, 0);

        let cfg = SgdConfig {
            epochs: 1,
            batch_size: 1,
            lr: 1.0,
            shuffle_seed: 1,
        };
        net.sgd(&set, cfg).unwrap();

        let after = net.feed_forward(input).unwrap().get(0, 0);
        assert!(
            (1.0 - after).abs() < (1.0 - before).abs(),
            "output did not move toward target: before={before} after={after}"
        );
    }

    #[test]
    fn trailing_remainder_is_dropped() {
        // 5 examples, batch size 3: only one batch runs per epoch, so exactly
        // 3 examples contribute. With batch size 6 no batch fits at all and
        // the parameters must not move.
        let pairs = (0..5)
            .map(|i| {
                (
                    DenseMatrix::column(&[i as f64 / 5.0, 0.5]),
                    DenseMatrix::column(&[1.0]),
                )
            })
            .collect();
        let set = Set::from_pairs(pairs).unwrap();

        let mut net = Network::new_with_seed(&[2, 2, 1], 3).unwrap();
        let probe = DenseMatrix::column(&[0.2, 0.5]);
        let before = net.feed_forward(&probe).unwrap();

        let cfg = SgdConfig {
            epochs: 2,
            batch_size: 6,
            lr: 1.0,
            shuffle_seed: 1,
        };
        net.sgd(&set, cfg).unwrap();
        let after = net.feed_forward(&probe).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn same_seeds_reproduce_the_same_trajectory() {
        let pairs = (0..8)
            .map(|i| {
                (
                    DenseMatrix::column(&[i as f64 / 8.0, 1.0 - i as f64 / 8.0]),
                    DenseMatrix::column(&[if i % 2 == 0 { 1.0 } else { 0.0 }]),
                )
            })
            .collect();
        let set = Set::from_pairs(pairs).unwrap();

        let cfg = SgdConfig {
            epochs: 3,
            batch_size: 4,
            lr: 0.5,
            shuffle_seed: 9,
        };

        let mut a = Network::new_with_seed(&[2, 3, 1], 5).unwrap();
        a.sgd(&set, cfg).unwrap();
        let mut b = Network::new_with_seed(&[2, 3, 1], 5).unwrap();
        b.sgd(&set, cfg).unwrap();

        let probe = DenseMatrix::column(&[0.4, 0.6]);
        assert_eq!(
            a.feed_forward(&probe).unwrap(),
            b.feed_forward(&probe).unwrap()
        );
    }
}
