//! Running mean and variance of a stream of vectors.
//!
//! Batches are folded in with the parallel-variance formula of Chan et al.,
//! so the statistics after many small updates equal those of a single pass
//! over the concatenated data (up to rounding).
use crate::error::GailError;
use serde::{Deserialize, Serialize};

/// Initial pseudo-count, making the first update well defined.
const INIT_COUNT: f64 = 1e-4;

/// Running mean and variance per dimension.
///
/// `count` never decreases and `var` is never negative.
/// A scalar stream is tracked with `dim == 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningMeanStd {
    mean: Vec<f64>,
    var: Vec<f64>,
    count: f64,
}

impl RunningMeanStd {
    /// Statistics with zero history: mean 0, variance 1.
    pub fn new(dim: usize) -> Self {
        Self {
            mean: vec![0.0; dim],
            var: vec![1.0; dim],
            count: INIT_COUNT,
        }
    }

    /// The dimension of the tracked vectors.
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Running mean.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Running (population) variance.
    pub fn var(&self) -> &[f64] {
        &self.var
    }

    /// The number of samples seen, including the initial pseudo-count.
    pub fn count(&self) -> f64 {
        self.count
    }

    /// Updates the statistics with a batch of samples laid out row by row.
    ///
    /// `batch.len()` must be a multiple of [`RunningMeanStd::dim`]. An empty batch is a no-op.
    pub fn update(&mut self, batch: &[f32]) -> Result<(), GailError> {
        let dim = self.dim();
        if dim == 0 || batch.len() % dim != 0 {
            return Err(GailError::DimensionMismatch {
                expected: dim,
                actual: batch.len(),
            });
        }
        let n = batch.len() / dim;
        if n == 0 {
            return Ok(());
        }

        let mut batch_mean = vec![0f64; dim];
        for row in batch.chunks_exact(dim) {
            for (m, &x) in batch_mean.iter_mut().zip(row) {
                *m += x as f64;
            }
        }
        batch_mean.iter_mut().for_each(|m| *m /= n as f64);

        let mut batch_var = vec![0f64; dim];
        for row in batch.chunks_exact(dim) {
            for ((v, &x), m) in batch_var.iter_mut().zip(row).zip(&batch_mean) {
                let d = x as f64 - m;
                *v += d * d;
            }
        }
        batch_var.iter_mut().for_each(|v| *v /= n as f64);

        self.update_from_moments(&batch_mean, &batch_var, n as f64);
        Ok(())
    }

    fn update_from_moments(&mut self, batch_mean: &[f64], batch_var: &[f64], batch_count: f64) {
        let tot_count = self.count + batch_count;

        for i in 0..self.dim() {
            let delta = batch_mean[i] - self.mean[i];
            let m_a = self.var[i] * self.count;
            let m_b = batch_var[i] * batch_count;
            let m2 = m_a + m_b + delta * delta * self.count * batch_count / tot_count;

            self.mean[i] += delta * batch_count / tot_count;
            self.var[i] = (m2 / tot_count).max(0.0);
        }

        self.count = tot_count;
    }
}
