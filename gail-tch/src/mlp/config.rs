use crate::model::OutDim;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`](super::Mlp).
pub struct MlpConfig {
    pub(super) in_dim: i64,
    pub(super) units: Vec<i64>,
    pub(super) out_dim: i64,
    pub(super) activation_out: bool,
}

impl MlpConfig {
    /// Creates configuration of MLP.
    ///
    /// * `activation_out` - If `true`, activation function is added in the final layer.
    pub fn new(in_dim: i64, units: Vec<i64>, out_dim: i64, activation_out: bool) -> Self {
        Self {
            in_dim,
            units,
            out_dim,
            activation_out,
        }
    }
}

impl OutDim for MlpConfig {
    fn get_out_dim(&self) -> i64 {
        self.out_dim
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Flatten`](super::Flatten).
pub struct FlattenConfig {
    pub(super) in_shape: Vec<i64>,
}

impl FlattenConfig {
    /// Flattens observations of shape `in_shape`, excluding the batch axis.
    pub fn new(in_shape: &[i64]) -> Self {
        Self {
            in_shape: in_shape.to_vec(),
        }
    }
}

impl OutDim for FlattenConfig {
    fn get_out_dim(&self) -> i64 {
        self.in_shape.iter().product()
    }
}
