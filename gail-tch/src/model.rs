//! Interfaces of neural network modules.
use tch::nn;

/// Neural network module built on a path of a shared [`VarStore`].
///
/// The discriminator owns a single [`VarStore`] partitioned by paths; each
/// module creates its variables under the path it is given.
///
/// [`VarStore`]: https://docs.rs/tch/0.16.0/tch/nn/struct.VarStore.html
pub trait SubModel {
    /// Configuration from which [`SubModel`] is constructed.
    type Config;

    /// Input of the [`SubModel`].
    type Input;

    /// Output of the [`SubModel`].
    type Output;

    /// Builds [`SubModel`] under `path` with [`SubModel::Config`].
    fn build(path: &nn::Path, config: Self::Config) -> Self;

    /// A generalized forward function.
    fn forward(&self, input: &Self::Input) -> Self::Output;
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;
}
