use super::FlattenConfig;
use crate::model::SubModel;
use tch::{nn, Device, Tensor};

/// Base encoder passing observations through, flattened to `[batch, dim]`.
///
/// It has no parameters.
pub struct Flatten {
    device: Device,
}

impl SubModel for Flatten {
    type Config = FlattenConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn build(p: &nn::Path, _config: Self::Config) -> Self {
        Self {
            device: p.device(),
        }
    }

    fn forward(&self, x: &Tensor) -> Tensor {
        x.to(self.device).flatten(1, -1)
    }
}
