//! Utilities.
mod named_tensors;
use anyhow::Result;
pub use named_tensors::NamedTensors;
use std::convert::TryFrom;
use tch::Tensor;

/// Converts a tensor with a single element to `f32`.
pub fn scalar(t: &Tensor) -> Result<f32> {
    Ok(t.f_double_value(&[])? as f32)
}

/// Converts a tensor to a flat vector of `f32`.
pub fn to_vec_f32(t: &Tensor) -> Result<Vec<f32>> {
    let t = t
        .detach()
        .to(tch::Device::Cpu)
        .to_kind(tch::Kind::Float)
        .flatten(0, -1);
    Ok(Vec::<f32>::try_from(&t)?)
}
