//! GAIL reward learning implemented with [tch](https://crates.io/crates/tch).
//!
//! The main entry point is [`gail::GailDiscrim`], which trains a
//! discriminator separating expert transitions from agent transitions and
//! turns its output into a reward for an external policy optimizer.
pub mod gail;
pub mod mlp;
pub mod model;
pub mod opt;
pub mod util;
mod batch;
mod checkpoint;
mod dataset;
mod obs_filter;
mod policy;
mod storage;
pub use batch::TransitionBatch;
pub use checkpoint::DirCheckpointer;
pub use dataset::{ExpertLoader, ExpertStats, TransitionDataset};
pub use obs_filter::{ObsFilter, RunningObsFilter};
pub use policy::{ActionSpace, PolicyInfo};
use serde::{Deserialize, Serialize};
pub use storage::RolloutStorage;

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using tch.
///
/// This enum is added because [`tch::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl From<tch::Device> for Device {
    fn from(device: tch::Device) -> Self {
        match device {
            tch::Device::Cuda(n) => Self::Cuda(n),
            _ => Self::Cpu,
        }
    }
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(n) => tch::Device::Cuda(n),
        }
    }
}
