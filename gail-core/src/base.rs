//! Collaborator traits of the reward-learning loop.
mod checkpoint;
mod env_settings;
mod sampler;
mod stage;
pub use checkpoint::{Checkpointer, MemoryCheckpointer, Persistent};
pub use env_settings::{EnvSettings, Frame, ModifyEnvSettings, RenderHook, RenderStep};
pub use sampler::{ExpertSampler, RolloutSource};
pub use stage::{AuxInputs, PolicyUpdater, RewardModel, RewardUpdater};
