#![warn(missing_docs)]
//! Core traits and types for generative adversarial imitation learning (GAIL).
//!
//! This crate is independent of the tensor backend. It defines
//!
//! * the collaborators of the reward-learning loop ([`ExpertSampler`],
//!   [`RolloutSource`], [`RewardUpdater`], [`RewardModel`], [`PolicyUpdater`]),
//! * settings requested from the environment ([`EnvSettings`]),
//! * keyed persistence ([`Checkpointer`], [`Persistent`]),
//! * running statistics used for reward normalization ([`RunningMeanStd`]),
//! * and the composition controller [`Gail`].
pub mod error;
pub mod record;

mod base;
pub use base::{
    AuxInputs, Checkpointer, EnvSettings, ExpertSampler, Frame, MemoryCheckpointer,
    ModifyEnvSettings, Persistent, PolicyUpdater, RenderHook, RenderStep, RewardModel,
    RewardUpdater, RolloutSource,
};

mod gail;
pub use gail::Gail;

mod running_stats;
pub use running_stats::RunningMeanStd;
