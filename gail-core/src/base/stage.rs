//! The two stages of an outer training iteration.
use super::RolloutSource;
use crate::record::Record;
use anyhow::Result;
use std::collections::HashMap;

/// Additional per-step inputs passed along with a transition.
///
/// Environments attach values like raw observations here.
#[derive(Debug)]
pub struct AuxInputs<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for AuxInputs<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> AuxInputs<T> {
    /// Creates an empty set of inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an input, returning the modified set.
    pub fn with(mut self, key: impl Into<String>, value: T) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    /// Gets the input stored under `key`.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Returns `true` if no input is given.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A learned reward function queried by the policy updater.
pub trait RewardModel {
    /// Tensor type of the backend.
    type Tensor;

    /// Computes rewards of a batch of transitions.
    ///
    /// `done_mask` is 0 where an episode ended and 1 otherwise.
    /// Returns the rewards and a record of auxiliary information.
    fn get_reward(
        &mut self,
        state: &Self::Tensor,
        next_state: &Self::Tensor,
        action: &Self::Tensor,
        done_mask: &Self::Tensor,
        aux: &AuxInputs<Self::Tensor>,
    ) -> Result<(Self::Tensor, Record)>;
}

/// The stage updating the reward function from agent experience.
pub trait RewardUpdater<R: RolloutSource> {
    /// Performs the update and returns the averaged losses.
    fn update_reward_function(&mut self, buffer: &mut R) -> Result<Record>;
}

/// An external policy optimizer trained on the learned reward.
pub trait PolicyUpdater<R, M> {
    /// Updates the policy with experience in `buffer`.
    ///
    /// Rewards of the transitions are computed with `reward_model`.
    fn update(&mut self, buffer: &mut R, reward_model: &mut M) -> Result<Record>;
}
