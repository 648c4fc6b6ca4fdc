//! Sources of expert and agent transitions.

/// A fixed set of expert demonstrations served in batches.
///
/// Each call to [`ExpertSampler::iter`] starts a new pass over the data,
/// so the sampler can be consumed once per training epoch.
pub trait ExpertSampler {
    /// Batch of expert transitions.
    type Batch;

    /// The number of transitions in a batch.
    fn batch_size(&self) -> usize;

    /// The number of batches in a single pass.
    fn len(&self) -> usize;

    /// Returns `true` if a pass yields no batch.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a new pass over the expert data.
    fn iter(&mut self) -> Box<dyn Iterator<Item = Self::Batch> + '_>;
}

/// Storage of transitions collected by the current policy.
pub trait RolloutSource {
    /// Batch of agent transitions.
    type Batch;

    /// The number of stored transitions.
    fn len(&self) -> usize;

    /// Returns `true` if no transition is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over minibatches of `mini_batch_size` transitions.
    ///
    /// When `from_recent` is `true`, only the most recent `num_samples`
    /// transitions are considered. `None` means that the storage cannot
    /// provide a batch now; the caller then skips its update.
    fn get_generator(
        &mut self,
        mini_batch_size: usize,
        from_recent: bool,
        num_samples: usize,
    ) -> Option<Box<dyn Iterator<Item = Self::Batch> + '_>>;
}
