//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum GailError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The agent batch size computed for matching the number of expert batches is zero.
    #[error(
        "Maximizing GAIL agent sampler does not work: {n_transitions} agent transitions \
         for {n_expert_batches} expert batches"
    )]
    ZeroAgentBatchSize {
        /// The number of transitions in the rollout buffer.
        n_transitions: usize,

        /// The number of batches of the expert loader.
        n_expert_batches: usize,
    },

    /// Reward type not in `airl`, `gail` or `raw`.
    #[error("Unrecognized reward type {0}")]
    UnknownRewardType(String),

    /// State normalization of the discriminator is disabled but the batch has no raw observation.
    #[error("Raw observation is required when discriminator state normalization is disabled")]
    MissingRawObs,

    /// The checkpoint does not hold the requested key.
    #[error("Checkpoint key not found: {0}")]
    CheckpointKeyNotFound(String),

    /// Dimension mismatch.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,

        /// Given dimension.
        actual: usize,
    },

    /// The last trajectory of a demonstration dataset is not terminated.
    #[error("Trajectory from dataset does not end in termination")]
    UnterminatedTrajectory,
}
