//! Composition of the reward update and the policy update.
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Checkpointer, EnvSettings, ModifyEnvSettings, Persistent, PolicyUpdater, RewardUpdater,
    RolloutSource,
};
use anyhow::Result;
use log::{debug, info};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs the discriminator update and the policy update in turn.
///
/// Each call of [`Gail::update`] performs one outer iteration:
///
/// 1. The reward updater `D` trains the discriminator on the rollouts in the
///    buffer against the expert demonstrations it holds.
/// 2. The policy updater `U` trains the policy on the same buffer, querying
///    `D` for the rewards of the transitions.
///
/// ```mermaid
/// graph LR
///     B[RolloutSource]-->|agent batches|D[RewardUpdater]
///     E[ExpertSampler]-->|expert batches|D
///     B-->|transitions|U[PolicyUpdater]
///     D-->|rewards|U
/// ```
///
/// The records returned by both stages are merged. A key emitted by both
/// stages takes the value of the policy updater.
pub struct Gail<D, U> {
    discrim: D,
    updater: U,
    n_updates: usize,
}

impl<D, U> Gail<D, U> {
    /// Composes a reward updater and a policy updater.
    pub fn new(discrim: D, updater: U) -> Self {
        Self {
            discrim,
            updater,
            n_updates: 0,
        }
    }

    /// The reward updater.
    pub fn discrim(&self) -> &D {
        &self.discrim
    }

    /// Mutable reference to the reward updater.
    pub fn discrim_mut(&mut self) -> &mut D {
        &mut self.discrim
    }

    /// The policy updater.
    pub fn updater(&self) -> &U {
        &self.updater
    }

    /// Mutable reference to the policy updater.
    pub fn updater_mut(&mut self) -> &mut U {
        &mut self.updater
    }

    /// The number of completed outer iterations.
    pub fn n_updates(&self) -> usize {
        self.n_updates
    }

    /// Splits the controller into its stages.
    pub fn into_inner(self) -> (D, U) {
        (self.discrim, self.updater)
    }
}

impl<D, U> Gail<D, U>
where
    D: ModifyEnvSettings,
    U: ModifyEnvSettings,
{
    /// Lets both stages adjust the settings of the environment.
    ///
    /// The reward updater goes first, so the policy updater sees its requests.
    pub fn env_settings(&self, settings: &mut EnvSettings) {
        self.discrim.env_settings(settings);
        self.updater.env_settings(settings);
    }
}

impl<D, U> Gail<D, U> {
    /// Performs an outer iteration.
    pub fn update<R>(&mut self, buffer: &mut R) -> Result<Record>
    where
        R: RolloutSource,
        D: RewardUpdater<R>,
        U: PolicyUpdater<R, D>,
    {
        let record_discrim = self.discrim.update_reward_function(buffer)?;
        let record_updater = self.updater.update(buffer, &mut self.discrim)?;
        self.n_updates += 1;
        debug!(
            "Update {}: {} discriminator metrics, {} policy metrics",
            self.n_updates,
            record_discrim.len(),
            record_updater.len()
        );

        Ok(record_discrim.merge(record_updater))
    }

    /// Performs an outer iteration and writes the merged record.
    ///
    /// The record includes the number of iterations as `n_updates`.
    pub fn update_with_recorder<R, W>(&mut self, buffer: &mut R, recorder: &mut W) -> Result<()>
    where
        R: RolloutSource,
        D: RewardUpdater<R>,
        U: PolicyUpdater<R, D>,
        W: Recorder,
    {
        let mut record = self.update(buffer)?;
        record.insert("n_updates", Scalar(self.n_updates as f32));
        recorder.write(record);
        Ok(())
    }

    /// Saves both stages.
    pub fn save<C>(&self, checkpointer: &mut C) -> Result<()>
    where
        C: Checkpointer,
        D: Persistent<C>,
        U: Persistent<C>,
    {
        self.discrim.save(checkpointer)?;
        self.updater.save(checkpointer)?;
        info!("Saved GAIL stages after {} updates", self.n_updates);
        Ok(())
    }

    /// Restores the parameters of both stages.
    pub fn load<C>(&mut self, checkpointer: &C) -> Result<()>
    where
        C: Checkpointer,
        D: Persistent<C>,
        U: Persistent<C>,
    {
        self.discrim.load(checkpointer)?;
        self.updater.load(checkpointer)?;
        info!("Loaded GAIL stages");
        Ok(())
    }

    /// Restores the full training state of both stages.
    pub fn load_resume<C>(&mut self, checkpointer: &C) -> Result<()>
    where
        C: Checkpointer,
        D: Persistent<C>,
        U: Persistent<C>,
    {
        self.discrim.load_resume(checkpointer)?;
        self.updater.load_resume(checkpointer)?;
        info!("Loaded GAIL stages for resuming training");
        Ok(())
    }
}
