//! Storage of agent transitions.
use crate::TransitionBatch;
use anyhow::{bail, Result};
use gail_core::RolloutSource;
use log::trace;
use tch::{Device, Tensor};

/// Append-only storage of transitions collected by the policy.
///
/// Optional fields of [`TransitionBatch`] must be given either for every
/// pushed batch or for none.
pub struct RolloutStorage {
    buf: Option<TransitionBatch>,
    rng: fastrand::Rng,
    device: Device,
}

fn cat_opt(name: &str, a: &Option<Tensor>, b: &Option<Tensor>) -> Result<Option<Tensor>> {
    match (a, b) {
        (Some(a), Some(b)) => Ok(Some(Tensor::cat(&[a, b], 0))),
        (None, None) => Ok(None),
        _ => bail!("Field {} must be given for all transitions or none", name),
    }
}

impl RolloutStorage {
    /// Creates an empty storage whose minibatches are placed on `device`.
    pub fn new(device: Device) -> Self {
        Self {
            buf: None,
            rng: fastrand::Rng::new(),
            device,
        }
    }

    /// Sets the seed of shuffling.
    pub fn seed(self, seed: u64) -> Self {
        self.rng.seed(seed);
        self
    }

    /// Appends transitions.
    pub fn push(&mut self, batch: TransitionBatch) -> Result<()> {
        let batch = batch.to(Device::Cpu);
        self.buf = Some(match self.buf.take() {
            None => batch,
            Some(buf) => TransitionBatch {
                state: Tensor::cat(&[&buf.state, &batch.state], 0),
                action: Tensor::cat(&[&buf.action, &batch.action], 0),
                next_state: cat_opt("next_state", &buf.next_state, &batch.next_state)?,
                done: cat_opt("done", &buf.done, &batch.done)?,
                raw_state: cat_opt("raw_state", &buf.raw_state, &batch.raw_state)?,
                other_raw_state: cat_opt(
                    "other_raw_state",
                    &buf.other_raw_state,
                    &batch.other_raw_state,
                )?,
            },
        });
        Ok(())
    }

    /// Removes all transitions.
    pub fn clear(&mut self) {
        self.buf = None;
    }

    /// All stored transitions.
    pub fn transitions(&self) -> Option<&TransitionBatch> {
        self.buf.as_ref()
    }
}

impl RolloutSource for RolloutStorage {
    type Batch = TransitionBatch;

    fn len(&self) -> usize {
        self.buf.as_ref().map_or(0, |b| b.len())
    }

    /// Shuffled minibatches of exactly `mini_batch_size` transitions.
    ///
    /// Transitions left over after the last full minibatch are not used.
    fn get_generator(
        &mut self,
        mini_batch_size: usize,
        from_recent: bool,
        num_samples: usize,
    ) -> Option<Box<dyn Iterator<Item = TransitionBatch> + '_>> {
        let buf = self.buf.as_ref()?;
        let n = buf.len();
        let start = if from_recent {
            n.saturating_sub(num_samples)
        } else {
            0
        };
        if mini_batch_size == 0 || n - start < mini_batch_size {
            trace!(
                "{} transitions are not enough for a minibatch of {}",
                n - start,
                mini_batch_size
            );
            return None;
        }

        let mut ixs = (start as i64..n as i64).collect::<Vec<_>>();
        self.rng.shuffle(&mut ixs);
        let chunks = ixs
            .chunks_exact(mini_batch_size)
            .map(|c| c.to_vec())
            .collect::<Vec<_>>();
        let device = self.device;

        Some(Box::new(chunks.into_iter().map(move |c| {
            buf.index_select(&Tensor::from_slice(&c)).to(device)
        })))
    }
}
