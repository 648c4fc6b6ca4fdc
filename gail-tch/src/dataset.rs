//! Expert demonstrations.
use crate::TransitionBatch;
use anyhow::{bail, Context, Result};
use gail_core::{error::GailError, ExpertSampler};
use log::info;
use std::{collections::HashMap, convert::TryFrom, path::Path};
use tch::{Device, Kind, Tensor};

/// Per-dimension statistics of expert states and actions.
#[derive(Debug)]
pub struct ExpertStats {
    /// Mean of states.
    pub state_mean: Tensor,

    /// Unbiased standard deviation of states.
    pub state_std: Tensor,

    /// Mean of actions.
    pub action_mean: Tensor,

    /// Unbiased standard deviation of actions.
    pub action_std: Tensor,
}

/// Expert transitions held as float tensors.
///
/// `done[i]` is 1.0 if transition `i` ends a trajectory.
#[derive(Debug)]
pub struct TransitionDataset {
    obs: Tensor,
    actions: Tensor,
    next_obs: Tensor,
    done: Tensor,
}

impl TransitionDataset {
    /// Creates a dataset from tensors sharing the first axis.
    pub fn from_tensors(obs: Tensor, actions: Tensor, next_obs: Tensor, done: Tensor) -> Result<Self> {
        let n = obs.size()[0];
        for t in [&actions, &next_obs, &done].iter() {
            let m = t.size().first().copied().unwrap_or(0);
            if m != n {
                return Err(GailError::DimensionMismatch {
                    expected: n as _,
                    actual: m as _,
                }
                .into());
            }
        }

        Ok(Self {
            obs: obs.to_kind(Kind::Float),
            actions: actions.to_kind(Kind::Float),
            next_obs: next_obs.to_kind(Kind::Float),
            done: done.to_kind(Kind::Float).view([-1]),
        })
    }

    /// Loads trajectories of equal length from an `.npz` file.
    ///
    /// The file holds `obs` and `acs` of shape `[n_trajs, traj_len, dim]`.
    /// Consecutive observations of the flattened sequence form the transitions,
    /// so the last observation has no transition of its own.
    pub fn from_npz(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let arrays: HashMap<String, Tensor> = Tensor::read_npz(path)
            .with_context(|| format!("Failed to read {:?}", path))?
            .into_iter()
            .collect();
        let get = |key: &str| {
            arrays
                .get(key)
                .ok_or_else(|| GailError::CheckpointKeyNotFound(key.to_string()))
        };
        let obs = get("obs")?;
        let acs = get("acs")?;

        for t in [obs, acs].iter() {
            if t.dim() != 3 {
                return Err(GailError::DimensionMismatch {
                    expected: 3,
                    actual: t.dim(),
                }
                .into());
            }
        }
        let size = obs.size();
        let (n_trajs, traj_len) = (size[0], size[1]);
        let n = n_trajs * traj_len;
        if n == 0 {
            return Err(GailError::DimensionMismatch {
                expected: 1,
                actual: 0,
            }
            .into());
        }
        let obs = obs.reshape([n, -1]);
        let acs = acs.reshape([n, -1]);

        let mut done = vec![0f32; n as usize];
        for i in 0..n_trajs {
            done[((i + 1) * traj_len - 1) as usize] = 1.0;
        }
        let done = Tensor::from_slice(&done);

        info!(
            "Load {} trajectories of length {} from {:?}",
            n_trajs, traj_len, path
        );
        Self::from_tensors(
            obs.narrow(0, 0, n - 1),
            acs.narrow(0, 0, n - 1),
            obs.narrow(0, 1, n - 1),
            done.narrow(0, 1, n - 1),
        )
    }

    /// The number of transitions.
    pub fn len(&self) -> usize {
        self.obs.size()[0] as _
    }

    /// Returns `true` if the dataset has no transition.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th transition as a batch of size 1.
    pub fn get(&self, i: usize) -> TransitionBatch {
        self.select(&Tensor::from_slice(&[i as i64]))
    }

    /// Selects transitions by indices.
    pub fn select(&self, ixs: &Tensor) -> TransitionBatch {
        TransitionBatch::new(self.obs.index_select(0, ixs), self.actions.index_select(0, ixs))
            .next_state(self.next_obs.index_select(0, ixs))
            .done(self.done.index_select(0, ixs))
    }

    /// The number of complete trajectories.
    pub fn num_trajs(&self) -> usize {
        self.done.eq(1.0).sum(Kind::Int64).int64_value(&[]) as _
    }

    /// Per-dimension statistics of states and actions.
    pub fn expert_stats(&self, device: Device) -> ExpertStats {
        let stats = |t: &Tensor| {
            (
                t.mean_dim(&[0], false, Kind::Float).to(device),
                t.std_dim(&[0], true, false).to(device),
            )
        };
        let (state_mean, state_std) = stats(&self.obs);
        let (action_mean, action_std) = stats(&self.actions);

        ExpertStats {
            state_mean,
            state_std,
            action_mean,
            action_std,
        }
    }

    /// Clips actions element-wise to `[low, high]`.
    pub fn clip_actions(&mut self, low: &[f32], high: &[f32]) {
        let device = self.actions.device();
        let low = Tensor::from_slice(low).to(device);
        let high = Tensor::from_slice(high).to(device);
        self.actions = self.actions.maximum(&low).minimum(&high);
    }

    /// Moves the data to `device`.
    pub fn to(mut self, device: Device) -> Self {
        self.obs = self.obs.to(device);
        self.actions = self.actions.to(device);
        self.next_obs = self.next_obs.to(device);
        self.done = self.done.to(device);
        self
    }

    /// Start and end indices (exclusive) of trajectories.
    fn trajectories(&self) -> Result<Vec<(usize, usize)>> {
        let done = Vec::<f32>::try_from(&self.done.to(Device::Cpu))?;
        let mut trajs = vec![];
        let mut start = 0;
        for (i, d) in done.iter().enumerate() {
            if *d == 1.0 {
                trajs.push((start, i + 1));
                start = i + 1;
            }
        }
        if start != done.len() {
            return Err(GailError::UnterminatedTrajectory.into());
        }
        Ok(trajs)
    }

    /// Keeps a random fraction of whole trajectories.
    ///
    /// `floor(num_trajs * traj_frac)` trajectories are kept, all of them if
    /// `traj_frac >= 1`. The selection depends only on `seed`.
    pub fn compute_split(&self, traj_frac: f64, seed: u64) -> Result<Self> {
        let mut trajs = self.trajectories()?;
        let use_count = ((trajs.len() as f64 * traj_frac) as usize).min(trajs.len());
        fastrand::Rng::with_seed(seed).shuffle(&mut trajs);

        let ixs = trajs[..use_count]
            .iter()
            .flat_map(|&(s, e)| (s as i64)..(e as i64))
            .collect::<Vec<_>>();
        let ixs = Tensor::from_slice(&ixs).to(self.obs.device());

        info!("Keep {} of {} trajectories", use_count, trajs.len());
        Ok(Self {
            obs: self.obs.index_select(0, &ixs),
            actions: self.actions.index_select(0, &ixs),
            next_obs: self.next_obs.index_select(0, &ixs),
            done: self.done.index_select(0, &ixs),
        })
    }
}

/// Serves a [`TransitionDataset`] in shuffled batches.
///
/// Every pass reshuffles the transitions. The final batch of a pass may be
/// smaller than the batch size.
pub struct ExpertLoader {
    dataset: TransitionDataset,
    batch_size: usize,
    rng: fastrand::Rng,
    device: Device,
}

impl ExpertLoader {
    /// Creates a loader with batches of `batch_size` on `device`.
    ///
    /// `batch_size` must be positive.
    pub fn new(dataset: TransitionDataset, batch_size: usize, device: Device) -> Result<Self> {
        if batch_size == 0 {
            bail!("Batch size of the expert loader must be positive");
        }
        Ok(Self {
            dataset,
            batch_size,
            rng: fastrand::Rng::new(),
            device,
        })
    }

    /// Sets the seed of shuffling.
    pub fn seed(self, seed: u64) -> Self {
        self.rng.seed(seed);
        self
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &TransitionDataset {
        &self.dataset
    }
}

impl ExpertSampler for ExpertLoader {
    type Batch = TransitionBatch;

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn len(&self) -> usize {
        (self.dataset.len() + self.batch_size - 1) / self.batch_size
    }

    fn iter(&mut self) -> Box<dyn Iterator<Item = TransitionBatch> + '_> {
        let mut ixs = (0..self.dataset.len() as i64).collect::<Vec<_>>();
        self.rng.shuffle(&mut ixs);
        let dataset = &self.dataset;
        let device = self.device;
        let ixs = ixs
            .chunks(self.batch_size)
            .map(|c| c.to_vec())
            .collect::<Vec<_>>();

        Box::new(
            ixs.into_iter()
                .map(move |c| dataset.select(&Tensor::from_slice(&c)).to(device)),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    // Two trajectories of length 3 with 1-dimensional states and actions.
    fn dataset() -> TransitionDataset {
        let obs = Tensor::from_slice(&[0f32, 1., 2., 10., 11., 12.]).view([6, 1]);
        let next_obs = &obs + 1.0;
        let actions = &obs * 2.0;
        let done = Tensor::from_slice(&[0f32, 0., 1., 0., 0., 1.]);
        TransitionDataset::from_tensors(obs, actions, next_obs, done).unwrap()
    }

    #[test]
    fn test_len_and_num_trajs() {
        let ds = dataset();
        assert_eq!(ds.len(), 6);
        assert_eq!(ds.num_trajs(), 2);
        let tr = ds.get(4);
        assert_eq!(tr.state.double_value(&[0, 0]), 11.0);
        assert_eq!(tr.action.double_value(&[0, 0]), 22.0);
    }

    #[test]
    fn test_from_tensors_checks_length() {
        let obs = Tensor::zeros(&[3, 2], tch::kind::FLOAT_CPU);
        let actions = Tensor::zeros(&[2, 1], tch::kind::FLOAT_CPU);
        let res = TransitionDataset::from_tensors(obs.copy(), actions, obs, Tensor::zeros(&[3], tch::kind::FLOAT_CPU));
        assert!(res.is_err());
    }

    #[test]
    fn test_compute_split() {
        let ds = dataset();
        let split = ds.compute_split(0.5, 42).unwrap();
        assert_eq!(split.len(), 3);
        assert_eq!(split.num_trajs(), 1);

        let again = ds.compute_split(0.5, 42).unwrap();
        let diff = (split.obs - again.obs).abs().sum(Kind::Float);
        assert_eq!(f64::try_from(diff).unwrap(), 0.0);
    }

    #[test]
    fn test_compute_split_keeps_all_trajectories() {
        let ds = dataset();
        let split = ds.compute_split(1.5, 0).unwrap();
        assert_eq!(split.len(), 6);
        assert_eq!(split.num_trajs(), 2);
    }

    #[test]
    fn test_unterminated_trajectory() {
        let obs = Tensor::zeros(&[3, 1], tch::kind::FLOAT_CPU);
        let done = Tensor::from_slice(&[0f32, 1., 0.]);
        let ds = TransitionDataset::from_tensors(obs.copy(), obs.copy(), obs, done).unwrap();
        let err = ds.compute_split(1.0, 0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GailError>(),
            Some(GailError::UnterminatedTrajectory)
        ));
    }

    #[test]
    fn test_expert_stats_and_clip() {
        let mut ds = dataset();
        let stats = ds.expert_stats(Device::Cpu);
        assert!((stats.state_mean.double_value(&[0]) - 6.0).abs() < 1e-5);

        ds.clip_actions(&[0.0], &[5.0]);
        let stats = ds.expert_stats(Device::Cpu);
        assert!(stats.action_mean.double_value(&[0]) <= 5.0);
        let max = ds.actions.max().double_value(&[]);
        assert_eq!(max, 5.0);
    }

    #[test]
    fn test_loader_batches() {
        let mut loader = ExpertLoader::new(dataset(), 4, Device::Cpu).unwrap().seed(1);
        assert_eq!(loader.len(), 2);
        assert_eq!(loader.batch_size(), 4);

        let sizes = loader.iter().map(|b| b.len()).collect::<Vec<_>>();
        assert_eq!(sizes, vec![4, 2]);

        let total: f64 = loader
            .iter()
            .map(|b| b.state.sum(Kind::Float).double_value(&[]))
            .sum();
        assert_eq!(total, 36.0);
    }

    #[test]
    fn test_loader_rejects_zero_batch_size() {
        assert!(ExpertLoader::new(dataset(), 0, Device::Cpu).is_err());
    }

    #[test]
    fn test_from_npz_checks_shape() {
        let dir = TempDir::new("gail_npz").unwrap();
        let path = dir.path().join("flat.npz");
        let obs = Tensor::zeros(&[4, 1], (Kind::Float, Device::Cpu));
        Tensor::write_npz(&[("obs", &obs), ("acs", &obs)], &path).unwrap();
        let err = TransitionDataset::from_npz(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GailError>(),
            Some(GailError::DimensionMismatch { expected: 3, actual: 2 })
        ));

        let path = dir.path().join("empty.npz");
        let obs = Tensor::zeros(&[0, 4, 1], (Kind::Float, Device::Cpu));
        Tensor::write_npz(&[("obs", &obs), ("acs", &obs)], &path).unwrap();
        let err = TransitionDataset::from_npz(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GailError>(),
            Some(GailError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_npz() {
        let dir = TempDir::new("gail_npz").unwrap();
        let path = dir.path().join("expert.npz");
        let obs = Tensor::arange(8, (Kind::Float, Device::Cpu)).view([2, 4, 1]);
        let acs = Tensor::zeros(&[2, 4, 1], (Kind::Float, Device::Cpu));
        let rews = Tensor::zeros(&[2, 4], (Kind::Float, Device::Cpu));
        Tensor::write_npz(&[("obs", &obs), ("acs", &acs), ("rews", &rews)], &path).unwrap();

        let ds = TransitionDataset::from_npz(&path).unwrap();
        assert_eq!(ds.len(), 7);
        assert_eq!(ds.num_trajs(), 2);
        assert_eq!(ds.next_obs.double_value(&[0, 0]), 1.0);
        // The first trajectory ends one step before the end of its observations.
        assert_eq!(ds.done.double_value(&[2]), 1.0);
        assert_eq!(ds.done.double_value(&[6]), 1.0);
    }
}
