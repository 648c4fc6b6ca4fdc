//! Discriminator trainer and reward inference.
use super::{DiscrimRenderHook, Discriminator, GailConfig, RewardType};
use crate::{
    gail::wass_grad_pen,
    model::{OutDim, SubModel},
    opt::Optimizer,
    util::{scalar, to_vec_f32, NamedTensors},
    ActionSpace, Device, ObsFilter, PolicyInfo, TransitionBatch,
};
use anyhow::Result;
use gail_core::{
    error::GailError,
    record::Record,
    AuxInputs, Checkpointer, EnvSettings, ExpertSampler, Frame, ModifyEnvSettings, Persistent,
    RenderHook, RenderStep, RewardModel, RewardUpdater, RolloutSource, RunningMeanStd,
};
use log::{debug, info, trace, warn};
use std::rc::Rc;
use tch::{nn::VarStore, Kind, Reduction, Tensor};

const EPS: f64 = 1e-20;

const DISC_KEY: &str = "gail_disc";

const DISC_OPT_KEY: &str = "gail_disc_opt";

/// Binary cross entropy of expert logits against 1 and agent logits against 0.
///
/// Returns `(expert_loss, agent_loss)`, each averaged over its batch.
pub fn compute_discrim_loss(expert_d: &Tensor, agent_d: &Tensor) -> (Tensor, Tensor) {
    let expert_loss = expert_d.binary_cross_entropy_with_logits::<Tensor>(
        &expert_d.ones_like(),
        None,
        None,
        Reduction::Mean,
    );
    let agent_loss = agent_d.binary_cross_entropy_with_logits::<Tensor>(
        &agent_d.zeros_like(),
        None,
        None,
        Reduction::Mean,
    );
    (expert_loss, agent_loss)
}

/// Converts discriminator logits to rewards.
pub fn discrim_reward(d: &Tensor, reward_type: RewardType) -> Tensor {
    match reward_type {
        RewardType::Airl => {
            let s = d.sigmoid();
            (&s + EPS).log() - (-&s + (1.0 + EPS)).log()
        }
        RewardType::Gail => (d.sigmoid() + EPS).log(),
        RewardType::Raw => d.shallow_clone(),
    }
}

struct StepLosses {
    discrim_loss: f32,
    expert_loss: f32,
    agent_loss: f32,
    grad_pen: Option<f32>,
}

/// The reward-learning stage of GAIL.
///
/// [`GailDiscrim`] trains a [`Discriminator`] to separate expert transitions,
/// served by `E`, from transitions of the current policy, and computes the
/// rewards of the policy from its output.
///
/// State owned here is mutated only by `&mut self` methods:
/// parameters and optimizer state by
/// [`update_reward_function`](RewardUpdater::update_reward_function), and the
/// returns accumulator and its running statistics by
/// [`get_reward`](RewardModel::get_reward).
pub struct GailDiscrim<B, E> {
    config: GailConfig,
    var_store: VarStore,
    discrim: Rc<Discriminator<B>>,
    opt: Optimizer,
    expert_loader: E,
    obs_filter: Option<Box<dyn ObsFilter>>,
    action_space: ActionSpace,
    obs_shape: Vec<i64>,
    returns: Option<Tensor>,
    ret_rms: RunningMeanStd,
    device: tch::Device,
}

impl<B, E> GailDiscrim<B, E>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
    B::Config: OutDim,
    E: ExpertSampler<Batch = TransitionBatch>,
{
    /// Builds the discriminator for `policy`, trained against the demonstrations in `expert_loader`.
    pub fn build<P>(config: GailConfig, policy: &P, expert_loader: E) -> Result<Self>
    where
        P: PolicyInfo<Base = B>,
    {
        let device: tch::Device = config.device.unwrap_or(Device::Cpu).into();
        if let Some(seed) = config.seed {
            tch::manual_seed(seed);
        }

        let var_store = VarStore::new(device);
        let obs_shape = policy.obs_shape();
        let action_space = policy.action_space();
        let base_config = policy.base_net_config(&obs_shape);
        let base_out_dim = base_config.get_out_dim();
        let discrim = Discriminator::build(
            &var_store,
            base_config,
            base_out_dim,
            action_space.dim(),
            &config.discrim_config,
        )?;
        let opt = config.opt_config.build(&var_store)?;

        info!(
            "Build GAIL discriminator: obs shape {:?}, {:?}, reward type {}",
            obs_shape, action_space, config.reward_type
        );

        Ok(Self {
            config,
            var_store,
            discrim: Rc::new(discrim),
            opt,
            expert_loader,
            obs_filter: None,
            action_space,
            obs_shape,
            returns: None,
            ret_rms: RunningMeanStd::new(1),
            device,
        })
    }
}

impl<B, E> GailDiscrim<B, E>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
    E: ExpertSampler<Batch = TransitionBatch>,
{
    /// Registers the observation filter of the environment.
    ///
    /// Expert states are normalized with it when `gail_state_norm` is set.
    pub fn set_obs_filter(&mut self, obs_filter: Box<dyn ObsFilter>) {
        self.obs_filter = Some(obs_filter);
    }

    /// Configuration.
    pub fn config(&self) -> &GailConfig {
        &self.config
    }

    /// The discriminator network.
    pub fn discrim(&self) -> &Discriminator<B> {
        &self.discrim
    }

    /// Variables of the discriminator network.
    pub fn var_store(&self) -> &VarStore {
        &self.var_store
    }

    /// Running statistics of the returns used for reward normalization.
    pub fn ret_rms(&self) -> &RunningMeanStd {
        &self.ret_rms
    }

    /// The expert sampler.
    pub fn expert_loader(&self) -> &E {
        &self.expert_loader
    }

    /// Computes logits of `state` and `action`.
    pub fn compute_disc_val(&self, state: &Tensor, action: &Tensor, train: bool) -> Tensor {
        self.discrim.forward_t(state, action, train)
    }

    /// The render hook drawing the discriminator output on frames.
    pub fn render_hook(&self) -> DiscrimRenderHook<B> {
        DiscrimRenderHook::new(
            self.discrim.clone(),
            self.action_space,
            self.obs_shape.clone(),
            self.device,
        )
    }

    /// Draws the discriminator output for a single step on `frame`.
    pub fn mod_render_frames(&self, frame: &mut dyn Frame, step: &RenderStep) -> Result<()> {
        self.render_hook().mod_render_frame(frame, step)
    }

    /// Rewards of the transitions, without auxiliary information.
    pub fn get_viz_reward(
        &mut self,
        state: &Tensor,
        next_state: &Tensor,
        action: &Tensor,
        done_mask: &Tensor,
        aux: &AuxInputs<Tensor>,
    ) -> Result<Tensor> {
        let (reward, _) = self.get_reward(state, next_state, action, done_mask, aux)?;
        Ok(reward)
    }

    fn agent_batch_size(&self, n_transitions: usize) -> Result<usize> {
        if !self.config.gail_max_agent_batch_size {
            return Ok(self.expert_loader.batch_size());
        }

        let n_expert_batches = self.expert_loader.len();
        let batch_size = match n_expert_batches {
            0 => 0,
            n => n_transitions / n,
        };
        if batch_size == 0 {
            return Err(GailError::ZeroAgentBatchSize {
                n_transitions,
                n_expert_batches,
            }
            .into());
        }
        if n_transitions % n_expert_batches != 0 {
            warn!(
                "Agent batch size {} leaves {} of {} transitions unused",
                batch_size,
                n_transitions % n_expert_batches,
                n_transitions
            );
        }
        Ok(batch_size)
    }

    fn norm_expert_state(&self, state: &Tensor) -> Tensor {
        let state = state.to(self.device);
        match (self.config.gail_state_norm, &self.obs_filter) {
            (true, Some(filter)) => filter.filter(&state),
            _ => state,
        }
    }

    fn trans_agent_state(&self, batch: &TransitionBatch) -> Result<Tensor> {
        if self.config.gail_state_norm {
            return Ok(batch.state.to(self.device));
        }
        match batch.raw_obs() {
            Some(t) => Ok(t.to(self.device)),
            None => Err(GailError::MissingRawObs.into()),
        }
    }

    fn train_step(&mut self, expert: &TransitionBatch, agent: &TransitionBatch) -> Result<StepLosses> {
        let expert_states = self.norm_expert_state(&expert.state);
        let agent_states = self.trans_agent_state(agent)?;
        let expert_actions = self.action_space.action_repr(&expert.action.to(self.device));
        let agent_actions = self.action_space.action_repr(&agent.action.to(self.device));

        let expert_d = self.compute_disc_val(&expert_states, &expert_actions, true);
        let agent_d = self.compute_disc_val(&agent_states, &agent_actions, true);
        let (expert_loss, agent_loss) = compute_discrim_loss(&expert_d, &agent_d);
        let discrim_loss = &expert_loss + &agent_loss;

        let (total_loss, grad_pen) = if self.config.disc_grad_pen > 0.0 {
            let discrim = &self.discrim;
            let grad_pen = wass_grad_pen(
                &expert_states,
                &expert_actions,
                &agent_states,
                &agent_actions,
                discrim.action_input(),
                |s, a| discrim.forward_t(s, a, true),
            ) * self.config.disc_grad_pen;
            let v = scalar(&grad_pen)?;
            (&discrim_loss + grad_pen, Some(v))
        } else {
            (discrim_loss.shallow_clone(), None)
        };

        self.opt.backward_step(&total_loss);

        Ok(StepLosses {
            discrim_loss: scalar(&discrim_loss)?,
            expert_loss: scalar(&expert_loss)?,
            agent_loss: scalar(&agent_loss)?,
            grad_pen,
        })
    }
}

impl<B, E, R> RewardUpdater<R> for GailDiscrim<B, E>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
    E: ExpertSampler<Batch = TransitionBatch>,
    R: RolloutSource<Batch = TransitionBatch>,
{
    /// Trains the discriminator for `n_gail_epochs` passes over the expert data.
    ///
    /// Each pass pairs expert batches with a fresh set of agent minibatches
    /// and stops with the shorter of the two. The returned losses are
    /// averaged over the processed pairs. If the buffer cannot provide
    /// minibatches for the first pass, nothing is trained and the record is empty.
    fn update_reward_function(&mut self, buffer: &mut R) -> Result<Record> {
        if self.config.freeze_reward {
            return Ok(Record::empty());
        }

        let batch_size = self.agent_batch_size(buffer.len())?;
        let mut record = Record::empty();
        let mut n = 0;

        for epoch in 0..self.config.n_gail_epochs {
            let agent_batches = match buffer.get_generator(
                batch_size,
                self.config.off_policy_recent,
                self.config.off_policy_count,
            ) {
                Some(g) => g,
                None => {
                    trace!("No agent batch in epoch {}", epoch);
                    break;
                }
            };
            let expert_batches = self.expert_loader.iter().collect::<Vec<_>>();

            for (expert_batch, agent_batch) in expert_batches.iter().zip(agent_batches) {
                let losses = self.train_step(expert_batch, &agent_batch)?;
                record.accumulate("discrim_loss", losses.discrim_loss);
                record.accumulate("expert_loss", losses.expert_loss);
                record.accumulate("agent_loss", losses.agent_loss);
                if let Some(v) = losses.grad_pen {
                    record.accumulate("grad_pen", v);
                }
                n += 1;
            }
        }

        if n > 0 {
            record.scale_scalars(1.0 / n as f32);
            debug!(
                "Discriminator update over {} batches: discrim_loss {:?}",
                n,
                record.get_scalar("discrim_loss").ok()
            );
        }
        Ok(record)
    }
}

impl<B, E> RewardModel for GailDiscrim<B, E>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
    E: ExpertSampler<Batch = TransitionBatch>,
{
    type Tensor = Tensor;

    /// Rewards of a batch of transitions, shaped `[batch, 1]`.
    ///
    /// With `gail_reward_norm`, rewards are divided by the running standard
    /// deviation of discounted returns, accumulated across calls with
    /// `done_mask` resetting finished episodes.
    fn get_reward(
        &mut self,
        state: &Tensor,
        _next_state: &Tensor,
        action: &Tensor,
        done_mask: &Tensor,
        _aux: &AuxInputs<Tensor>,
    ) -> Result<(Tensor, Record)> {
        let reward = tch::no_grad(|| {
            let action = self.action_space.action_repr(&action.to(self.device));
            let d = self.compute_disc_val(&state.to(self.device), &action, false);
            discrim_reward(&d, self.config.reward_type)
        });

        if !self.config.gail_reward_norm {
            return Ok((reward, Record::empty()));
        }

        let mask = done_mask
            .to(self.device)
            .to_kind(Kind::Float)
            .reshape_as(&reward);
        let returns = match self.returns.take() {
            Some(returns) => returns,
            None => reward.copy(),
        };
        let returns = returns * mask * self.config.gamma + &reward;
        let values = to_vec_f32(&returns)?;
        self.returns = Some(returns);
        self.ret_rms.update(&values)?;

        let std = (self.ret_rms.var()[0] + 1e-8).sqrt();
        Ok((reward / std, Record::empty()))
    }
}

impl<B, E> ModifyEnvSettings for GailDiscrim<B, E>
where
    B: SubModel<Input = Tensor, Output = Tensor> + 'static,
    E: ExpertSampler<Batch = TransitionBatch>,
{
    /// Asks for raw observations when states are not normalized and installs the render hook.
    fn env_settings(&self, settings: &mut EnvSettings) {
        if !self.config.gail_state_norm {
            settings.ret_raw_obs = true;
        }
        settings.render_hook = Some(Box::new(self.render_hook()));
    }
}

impl<B, E, C> Persistent<C> for GailDiscrim<B, E>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
    E: ExpertSampler<Batch = TransitionBatch>,
    C: Checkpointer<State = NamedTensors>,
{
    fn save(&self, checkpointer: &mut C) -> Result<()> {
        checkpointer.save_key(DISC_OPT_KEY, self.opt.state_dict())?;
        checkpointer.save_key(DISC_KEY, NamedTensors::copy_from(&self.var_store))?;
        info!("Save GAIL discriminator");
        for (name, _) in self.var_store.variables().iter() {
            trace!("Save variable {}", name);
        }
        Ok(())
    }

    fn load(&mut self, checkpointer: &C) -> Result<()> {
        let state = checkpointer.get_key(DISC_KEY)?;
        state.copy_to(&mut self.var_store)?;
        info!("Load GAIL discriminator");
        Ok(())
    }

    fn load_resume(&mut self, checkpointer: &C) -> Result<()> {
        self.load(checkpointer)?;
        let state = checkpointer.get_key(DISC_OPT_KEY)?;
        self.opt.load_state_dict(&state)?;
        info!("Load optimizer state of GAIL discriminator");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        gail::DiscriminatorConfig,
        mlp::{Flatten, FlattenConfig},
        DirCheckpointer, ExpertLoader, RolloutStorage, TransitionDataset,
    };
    use gail_core::MemoryCheckpointer;
    use tch::Device as TchDevice;
    use tempdir::TempDir;

    struct TestPolicy;

    impl PolicyInfo for TestPolicy {
        type Base = Flatten;

        fn obs_shape(&self) -> Vec<i64> {
            vec![2]
        }

        fn action_space(&self) -> ActionSpace {
            ActionSpace::Continuous(1)
        }

        fn base_net_config(&self, obs_shape: &[i64]) -> FlattenConfig {
            FlattenConfig::new(obs_shape)
        }
    }

    fn expert_loader(n: i64, batch_size: usize) -> ExpertLoader {
        let obs = Tensor::ones(&[n, 2], tch::kind::FLOAT_CPU);
        let actions = Tensor::ones(&[n, 1], tch::kind::FLOAT_CPU);
        let done = Tensor::zeros(&[n], tch::kind::FLOAT_CPU);
        let _ = done.get(n - 1).fill_(1.0);
        let ds = TransitionDataset::from_tensors(obs.copy(), actions, obs, done).unwrap();
        ExpertLoader::new(ds, batch_size, TchDevice::Cpu)
            .unwrap()
            .seed(42)
    }

    fn storage(n: i64) -> RolloutStorage {
        let state = -Tensor::ones(&[n, 2], tch::kind::FLOAT_CPU);
        let action = Tensor::zeros(&[n, 1], tch::kind::FLOAT_CPU);
        let mut storage = RolloutStorage::new(TchDevice::Cpu).seed(42);
        storage
            .push(TransitionBatch::new(state, action))
            .unwrap();
        storage
    }

    fn config() -> GailConfig {
        GailConfig::default()
            .discrim_config(DiscriminatorConfig::default().hidden_dim(8))
            .seed(42)
    }

    fn build(config: GailConfig) -> GailDiscrim<Flatten, ExpertLoader> {
        GailDiscrim::build(config, &TestPolicy, expert_loader(8, 4)).unwrap()
    }

    fn max_abs_diff(a: &VarStore, b: &VarStore) -> f64 {
        let vb = b.variables();
        a.variables()
            .iter()
            .map(|(k, t)| (t - &vb[k]).abs().max().double_value(&[]))
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_discrim_reward_at_zero() {
        let d = Tensor::zeros(&[3, 1], tch::kind::FLOAT_CPU);
        let airl = discrim_reward(&d, RewardType::Airl);
        let gail = discrim_reward(&d, RewardType::Gail);
        let raw = discrim_reward(&(&d + 0.7), RewardType::Raw);

        assert!(airl.abs().max().double_value(&[]) < 1e-6);
        assert!((gail.double_value(&[0, 0]) - 0.5f64.ln()).abs() < 1e-6);
        assert!((raw.double_value(&[2, 0]) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_airl_reward_is_logit() {
        let d = Tensor::from_slice(&[-2f32, 0.5, 3.0]).view([3, 1]);
        let r = discrim_reward(&d, RewardType::Airl);
        assert!((r - &d).abs().max().double_value(&[]) < 1e-4);
    }

    #[test]
    fn test_discrim_loss_symmetry() {
        let x = Tensor::from_slice(&[0.3f32, -1.2, 2.0]).view([3, 1]);
        let y = Tensor::from_slice(&[-0.5f32, 0.1]).view([2, 1]);
        let (e1, a1) = compute_discrim_loss(&x, &y);
        let (e2, a2) = compute_discrim_loss(&(-&y), &(-&x));
        assert!((e1.double_value(&[]) - a2.double_value(&[])).abs() < 1e-6);
        assert!((a1.double_value(&[]) - e2.double_value(&[])).abs() < 1e-6);

        let z = Tensor::zeros(&[4, 1], tch::kind::FLOAT_CPU);
        let (e, a) = compute_discrim_loss(&z, &z);
        assert!((e.double_value(&[]) - 2f64.ln()).abs() < 1e-6);
        assert!((a.double_value(&[]) - 2f64.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_freeze_reward() {
        let mut gail = build(config().freeze_reward(true));
        let before = NamedTensors::copy_from(gail.var_store());
        let record = gail.update_reward_function(&mut storage(16)).unwrap();
        assert!(record.is_empty());

        for (k, t) in gail.var_store().variables().iter() {
            let diff = (t - before.get(k).unwrap()).abs().max();
            assert_eq!(diff.double_value(&[]), 0.0);
        }
    }

    #[test]
    fn test_update_records_losses() {
        let mut gail = build(config().n_gail_epochs(3));
        let record = gail.update_reward_function(&mut storage(16)).unwrap();

        for k in ["discrim_loss", "expert_loss", "agent_loss"].iter() {
            assert!(record.get_scalar(k).unwrap().is_finite());
        }
        let total = record.get_scalar("discrim_loss").unwrap();
        let sum = record.get_scalar("expert_loss").unwrap() + record.get_scalar("agent_loss").unwrap();
        assert!((total - sum).abs() < 1e-4);
        assert!(!record.contains_key("grad_pen"));
    }

    #[test]
    fn test_grad_pen_metric() {
        let mut gail = build(config().disc_grad_pen(10.0));
        let record = gail.update_reward_function(&mut storage(16)).unwrap();
        // Expert and agent states differ, so the interpolations are not all
        // at points where the gradient norm is exactly one.
        assert!(record.get_scalar("grad_pen").unwrap() > 0.0);
    }

    #[test]
    fn test_no_agent_batch() {
        let mut gail = build(config());
        let record = gail.update_reward_function(&mut storage(2)).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_zero_agent_batch_size() {
        // 2 expert batches, 1 agent transition.
        let mut gail = build(config().gail_max_agent_batch_size(true));
        let err = gail
            .update_reward_function(&mut storage(1))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GailError>(),
            Some(GailError::ZeroAgentBatchSize {
                n_transitions: 1,
                n_expert_batches: 2
            })
        ));
    }

    #[test]
    fn test_max_agent_batch_size() {
        let mut gail = build(config().gail_max_agent_batch_size(true));
        let record = gail.update_reward_function(&mut storage(9)).unwrap();
        assert!(record.contains_key("discrim_loss"));
    }

    #[test]
    fn test_missing_raw_obs() {
        let mut gail = build(config().gail_state_norm(false));
        let err = gail
            .update_reward_function(&mut storage(16))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GailError>(),
            Some(GailError::MissingRawObs)
        ));
    }

    #[test]
    fn test_reward_shape_and_type() {
        let mut gail = build(config().reward_type(RewardType::Raw));
        let state = Tensor::ones(&[5, 2], tch::kind::FLOAT_CPU);
        let action = Tensor::ones(&[5, 1], tch::kind::FLOAT_CPU);
        let mask = Tensor::ones(&[5, 1], tch::kind::FLOAT_CPU);
        let aux = AuxInputs::new();

        let (reward, info) = gail
            .get_reward(&state, &state, &action, &mask, &aux)
            .unwrap();
        assert_eq!(reward.size(), vec![5, 1]);
        assert!(info.is_empty());
        assert!(!reward.requires_grad());

        let d = gail.compute_disc_val(&state, &action, false);
        assert!((&reward - d).abs().max().double_value(&[]) < 1e-6);

        let viz = gail
            .get_viz_reward(&state, &state, &action, &mask, &aux)
            .unwrap();
        assert!((viz - reward).abs().max().double_value(&[]) < 1e-6);
    }

    #[test]
    fn test_reward_norm() {
        let mut gail = build(config().gail_reward_norm(true));
        let state = Tensor::ones(&[4, 2], tch::kind::FLOAT_CPU);
        let action = Tensor::ones(&[4, 1], tch::kind::FLOAT_CPU);
        let mask = Tensor::from_slice(&[1f32, 1., 0., 1.]).view([4, 1]);
        let aux = AuxInputs::new();

        let mut prev = gail.ret_rms().count();
        for _ in 0..5 {
            let (reward, _) = gail
                .get_reward(&state, &state, &action, &mask, &aux)
                .unwrap();
            let raw = tch::no_grad(|| {
                discrim_reward(
                    &gail.compute_disc_val(&state, &action, false),
                    RewardType::Airl,
                )
            });
            let std = (gail.ret_rms().var()[0] + 1e-8).sqrt();
            assert!((reward - raw / std).abs().max().double_value(&[]) < 1e-5);

            assert!((gail.ret_rms().count() - prev - 4.0).abs() < 1e-6);
            assert!(gail.ret_rms().var()[0] >= 0.0);
            prev = gail.ret_rms().count();
        }
    }

    #[test]
    fn test_render_frame() {
        let gail = build(config());
        let step = RenderStep {
            cur_obs: &[1.0, 1.0],
            cur_action: None,
            cur_reward: Some(1.5),
            next_obs: None,
        };
        let mut frame: Vec<String> = vec![];
        gail.mod_render_frames(&mut frame, &step).unwrap();
        assert_eq!(frame, vec!["Discrim: 0.000", "Reward: 1.500"]);

        let step = RenderStep {
            cur_action: Some(&[1.0]),
            cur_reward: None,
            ..step
        };
        let mut frame: Vec<String> = vec![];
        gail.mod_render_frames(&mut frame, &step).unwrap();
        let d = gail.compute_disc_val(
            &Tensor::ones(&[1, 2], tch::kind::FLOAT_CPU),
            &Tensor::ones(&[1, 1], tch::kind::FLOAT_CPU),
            false,
        );
        assert_eq!(frame[0], format!("Discrim: {:.3}", d.double_value(&[0, 0])));
        assert_eq!(frame[1], "Reward: 0.000");
    }

    #[test]
    fn test_env_settings() {
        let gail = build(config());
        let mut settings = EnvSettings::default();
        gail.env_settings(&mut settings);
        assert!(!settings.ret_raw_obs);
        assert!(settings.render_hook.is_some());

        let gail = build(config().gail_state_norm(false));
        let mut settings = EnvSettings::default();
        gail.env_settings(&mut settings);
        assert!(settings.ret_raw_obs);
    }

    #[test]
    fn test_save_and_load_resume() -> Result<()> {
        let tmp = TempDir::new("gail_discrim")?;
        let mut checkpointer = DirCheckpointer::new(tmp.path())?;

        let mut gail1 = build(config());
        gail1.update_reward_function(&mut storage(16))?;
        gail1.save(&mut checkpointer)?;

        let mut gail2 = build(config().seed(7));
        assert!(max_abs_diff(gail1.var_store(), gail2.var_store()) > 0.0);
        gail2.load_resume(&checkpointer)?;
        assert_eq!(max_abs_diff(gail1.var_store(), gail2.var_store()), 0.0);

        // Both continue identically after resuming.
        let r1 = gail1.update_reward_function(&mut storage(16).seed(1))?;
        let r2 = gail2.update_reward_function(&mut storage(16).seed(1))?;
        assert_eq!(
            r1.get_scalar("discrim_loss")?,
            r2.get_scalar("discrim_loss")?
        );
        Ok(())
    }

    #[test]
    fn test_load_from_memory() -> Result<()> {
        let mut checkpointer = MemoryCheckpointer::<NamedTensors>::new();
        let gail1 = build(config());
        gail1.save(&mut checkpointer)?;

        let mut gail2 = build(config().seed(7));
        gail2.load(&checkpointer)?;
        assert_eq!(max_abs_diff(gail1.var_store(), gail2.var_store()), 0.0);

        let mut gail3 = build(config());
        let empty = MemoryCheckpointer::<NamedTensors>::new();
        assert!(gail3.load(&empty).is_err());
        Ok(())
    }
}
