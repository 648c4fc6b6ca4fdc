//! Configuration of the GAIL discriminator.
use crate::{opt::OptimizerConfig, Device};
use anyhow::Result;
use gail_core::error::GailError;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    str::FromStr,
};

/// Transform from the discriminator logit to the reward.
///
/// With `s = sigmoid(d)`:
/// * `Airl`: `log(s) - log(1 - s)`
/// * `Gail`: `log(s)`
/// * `Raw`: `d`
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum RewardType {
    /// Adversarial inverse reinforcement learning reward.
    Airl,

    /// Log-probability of being expert.
    Gail,

    /// The logit itself.
    Raw,
}

impl Default for RewardType {
    fn default() -> Self {
        Self::Airl
    }
}

impl FromStr for RewardType {
    type Err = GailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airl" => Ok(Self::Airl),
            "gail" => Ok(Self::Gail),
            "raw" => Ok(Self::Raw),
            _ => Err(GailError::UnknownRewardType(s.to_string())),
        }
    }
}

impl TryFrom<String> for RewardType {
    type Error = GailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Airl => "airl",
            Self::Gail => "gail",
            Self::Raw => "raw",
        };
        write!(f, "{}", s)
    }
}

impl From<RewardType> for String {
    fn from(r: RewardType) -> Self {
        r.to_string()
    }
}

/// A layer of the discriminator head.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum HeadLayer {
    /// Fully connected layer.
    Linear {
        /// Output dimension.
        out_dim: i64,
    },

    /// Hyperbolic tangent.
    Tanh,

    /// Rectified linear unit.
    Relu,
}

/// The default head: `Linear(h, h) -> Tanh -> Linear(h, 1)`.
pub fn default_head(hidden_dim: i64) -> Vec<HeadLayer> {
    vec![
        HeadLayer::Linear {
            out_dim: hidden_dim,
        },
        HeadLayer::Tanh,
        HeadLayer::Linear { out_dim: 1 },
    ]
}

/// Configuration of [`Discriminator`](super::Discriminator).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DiscriminatorConfig {
    pub(super) hidden_dim: i64,
    pub(super) action_input: bool,
    pub(super) use_spectral_norm: bool,
    pub(super) head: Option<Vec<HeadLayer>>,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            hidden_dim: 64,
            action_input: false,
            use_spectral_norm: false,
            head: None,
        }
    }
}

impl DiscriminatorConfig {
    /// Hidden dimension of the injection layer and the default head.
    pub fn hidden_dim(mut self, v: i64) -> Self {
        self.hidden_dim = v;
        self
    }

    /// If `true`, actions are concatenated to the encoded states.
    pub fn action_input(mut self, v: bool) -> Self {
        self.action_input = v;
        self
    }

    /// If `true`, linear layers of the injection layer and the head are spectrally normalized.
    pub fn use_spectral_norm(mut self, v: bool) -> Self {
        self.use_spectral_norm = v;
        self
    }

    /// Replaces the default head. The last layer must output a single value.
    pub fn head(mut self, v: Vec<HeadLayer>) -> Self {
        self.head = Some(v);
        self
    }

    /// Layers of the head.
    pub fn head_layers(&self) -> Vec<HeadLayer> {
        match &self.head {
            Some(head) => head.clone(),
            None => default_head(self.hidden_dim),
        }
    }
}

/// Configuration of [`GailDiscrim`](super::GailDiscrim).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GailConfig {
    pub(super) discrim_config: DiscriminatorConfig,
    pub(super) opt_config: OptimizerConfig,
    pub(super) gail_reward_norm: bool,
    pub(super) gail_state_norm: bool,
    pub(super) disc_grad_pen: f64,
    pub(super) n_gail_epochs: usize,
    pub(super) reward_type: RewardType,
    pub(super) gail_max_agent_batch_size: bool,
    pub(super) off_policy_recent: bool,
    pub(super) off_policy_count: usize,
    pub(super) freeze_reward: bool,
    pub(super) gamma: f64,
    pub(super) seed: Option<i64>,
    pub device: Option<Device>,
}

impl Default for GailConfig {
    fn default() -> Self {
        Self {
            discrim_config: Default::default(),
            opt_config: OptimizerConfig::Adam { lr: 1e-4 },
            gail_reward_norm: false,
            gail_state_norm: true,
            disc_grad_pen: 0.0,
            n_gail_epochs: 1,
            reward_type: RewardType::Airl,
            gail_max_agent_batch_size: false,
            off_policy_recent: true,
            off_policy_count: 2048,
            freeze_reward: false,
            gamma: 0.99,
            seed: None,
            device: None,
        }
    }
}

impl GailConfig {
    /// Configuration of the discriminator network.
    pub fn discrim_config(mut self, v: DiscriminatorConfig) -> Self {
        self.discrim_config = v;
        self
    }

    /// Configuration of the optimizer.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Learning rate of the discriminator.
    pub fn disc_lr(mut self, lr: f64) -> Self {
        self.opt_config = OptimizerConfig::Adam { lr };
        self
    }

    /// If `true`, rewards are divided by the running standard deviation of returns.
    pub fn gail_reward_norm(mut self, v: bool) -> Self {
        self.gail_reward_norm = v;
        self
    }

    /// If `true`, the discriminator sees states normalized by the environment.
    ///
    /// Otherwise it sees raw observations, which the environment is asked to keep.
    pub fn gail_state_norm(mut self, v: bool) -> Self {
        self.gail_state_norm = v;
        self
    }

    /// Coefficient of the gradient penalty. Zero disables the penalty.
    pub fn disc_grad_pen(mut self, v: f64) -> Self {
        self.disc_grad_pen = v;
        self
    }

    /// The number of passes over the expert data per update.
    pub fn n_gail_epochs(mut self, v: usize) -> Self {
        self.n_gail_epochs = v;
        self
    }

    /// Reward transform.
    pub fn reward_type(mut self, v: RewardType) -> Self {
        self.reward_type = v;
        self
    }

    /// If `true`, the agent batch size is chosen so that the number of agent
    /// batches equals the number of expert batches.
    pub fn gail_max_agent_batch_size(mut self, v: bool) -> Self {
        self.gail_max_agent_batch_size = v;
        self
    }

    /// If `true`, only the most recent `off_policy_count` transitions are used.
    pub fn off_policy_recent(mut self, v: bool) -> Self {
        self.off_policy_recent = v;
        self
    }

    /// The number of recent transitions used for training.
    pub fn off_policy_count(mut self, v: usize) -> Self {
        self.off_policy_count = v;
        self
    }

    /// If `true`, the discriminator is not updated.
    pub fn freeze_reward(mut self, v: bool) -> Self {
        self.freeze_reward = v;
        self
    }

    /// Discount factor of the policy, used for reward normalization.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Random seed.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Device.
    pub fn device(mut self, device: tch::Device) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Constructs [`GailConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of GAIL discriminator from {:?}", path_);
        Ok(b)
    }

    /// Saves [`GailConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of GAIL discriminator into {:?}", path_);
        Ok(())
    }
}
