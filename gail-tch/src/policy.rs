//! Interface to the policy collaborator.
use crate::model::SubModel;
use serde::{Deserialize, Serialize};
use tch::{Kind, Tensor};

/// Action space of the environment.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub enum ActionSpace {
    /// `n` discrete actions, given as indices.
    Discrete(i64),

    /// Real-valued actions of the given dimension.
    Continuous(i64),
}

impl ActionSpace {
    /// Dimension of the action representation fed to networks.
    pub fn dim(&self) -> i64 {
        match self {
            Self::Discrete(n) => *n,
            Self::Continuous(d) => *d,
        }
    }

    /// Converts actions to the representation fed to networks.
    ///
    /// Discrete actions are one-hot encoded; continuous actions are cast to float.
    pub fn action_repr(&self, action: &Tensor) -> Tensor {
        match self {
            Self::Discrete(n) => action
                .to_kind(Kind::Int64)
                .view([-1])
                .one_hot(*n)
                .to_kind(Kind::Float),
            Self::Continuous(_) => action.to_kind(Kind::Float),
        }
    }
}

/// What the discriminator needs to know about the policy.
pub trait PolicyInfo {
    /// Observation encoder shared in architecture with the policy.
    type Base: SubModel<Input = Tensor, Output = Tensor>;

    /// Shape of a single observation.
    fn obs_shape(&self) -> Vec<i64>;

    /// Action space of the policy.
    fn action_space(&self) -> ActionSpace;

    /// Configuration of a base encoder for observations of `obs_shape`.
    fn base_net_config(&self, obs_shape: &[i64]) -> <Self::Base as SubModel>::Config;
}
