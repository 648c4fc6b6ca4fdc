//! Optimizers.
use crate::util::NamedTensors;
use anyhow::Result;
use gail_core::error::GailError;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tch::{nn::VarStore, Tensor};

const STEP_KEY: &str = "step";

/// Configures an optimizer for training the discriminator.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 1e-4 }
    }
}

impl OptimizerConfig {
    /// Constructs an optimizer of the trainable variables in `vs`.
    pub fn build(&self, vs: &VarStore) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::Adam { lr } => Ok(Optimizer::Adam(Adam::new(vs, *lr))),
        }
    }

    /// The learning rate.
    pub fn lr(&self) -> f64 {
        match self {
            OptimizerConfig::Adam { lr } => *lr,
        }
    }
}

/// Optimizers.
///
/// Unlike [tch::nn::Optimizer], the internal state of the optimizer can be
/// saved and restored, which is needed for resuming training.
///
/// [tch::nn::Optimizer]: https://docs.rs/tch/0.16.0/tch/nn/struct.Optimizer.html
pub enum Optimizer {
    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Applies a backward step pass.
    pub fn backward_step(&mut self, loss: &Tensor) {
        match self {
            Self::Adam(opt) => opt.backward_step(loss),
        }
    }

    /// Returns the state of the optimizer.
    pub fn state_dict(&self) -> NamedTensors {
        match self {
            Self::Adam(opt) => opt.state_dict(),
        }
    }

    /// Restores the state of the optimizer.
    pub fn load_state_dict(&mut self, state: &NamedTensors) -> Result<()> {
        match self {
            Self::Adam(opt) => opt.load_state_dict(state),
        }
    }
}

/// Adam with the default coefficients `beta1 = 0.9`, `beta2 = 0.999` and `eps = 1e-8`.
///
/// Variables are the trainable variables of the [`VarStore`] given at
/// construction; non-trainable ones, like power-iteration vectors of
/// spectral normalization, are left untouched.
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    step: i64,
    vars: Vec<(String, Tensor)>,
    exp_avg: HashMap<String, Tensor>,
    exp_avg_sq: HashMap<String, Tensor>,
}

impl Adam {
    fn new(vs: &VarStore, lr: f64) -> Self {
        let mut vars = vs
            .variables()
            .into_iter()
            .filter(|(_, v)| v.requires_grad())
            .collect::<Vec<_>>();
        vars.sort_by(|a, b| a.0.cmp(&b.0));

        let exp_avg = vars
            .iter()
            .map(|(k, v)| (k.clone(), v.zeros_like()))
            .collect();
        let exp_avg_sq = vars
            .iter()
            .map(|(k, v)| (k.clone(), v.zeros_like()))
            .collect();

        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            step: 0,
            vars,
            exp_avg,
            exp_avg_sq,
        }
    }

    fn zero_grad(&mut self) {
        for (_, var) in self.vars.iter_mut() {
            var.zero_grad();
        }
    }

    fn backward_step(&mut self, loss: &Tensor) {
        self.zero_grad();
        loss.backward();
        self.step();
    }

    fn step(&mut self) {
        self.step += 1;
        let bc1 = 1.0 - self.beta1.powi(self.step as i32);
        let bc2 = 1.0 - self.beta2.powi(self.step as i32);
        let (beta1, beta2, lr, eps) = (self.beta1, self.beta2, self.lr, self.eps);

        tch::no_grad(|| {
            for (name, var) in self.vars.iter_mut() {
                let grad = var.grad();
                if !grad.defined() {
                    continue;
                }
                // Both maps are built from `vars`.
                let (m, v) = match (self.exp_avg.get_mut(name), self.exp_avg_sq.get_mut(name)) {
                    (Some(m), Some(v)) => (m, v),
                    _ => continue,
                };
                m.copy_(&(&*m * beta1 + &grad * (1.0 - beta1)));
                v.copy_(&(&*v * beta2 + &grad * &grad * (1.0 - beta2)));

                let denom = (&*v / bc2).sqrt() + eps;
                let update = (&*m / bc1) / denom * lr;
                var.copy_(&(&*var - update));
            }
        });
        trace!("Adam step {}", self.step);
    }

    fn state_dict(&self) -> NamedTensors {
        let mut state = NamedTensors::default();
        state.insert(STEP_KEY, Tensor::from(self.step));
        for (k, m) in self.exp_avg.iter() {
            state.insert(format!("exp_avg.{}", k), m.detach().to(tch::Device::Cpu));
        }
        for (k, v) in self.exp_avg_sq.iter() {
            state.insert(format!("exp_avg_sq.{}", k), v.detach().to(tch::Device::Cpu));
        }
        state
    }

    fn load_state_dict(&mut self, state: &NamedTensors) -> Result<()> {
        let get = |key: String| {
            state
                .get(&key)
                .ok_or(GailError::CheckpointKeyNotFound(key))
        };

        let step = get(STEP_KEY.to_string())?.f_int64_value(&[])?;
        tch::no_grad(|| -> Result<()> {
            for (k, m) in self.exp_avg.iter_mut() {
                m.copy_(get(format!("exp_avg.{}", k))?);
            }
            for (k, v) in self.exp_avg_sq.iter_mut() {
                v.copy_(get(format!("exp_avg_sq.{}", k))?);
            }
            Ok(())
        })?;
        self.step = step;
        Ok(())
    }
}
