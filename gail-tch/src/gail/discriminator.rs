//! Discriminator network.
use super::{DiscrimLinear, DiscriminatorConfig, HeadLayer};
use crate::model::SubModel;
use anyhow::Result;
use gail_core::error::GailError;
use log::debug;
use tch::{nn::VarStore, Device, Tensor};

enum HeadOp {
    Linear(DiscrimLinear),
    Tanh,
    Relu,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Maps (state, action) pairs to logits of being expert.
///
/// ```mermaid
/// graph LR
///     S[state]-->B[base]
///     B-->C((cat))
///     A[action]-.->|action_input|C
///     C-->I[inject + tanh]
///     I-->H[head]
///     H-->L[logit]
/// ```
///
/// Variables live in a single [`VarStore`] under three paths:
/// * `base`: the observation encoder `B`,
/// * `inject`: a linear layer followed by `tanh`, fed with the encoded state
///   and, if `action_input`, the action,
/// * `head`: the head layers, indexed by position.
///
/// The output has shape `[batch, 1]`.
pub struct Discriminator<B> {
    base: B,
    inject: DiscrimLinear,
    head: Vec<HeadOp>,
    action_input: bool,
    device: Device,
}

impl<B> Discriminator<B>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
{
    /// Builds the network.
    ///
    /// `base_out_dim` is the output dimension of the encoder built from
    /// `base_config`, and `action_dim` the dimension of the action representation.
    pub fn build(
        var_store: &VarStore,
        base_config: B::Config,
        base_out_dim: i64,
        action_dim: i64,
        config: &DiscriminatorConfig,
    ) -> Result<Self> {
        let root = var_store.root();
        let sn = config.use_spectral_norm;
        let base = B::build(&(&root / "base"), base_config);

        let in_dim = match config.action_input {
            true => base_out_dim + action_dim,
            false => base_out_dim,
        };
        let inject = DiscrimLinear::new(&(&root / "inject"), in_dim, config.hidden_dim, sn);

        let p = &root / "head";
        let mut dim = config.hidden_dim;
        let mut head = vec![];
        for (i, layer) in config.head_layers().iter().enumerate() {
            let op = match layer {
                HeadLayer::Linear { out_dim } => {
                    let l = DiscrimLinear::new(&(&p / i), dim, *out_dim, sn);
                    dim = *out_dim;
                    HeadOp::Linear(l)
                }
                HeadLayer::Tanh => HeadOp::Tanh,
                HeadLayer::Relu => HeadOp::Relu,
            };
            head.push(op);
        }
        if dim != 1 {
            return Err(GailError::DimensionMismatch {
                expected: 1,
                actual: dim as _,
            }
            .into());
        }

        debug!(
            "Discriminator: input dim {}, hidden dim {}, {} head layers, spectral norm {}",
            in_dim,
            config.hidden_dim,
            head.len(),
            sn
        );

        Ok(Self {
            base,
            inject,
            head,
            action_input: config.action_input,
            device: var_store.device(),
        })
    }

    /// Returns `true` if actions are fed to the network.
    pub fn action_input(&self) -> bool {
        self.action_input
    }

    /// Computes logits.
    ///
    /// `action` is ignored unless the network takes actions. In training
    /// mode spectrally normalized layers update their power-iteration vectors.
    pub fn forward_t(&self, state: &Tensor, action: &Tensor, train: bool) -> Tensor {
        let xs = self.base.forward(&state.to(self.device));
        let xs = match self.action_input {
            true => Tensor::cat(&[xs, action.to(self.device)], -1),
            false => xs,
        };

        let mut xs = self.inject.forward_t(&xs, train).tanh();
        for op in self.head.iter() {
            xs = match op {
                HeadOp::Linear(l) => l.forward_t(&xs, train),
                HeadOp::Tanh => xs.tanh(),
                HeadOp::Relu => xs.relu(),
            };
        }
        xs
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mlp::{Flatten, FlattenConfig, Mlp, MlpConfig};
    use tch::Kind;

    #[test]
    fn test_output_shape_and_partition() {
        let vs = VarStore::new(Device::Cpu);
        let base_config = MlpConfig::new(4, vec![8], 6, true);
        let config = DiscriminatorConfig::default().hidden_dim(16).action_input(true);
        let d = Discriminator::<Mlp>::build(&vs, base_config, 6, 2, &config).unwrap();

        let state = Tensor::zeros(&[5, 4], (Kind::Float, Device::Cpu));
        let action = Tensor::zeros(&[5, 2], (Kind::Float, Device::Cpu));
        assert_eq!(d.forward_t(&state, &action, false).size(), vec![5, 1]);

        let vars = vs.variables();
        assert_eq!(vars["inject.weight"].size(), vec![16, 8]);
        assert_eq!(vars["head.0.weight"].size(), vec![16, 16]);
        assert_eq!(vars["head.2.weight"].size(), vec![1, 16]);
        assert!(vars.contains_key("base.ln0.weight"));
        assert!(!vars.keys().any(|k| k.ends_with("weight_u")));
    }

    #[test]
    fn test_action_ignored_without_action_input() {
        let vs = VarStore::new(Device::Cpu);
        let config = DiscriminatorConfig::default().hidden_dim(8);
        let d = Discriminator::<Flatten>::build(&vs, FlattenConfig::new(&[3]), 3, 2, &config)
            .unwrap();
        assert_eq!(vs.variables()["inject.weight"].size(), vec![8, 3]);

        let state = Tensor::ones(&[2, 3], (Kind::Float, Device::Cpu));
        let a1 = Tensor::zeros(&[2, 2], (Kind::Float, Device::Cpu));
        let a2 = Tensor::ones(&[2, 2], (Kind::Float, Device::Cpu));
        let diff = (d.forward_t(&state, &a1, false) - d.forward_t(&state, &a2, false))
            .abs()
            .sum(Kind::Float);
        assert_eq!(diff.double_value(&[]), 0.0);
    }

    #[test]
    fn test_spectral_norm_wraps_inject_and_head_only() {
        let vs = VarStore::new(Device::Cpu);
        let config = DiscriminatorConfig::default()
            .hidden_dim(8)
            .use_spectral_norm(true);
        let _ = Discriminator::<Mlp>::build(&vs, MlpConfig::new(3, vec![], 4, false), 4, 1, &config)
            .unwrap();

        let vars = vs.variables();
        assert!(vars.contains_key("inject.weight_u"));
        assert!(vars.contains_key("head.0.weight_v"));
        assert!(vars.contains_key("head.2.weight_u"));
        assert!(!vars.keys().any(|k| k.starts_with("base") && k.ends_with("weight_u")));
    }

    #[test]
    fn test_head_must_output_one_value() {
        let vs = VarStore::new(Device::Cpu);
        let config = DiscriminatorConfig::default().head(vec![HeadLayer::Linear { out_dim: 2 }]);
        let res = Discriminator::<Flatten>::build(&vs, FlattenConfig::new(&[3]), 3, 1, &config);
        assert!(res.is_err());
    }
}
