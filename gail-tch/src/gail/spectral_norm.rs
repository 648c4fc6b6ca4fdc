//! Spectral normalization of linear layers.
use tch::{nn, nn::Module, Kind, Tensor};

const EPS: f64 = 1e-12;

fn normalize(x: &Tensor) -> Tensor {
    x / (x.norm() + EPS)
}

/// Power-iteration estimate of the largest singular value of a weight matrix.
///
/// The vectors `u` and `v` are stored as non-trainable variables named
/// `weight_u` and `weight_v`, so they are saved with the network.
pub struct SpectralNorm {
    u: Tensor,
    v: Tensor,
}

impl SpectralNorm {
    /// Creates the estimate for a weight of shape `[out_dim, in_dim]`.
    pub fn new(p: &nn::Path, out_dim: i64, in_dim: i64) -> Self {
        let mut u = p.zeros_no_train("weight_u", &[out_dim]);
        let mut v = p.zeros_no_train("weight_v", &[in_dim]);
        tch::no_grad(|| {
            u.copy_(&normalize(&Tensor::randn(&[out_dim], (Kind::Float, p.device()))));
            v.copy_(&normalize(&Tensor::randn(&[in_dim], (Kind::Float, p.device()))));
        });

        Self { u, v }
    }

    /// Updates `u` and `v` with one step of power iteration on `weight`.
    fn power_iteration(&self, weight: &Tensor) {
        tch::no_grad(|| {
            let w = weight.detach();
            let v = normalize(&w.tr().mv(&self.u));
            let u = normalize(&w.mv(&v));
            self.v.shallow_clone().copy_(&v);
            self.u.shallow_clone().copy_(&u);
        });
    }

    /// `sigma = u^T W v`, differentiable with respect to `weight`.
    pub fn sigma(&self, weight: &Tensor) -> Tensor {
        // Copies keep the graph valid when u and v are updated by a later forward pass.
        let u = self.u.detach().copy();
        let v = self.v.detach().copy();
        u.dot(&weight.mv(&v))
    }

    /// Returns `weight / sigma`.
    ///
    /// In training mode one power iteration runs before `sigma` is computed.
    pub fn normalize_weight(&self, weight: &Tensor, train: bool) -> Tensor {
        if train {
            self.power_iteration(weight);
        }
        weight / self.sigma(weight)
    }
}

/// A linear layer of the discriminator, spectrally normalized or not.
///
/// The choice is made at construction and does not change afterwards.
pub struct DiscrimLinear {
    linear: nn::Linear,
    sn: Option<SpectralNorm>,
}

impl DiscrimLinear {
    /// Creates a layer with variables `weight`, `bias` and, if `spectral_norm`,
    /// `weight_u` and `weight_v` under `p`.
    pub fn new(p: &nn::Path, in_dim: i64, out_dim: i64, spectral_norm: bool) -> Self {
        let linear = nn::linear(p, in_dim, out_dim, Default::default());
        let sn = match spectral_norm {
            true => Some(SpectralNorm::new(p, out_dim, in_dim)),
            false => None,
        };

        Self { linear, sn }
    }

    /// Returns `true` if the layer is spectrally normalized.
    pub fn is_spectral_norm(&self) -> bool {
        self.sn.is_some()
    }

    /// Forward computation in training (`train = true`) or inference mode.
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        match &self.sn {
            None => self.linear.forward(xs),
            Some(sn) => {
                let ws = sn.normalize_weight(&self.linear.ws, train);
                xs.linear(&ws, self.linear.bs.as_ref())
            }
        }
    }
}
