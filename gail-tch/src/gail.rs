//! Discriminator of generative adversarial imitation learning.
mod base;
mod config;
mod discriminator;
mod penalty;
mod render;
mod spectral_norm;
pub use base::{compute_discrim_loss, discrim_reward, GailDiscrim};
pub use config::{default_head, DiscriminatorConfig, GailConfig, HeadLayer, RewardType};
pub use discriminator::Discriminator;
pub use penalty::wass_grad_pen;
pub use render::DiscrimRenderHook;
pub use spectral_norm::{DiscrimLinear, SpectralNorm};
