//! Base encoders of observations.
mod base;
mod config;
mod flatten;
pub use base::Mlp;
pub use config::{FlattenConfig, MlpConfig};
pub use flatten::Flatten;
