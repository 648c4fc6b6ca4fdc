//! Records of metrics emitted by the reward and policy update stages.
//!
//! The discriminator trainer accumulates its losses in a [`Record`], which is
//! merged with the record of the policy updater by the composition
//! controller and handed to a [`Recorder`].
//!
//! ```rust
//! use gail_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.accumulate("discrim_loss", 1.2);
//! record.accumulate("discrim_loss", 0.8);
//! record.scale_scalars(0.5);
//! assert_eq!(record.get_scalar("discrim_loss").unwrap(), 1.0);
//! record.insert("reward_type", RecordValue::String("airl".to_string()));
//! ```
mod base;
mod buffered_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::Recorder;
