//! Writes GAIL training metrics to TensorBoard event files.
use gail_core::record::{Record, RecordValue, Recorder};
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
///
/// Scalars are stored under `data/<key>`, at the step held in the record
/// under the step key (`n_updates` by default).
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
    prefix: String,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "n_updates".to_string(),
            prefix: "data/".to_string(),
            ignore_unsupported_value: true,
        }
    }

    /// Construct a [`TensorboardRecorder`] with checking unsupported record value.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            ignore_unsupported_value: false,
            ..Self::new(logdir)
        }
    }

    /// Sets the key of the step value in records.
    pub fn step_key(mut self, step_key: impl Into<String>) -> Self {
        self.step_key = step_key.into();
        self
    }

    /// Flushes pending events to disk.
    pub fn flush(&mut self) {
        self.writer.flush();
    }

    fn tag(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// Only [RecordValue::Scalar] is written. A record without the step key is skipped.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without scalar step key {} is skipped", self.step_key);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k == self.step_key {
                continue;
            }
            match v {
                RecordValue::Scalar(v) => {
                    let tag = self.tag(k);
                    self.writer.add_scalar(&tag, *v, step)
                }
                _ => {
                    if !self.ignore_unsupported_value {
                        panic!("Unsupported value: {:?}", (k, v));
                    }
                }
            };
        }
    }
}
