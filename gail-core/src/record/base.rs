//! Key-value container of training metrics.
use crate::error::GailError;
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically a loss.
    Scalar(f32),

    /// A text value.
    String(String),
}

/// A container of metrics keyed by name.
///
/// Loss values of the discriminator are summed with [`Record::accumulate`]
/// over the processed batches and averaged with [`Record::scale_scalars`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        let mut map = HashMap::new();
        map.insert(name.into(), RecordValue::Scalar(value));
        Self(map)
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Adds `v` to the scalar stored under `k`.
    ///
    /// A missing key, or a key holding a non-scalar value, starts from zero.
    pub fn accumulate(&mut self, k: impl Into<String>, v: f32) {
        let entry = self.0.entry(k.into()).or_insert(RecordValue::Scalar(0.0));
        match entry {
            RecordValue::Scalar(acc) => *acc += v,
            other => *other = RecordValue::Scalar(v),
        }
    }

    /// Multiplies every scalar value by `factor`.
    pub fn scale_scalars(&mut self, factor: f32) {
        for v in self.0.values_mut() {
            if let RecordValue::Scalar(x) = v {
                *x *= factor;
            }
        }
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record holds the given key.
    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    /// Merges two records, consuming both.
    ///
    /// Values of `record` overwrite values of `self` with the same key.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, GailError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(GailError::RecordValueTypeError("Scalar".to_string())),
            None => Err(GailError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, GailError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(GailError::RecordValueTypeError("String".to_string())),
            None => Err(GailError::RecordKeyError(k.to_string())),
        }
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_accumulate_and_scale() {
        let mut record = Record::empty();
        record.accumulate("expert_loss", 0.5);
        record.accumulate("expert_loss", 1.5);
        record.accumulate("agent_loss", 3.0);
        record.insert("tag", RecordValue::String("gail".into()));
        record.scale_scalars(0.5);

        assert_eq!(record.get_scalar("expert_loss").unwrap(), 1.0);
        assert_eq!(record.get_scalar("agent_loss").unwrap(), 1.5);
        assert_eq!(record.get_string("tag").unwrap(), "gail");
    }

    #[test]
    fn test_get_errors() {
        let record = Record::from_slice(&[("tag", RecordValue::String("x".into()))]);
        assert!(matches!(
            record.get_scalar("missing"),
            Err(GailError::RecordKeyError(_))
        ));
        assert!(matches!(
            record.get_scalar("tag"),
            Err(GailError::RecordValueTypeError(_))
        ));
    }

    #[test]
    fn test_merge_overwrites() {
        let r1 = Record::from_slice(&[
            ("a", RecordValue::Scalar(1.0)),
            ("b", RecordValue::Scalar(2.0)),
        ]);
        let r2 = Record::from_scalar("b", 3.0);
        let r = r1.merge(r2);

        assert_eq!(r.len(), 2);
        assert_eq!(r.get_scalar("a").unwrap(), 1.0);
        assert_eq!(r.get_scalar("b").unwrap(), 3.0);
    }
}
