use anyhow::Result;
use gail_core::error::GailError;
use log::trace;
use std::collections::HashMap;
use tch::{nn::VarStore, Device::Cpu, Tensor};

/// Named tensors on CPU, the unit of state stored in checkpoints.
#[derive(Debug, Default)]
pub struct NamedTensors {
    pub named_tensors: HashMap<String, Tensor>,
}

impl NamedTensors {
    /// Copy data of VarStore to CPU.
    pub fn copy_from(vs: &VarStore) -> Self {
        let src = vs.variables();

        tch::no_grad(|| NamedTensors {
            named_tensors: src
                .iter()
                .map(|(k, v)| (k.clone(), v.detach().to(Cpu).copy()))
                .collect(),
        })
    }

    /// Copy named tensors to [VarStore].
    ///
    /// Every variable of `vs` must be in `self`; extra entries are ignored.
    pub fn copy_to(&self, vs: &mut VarStore) -> Result<()> {
        let mut dest = vs.variables();

        tch::no_grad(|| -> Result<()> {
            for (name, var) in dest.iter_mut() {
                let src = self
                    .named_tensors
                    .get(name)
                    .ok_or_else(|| GailError::CheckpointKeyNotFound(name.clone()))?;
                var.copy_(src);
                trace!("Load variable {}", name);
            }
            Ok(())
        })
    }

    /// Inserts a tensor.
    pub fn insert(&mut self, name: impl Into<String>, t: Tensor) {
        self.named_tensors.insert(name.into(), t);
    }

    /// Gets the tensor stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.named_tensors.get(name)
    }

    /// The number of tensors.
    pub fn len(&self) -> usize {
        self.named_tensors.len()
    }

    /// Returns `true` if there is no tensor.
    pub fn is_empty(&self) -> bool {
        self.named_tensors.is_empty()
    }

    /// Returns an iterator over the named tensors.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Tensor)> {
        self.named_tensors.iter()
    }
}

impl Clone for NamedTensors {
    fn clone(&self) -> Self {
        let src = &self.named_tensors;

        tch::no_grad(|| NamedTensors {
            named_tensors: src
                .iter()
                .map(|(k, v)| (k.clone(), v.detach().to(Cpu).copy()))
                .collect(),
        })
    }
}

impl From<Vec<(String, Tensor)>> for NamedTensors {
    fn from(v: Vec<(String, Tensor)>) -> Self {
        Self {
            named_tensors: v.into_iter().collect(),
        }
    }
}
