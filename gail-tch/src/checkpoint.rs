//! Checkpoints stored in a directory.
use crate::util::NamedTensors;
use anyhow::{Context, Result};
use gail_core::{error::GailError, Checkpointer};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tch::Tensor;

/// Stores each key as a file `<dir>/<key>.pt` written with [`Tensor::save_multi`].
pub struct DirCheckpointer {
    dir: PathBuf,
}

impl DirCheckpointer {
    /// Creates a checkpointer writing into `dir`. The directory is created if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.pt", name))
    }
}

impl Checkpointer for DirCheckpointer {
    type State = NamedTensors;

    fn save_key(&mut self, name: &str, state: NamedTensors) -> Result<()> {
        let path = self.path(name);
        let named = state.iter().collect::<Vec<_>>();
        Tensor::save_multi(&named, &path)
            .with_context(|| format!("Failed to save {:?}", path))?;
        info!("Save {} to {:?}", name, path);
        Ok(())
    }

    fn get_key(&self, name: &str) -> Result<NamedTensors> {
        let path = self.path(name);
        if !path.exists() {
            return Err(GailError::CheckpointKeyNotFound(name.to_string()).into());
        }
        let named = Tensor::load_multi(&path)
            .with_context(|| format!("Failed to load {:?}", path))?;
        info!("Load {} from {:?}", name, path);
        Ok(named.into())
    }
}
