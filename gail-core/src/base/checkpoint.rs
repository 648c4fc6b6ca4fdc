//! Keyed storage of model and optimizer states.
use crate::error::GailError;
use anyhow::Result;
use log::trace;
use std::collections::HashMap;

/// Stores states under string keys.
pub trait Checkpointer {
    /// The stored state.
    type State;

    /// Stores `state` under `name`, replacing a previous state.
    fn save_key(&mut self, name: &str, state: Self::State) -> Result<()>;

    /// Retrieves the state stored under `name`.
    fn get_key(&self, name: &str) -> Result<Self::State>;
}

/// Components saved to and restored from a [`Checkpointer`].
pub trait Persistent<C: Checkpointer> {
    /// Saves the component.
    fn save(&self, checkpointer: &mut C) -> Result<()>;

    /// Restores the parameters needed for inference.
    fn load(&mut self, checkpointer: &C) -> Result<()>;

    /// Restores the full training state, including optimizer state.
    fn load_resume(&mut self, checkpointer: &C) -> Result<()> {
        self.load(checkpointer)
    }
}

/// A checkpointer holding states in memory.
#[derive(Debug, Clone)]
pub struct MemoryCheckpointer<S> {
    states: HashMap<String, S>,
}

impl<S> Default for MemoryCheckpointer<S> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
        }
    }
}

impl<S> MemoryCheckpointer<S> {
    /// Creates an empty checkpointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of the stored states.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.states.keys()
    }
}

impl<S: Clone> Checkpointer for MemoryCheckpointer<S> {
    type State = S;

    fn save_key(&mut self, name: &str, state: S) -> Result<()> {
        trace!("Save state {}", name);
        self.states.insert(name.to_string(), state);
        Ok(())
    }

    fn get_key(&self, name: &str) -> Result<S> {
        match self.states.get(name) {
            Some(s) => Ok(s.clone()),
            None => Err(GailError::CheckpointKeyNotFound(name.to_string()).into()),
        }
    }
}
