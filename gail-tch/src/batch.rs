use tch::{Device, Tensor};

/// A batch of transitions.
///
/// Expert and agent batches share this layout. The first axis of every
/// tensor is the batch axis.
#[derive(Debug)]
pub struct TransitionBatch {
    /// States, possibly normalized by the environment.
    pub state: Tensor,

    /// Actions.
    pub action: Tensor,

    /// Next states.
    pub next_state: Option<Tensor>,

    /// 1.0 where the transition ends a trajectory.
    pub done: Option<Tensor>,

    /// Unnormalized states, kept when the environment is asked to return raw observations.
    pub raw_state: Option<Tensor>,

    /// Unnormalized auxiliary states, taking precedence over `raw_state`.
    pub other_raw_state: Option<Tensor>,
}

impl TransitionBatch {
    /// Creates a batch of states and actions.
    pub fn new(state: Tensor, action: Tensor) -> Self {
        Self {
            state,
            action,
            next_state: None,
            done: None,
            raw_state: None,
            other_raw_state: None,
        }
    }

    /// Sets next states.
    pub fn next_state(mut self, v: Tensor) -> Self {
        self.next_state = Some(v);
        self
    }

    /// Sets done flags.
    pub fn done(mut self, v: Tensor) -> Self {
        self.done = Some(v);
        self
    }

    /// Sets raw states.
    pub fn raw_state(mut self, v: Tensor) -> Self {
        self.raw_state = Some(v);
        self
    }

    /// Sets other raw states.
    pub fn other_raw_state(mut self, v: Tensor) -> Self {
        self.other_raw_state = Some(v);
        self
    }

    /// The number of transitions.
    pub fn len(&self) -> usize {
        self.state.size()[0] as _
    }

    /// Returns `true` if the batch has no transition.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selects transitions by indices along the batch axis.
    pub fn index_select(&self, ixs: &Tensor) -> Self {
        let sel = |t: &Tensor| t.index_select(0, &ixs.to(t.device()));
        Self {
            state: sel(&self.state),
            action: sel(&self.action),
            next_state: self.next_state.as_ref().map(sel),
            done: self.done.as_ref().map(sel),
            raw_state: self.raw_state.as_ref().map(sel),
            other_raw_state: self.other_raw_state.as_ref().map(sel),
        }
    }

    /// Moves tensors to `device`.
    pub fn to(&self, device: Device) -> Self {
        let to = |t: &Tensor| t.to(device);
        Self {
            state: to(&self.state),
            action: to(&self.action),
            next_state: self.next_state.as_ref().map(to),
            done: self.done.as_ref().map(to),
            raw_state: self.raw_state.as_ref().map(to),
            other_raw_state: self.other_raw_state.as_ref().map(to),
        }
    }

    /// The state fed to the discriminator when environment normalization is bypassed.
    pub(crate) fn raw_obs(&self) -> Option<&Tensor> {
        self.other_raw_state.as_ref().or(self.raw_state.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tch::Kind;

    #[test]
    fn test_index_select_and_raw_obs() {
        let state = Tensor::arange(4, (Kind::Float, Device::Cpu)).view([4, 1]);
        let action = Tensor::zeros(&[4, 2], (Kind::Float, Device::Cpu));
        let batch = TransitionBatch::new(state, action).raw_state(Tensor::ones(&[4, 1], (Kind::Float, Device::Cpu)));
        assert!(batch.raw_obs().is_some());

        let ixs = Tensor::from_slice(&[3i64, 1]);
        let sub = batch.index_select(&ixs);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.action.size(), vec![2, 2]);
        assert_eq!(sub.state.double_value(&[0, 0]), 3.0);
        assert!(sub.next_state.is_none());

        let sub = sub.other_raw_state(Tensor::zeros(&[2, 1], (Kind::Float, Device::Cpu)));
        assert_eq!(sub.raw_obs().unwrap().double_value(&[0, 0]), 0.0);
    }
}
