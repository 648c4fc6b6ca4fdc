//! Normalization of observations.
use crate::util::to_vec_f32;
use anyhow::Result;
use gail_core::RunningMeanStd;
use std::{cell::RefCell, rc::Rc};
use tch::Tensor;

/// Normalizes observations with statistics maintained elsewhere.
///
/// The discriminator applies the filter of the environment to expert states,
/// so both kinds of states are on the same scale. Filtering never updates
/// the statistics.
pub trait ObsFilter {
    /// Returns filtered observations of the same shape as `obs`.
    fn filter(&self, obs: &Tensor) -> Tensor;
}

impl<F: ObsFilter> ObsFilter for Rc<RefCell<F>> {
    fn filter(&self, obs: &Tensor) -> Tensor {
        self.borrow().filter(obs)
    }
}

/// Observation normalization with running statistics.
///
/// Observations are mapped to `clip((obs - mean) / sqrt(var + epsilon), -clip, clip)`.
#[derive(Debug, Clone)]
pub struct RunningObsFilter {
    rms: RunningMeanStd,
    clip: f64,
    epsilon: f64,
}

impl RunningObsFilter {
    /// Creates a filter of observations with `dim` elements.
    pub fn new(dim: usize) -> Self {
        Self {
            rms: RunningMeanStd::new(dim),
            clip: 10.0,
            epsilon: 1e-8,
        }
    }

    /// Sets the clipping range.
    pub fn clip(mut self, v: f64) -> Self {
        self.clip = v;
        self
    }

    /// Updates the statistics with a batch of observations `[batch, ...]`.
    pub fn update(&mut self, obs: &Tensor) -> Result<()> {
        self.rms.update(&to_vec_f32(obs)?)?;
        Ok(())
    }

    /// The running statistics.
    pub fn stats(&self) -> &RunningMeanStd {
        &self.rms
    }
}

impl ObsFilter for RunningObsFilter {
    fn filter(&self, obs: &Tensor) -> Tensor {
        let device = obs.device();
        let to_tensor = |v: &[f64]| {
            let v = v.iter().map(|&x| x as f32).collect::<Vec<_>>();
            Tensor::from_slice(&v).to(device)
        };
        let mean = to_tensor(self.rms.mean());
        let std = (to_tensor(self.rms.var()) + self.epsilon).sqrt();
        let shape = obs.size();

        let x = obs.to_kind(tch::Kind::Float).flatten(1, -1);
        ((x - mean) / std)
            .clamp(-self.clip, self.clip)
            .view(shape.as_slice())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tch::{Device, Kind};

    #[test]
    fn test_filter_does_not_update() {
        let mut filter = RunningObsFilter::new(2).clip(5.0);
        let obs = Tensor::from_slice(&[1f32, 100.0, 3.0, 100.0]).view([2, 2]);
        filter.update(&obs).unwrap();
        let count = filter.stats().count();

        let y = filter.filter(&obs);
        assert_eq!(filter.stats().count(), count);
        assert_eq!(y.size(), vec![2, 2]);
        assert!((y.double_value(&[0, 0]) + 1.0).abs() < 1e-2);
        assert!((y.double_value(&[1, 0]) - 1.0).abs() < 1e-2);

        let far = Tensor::full(&[1, 2], 1e6, (Kind::Float, Device::Cpu));
        assert_eq!(filter.filter(&far).double_value(&[0, 0]), 5.0);
    }

    #[test]
    fn test_shared_filter() {
        let filter = Rc::new(RefCell::new(RunningObsFilter::new(1)));
        let view: Box<dyn ObsFilter> = Box::new(filter.clone());
        filter
            .borrow_mut()
            .update(&Tensor::from_slice(&[2f32, 4.0]).view([2, 1]))
            .unwrap();

        let y = view.filter(&Tensor::from_slice(&[3f32]).view([1, 1]));
        assert!(y.double_value(&[0, 0]).abs() < 1e-2);
    }
}
