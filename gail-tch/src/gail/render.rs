//! Discriminator output drawn on rendered frames.
use super::Discriminator;
use crate::{model::SubModel, util::scalar, ActionSpace};
use anyhow::Result;
use gail_core::{Frame, RenderHook, RenderStep};
use std::rc::Rc;
use tch::{Device, Kind, Tensor};

/// Appends `Discrim: <logit>` and `Reward: <env reward>` to frames.
///
/// The hook shares the discriminator with [`GailDiscrim`](super::GailDiscrim)
/// and only reads it: the network runs in inference mode without gradient.
pub struct DiscrimRenderHook<B> {
    discrim: Rc<Discriminator<B>>,
    action_space: ActionSpace,
    obs_shape: Vec<i64>,
    device: Device,
}

impl<B> DiscrimRenderHook<B>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
{
    pub(super) fn new(
        discrim: Rc<Discriminator<B>>,
        action_space: ActionSpace,
        obs_shape: Vec<i64>,
        device: Device,
    ) -> Self {
        Self {
            discrim,
            action_space,
            obs_shape,
            device,
        }
    }

    /// The logit of a single (observation, action) pair.
    pub fn disc_val(&self, obs: &[f32], action: &[f32]) -> Result<f32> {
        let mut shape = vec![1];
        shape.extend_from_slice(&self.obs_shape);

        let d = tch::no_grad(|| {
            let obs = Tensor::from_slice(obs).to(self.device).view(shape.as_slice());
            let action = Tensor::from_slice(action).to(self.device).unsqueeze(0);
            let action = self.action_space.action_repr(&action.to_kind(Kind::Float));
            self.discrim.forward_t(&obs, &action, false)
        });
        scalar(&d)
    }
}

impl<B> RenderHook for DiscrimRenderHook<B>
where
    B: SubModel<Input = Tensor, Output = Tensor>,
{
    fn mod_render_frame(&self, frame: &mut dyn Frame, step: &RenderStep) -> Result<()> {
        let disc_val = match step.cur_action {
            Some(action) => self.disc_val(step.cur_obs, action)?,
            None => 0.0,
        };
        let reward = step.cur_reward.unwrap_or(0.0);

        frame.append_text(&[
            format!("Discrim: {:.3}", disc_val),
            format!("Reward: {:.3}", reward),
        ]);
        Ok(())
    }
}
