//! Settings requested from the environment collaborator.
use anyhow::Result;

/// A rendered frame onto which text can be drawn.
pub trait Frame {
    /// Appends lines of text to the frame.
    fn append_text(&mut self, lines: &[String]);
}

impl Frame for Vec<String> {
    fn append_text(&mut self, lines: &[String]) {
        self.extend_from_slice(lines);
    }
}

/// A single environment step as seen by the renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderStep<'a> {
    /// Observation before the step.
    pub cur_obs: &'a [f32],

    /// Action taken, if any.
    pub cur_action: Option<&'a [f32]>,

    /// Reward returned by the environment.
    pub cur_reward: Option<f32>,

    /// Observation after the step.
    pub next_obs: Option<&'a [f32]>,
}

/// Modifies frames while rendering episodes.
pub trait RenderHook {
    /// Draws information about `step` onto `frame`.
    fn mod_render_frame(&self, frame: &mut dyn Frame, step: &RenderStep) -> Result<()>;
}

/// Settings of the environment collaborator.
#[derive(Default)]
pub struct EnvSettings {
    /// If `true`, the environment keeps unnormalized observations in the rollouts.
    pub ret_raw_obs: bool,

    /// Called on every rendered frame.
    pub render_hook: Option<Box<dyn RenderHook>>,
}

impl std::fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSettings")
            .field("ret_raw_obs", &self.ret_raw_obs)
            .field("render_hook", &self.render_hook.is_some())
            .finish()
    }
}

/// Lets a training stage adjust the environment settings.
pub trait ModifyEnvSettings {
    /// Modifies `settings` in place. Does nothing by default.
    #[allow(unused_variables)]
    fn env_settings(&self, settings: &mut EnvSettings) {}
}
