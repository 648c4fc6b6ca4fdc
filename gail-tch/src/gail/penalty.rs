//! Gradient penalty on interpolations of expert and agent inputs.
use tch::{Kind, Tensor};

/// Wasserstein-style gradient penalty `mean((|grad D(x)| - 1)^2)`.
///
/// `x` interpolates expert and agent inputs with a weight drawn uniformly
/// per example; actions are interpolated with the same weight and
/// differentiated too when `action_input` is `true`. Gradients are taken
/// with `create_graph`, so the penalty can be minimized with respect to
/// the parameters of `disc`.
///
/// If the batches differ in size, the leading examples of the larger one are used.
pub fn wass_grad_pen<F>(
    expert_state: &Tensor,
    expert_action: &Tensor,
    agent_state: &Tensor,
    agent_action: &Tensor,
    action_input: bool,
    disc: F,
) -> Tensor
where
    F: Fn(&Tensor, &Tensor) -> Tensor,
{
    let n = expert_state.size()[0].min(agent_state.size()[0]);
    let alpha = Tensor::rand(&[n], (Kind::Float, expert_state.device()));
    let mixup = |expert: &Tensor, agent: &Tensor| {
        let mut shape = vec![1i64; expert.dim()];
        shape[0] = n;
        let alpha = alpha.view(shape.as_slice());
        let expert = expert.narrow(0, 0, n);
        let agent = agent.narrow(0, 0, n);
        (&alpha * expert + (-&alpha + 1.0) * agent)
            .detach()
            .set_requires_grad(true)
    };

    let state = mixup(expert_state, agent_state);
    let (action, inputs) = match action_input {
        true => {
            let action = mixup(expert_action, agent_action);
            let inputs = vec![state.shallow_clone(), action.shallow_clone()];
            (action, inputs)
        }
        false => (expert_action.narrow(0, 0, n), vec![state.shallow_clone()]),
    };

    let d = disc(&state, &action);
    let grads = Tensor::run_backward(&[d.sum(Kind::Float)], inputs.as_slice(), true, true);
    let grads = grads.iter().map(|g| g.flatten(1, -1)).collect::<Vec<_>>();
    let grad = Tensor::cat(grads.as_slice(), 1);

    (grad.norm_scalaropt_dim(2, &[1], false) - 1.0)
        .square()
        .mean(Kind::Float)
}

#[cfg(test)]
mod test {
    use super::*;
    use tch::Device;

    fn linear_disc(w: &Tensor) -> impl Fn(&Tensor, &Tensor) -> Tensor + '_ {
        move |s, _a| s.matmul(w)
    }

    #[test]
    fn test_linear_discriminator() {
        // The gradient of a linear function is its weight everywhere.
        let w = Tensor::from_slice(&[2f32, 0.0]).view([2, 1]);
        let es = Tensor::ones(&[8, 2], (Kind::Float, Device::Cpu));
        let as_ = -Tensor::ones(&[8, 2], (Kind::Float, Device::Cpu));
        let a = Tensor::zeros(&[8, 1], (Kind::Float, Device::Cpu));

        let pen = wass_grad_pen(&es, &a, &as_, &a, false, linear_disc(&w));
        assert!((pen.double_value(&[]) - 1.0).abs() < 1e-5);

        let w = Tensor::from_slice(&[0.6f32, 0.8]).view([2, 1]);
        let pen = wass_grad_pen(&es, &a, &as_, &a, false, linear_disc(&w));
        assert!(pen.double_value(&[]).abs() < 1e-5);
    }

    #[test]
    fn test_action_gradients_included() {
        let es = Tensor::ones(&[4, 1], (Kind::Float, Device::Cpu));
        let as_ = Tensor::zeros(&[6, 1], (Kind::Float, Device::Cpu));
        let ea = Tensor::ones(&[4, 1], (Kind::Float, Device::Cpu));
        let aa = Tensor::zeros(&[6, 1], (Kind::Float, Device::Cpu));
        // |grad| = |(1, 1)| = sqrt(2)
        let disc = |s: &Tensor, a: &Tensor| s + a;

        let pen = wass_grad_pen(&es, &ea, &as_, &aa, true, disc);
        let expected = (2f64.sqrt() - 1.0).powi(2);
        assert!((pen.double_value(&[]) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_penalty_is_differentiable() {
        let w = Tensor::from_slice(&[2f32, 0.0])
            .view([2, 1])
            .set_requires_grad(true);
        let es = Tensor::ones(&[3, 2], (Kind::Float, Device::Cpu));
        let a = Tensor::zeros(&[3, 1], (Kind::Float, Device::Cpu));
        let pen = wass_grad_pen(&es, &a, &es.zeros_like(), &a, false, |s, _| s.matmul(&w));
        pen.backward();
        // d/dw0 (|w| - 1)^2 = 2 (|w| - 1) w0 / |w| = 2
        assert!((w.grad().double_value(&[0, 0]) - 2.0).abs() < 1e-4);
    }
}
