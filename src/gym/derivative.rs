use log::{debug, warn};

use crate::{
    env::Environment,
    error::{Error, Result},
};

/// Default finite difference step size
pub const DEFAULT_STEP_SIZE: f64 = 1e-5;

/// Single-step environment rewarding estimates of a function's derivative at a point
///
/// Every episode is one decision: the agent proposes a derivative estimate and receives
/// `-|estimate - f'(x)|`, where `f'(x)` is the central difference
/// `(f(x + h) - f(x - h)) / 2h`. The state is always the evaluation point.
///
/// Intended for use with a [QTableAgent](crate::algo::tabular::q_table::QTableAgent),
/// with actions mapped through an [ActionGrid](crate::space::ActionGrid).
pub struct DerivativeEnv<F>
where
    F: Fn(f64) -> f64,
{
    function: F,
    point: f64,
    step_size: f64,
    true_derivative: Option<f64>,
    done: bool,
}

impl<F> DerivativeEnv<F>
where
    F: Fn(f64) -> f64,
{
    /// Environment for `function` at `point` with the [default step size](DEFAULT_STEP_SIZE)
    pub fn new(function: F, point: f64) -> Self {
        Self {
            function,
            point,
            step_size: DEFAULT_STEP_SIZE,
            true_derivative: None,
            done: true,
        }
    }

    /// **Errors** if `step_size` is not finite and positive
    pub fn with_step_size(function: F, point: f64, step_size: f64) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(Error::InvalidStepSize(step_size));
        }
        Ok(Self {
            step_size,
            ..Self::new(function, point)
        })
    }

    pub fn point(&self) -> f64 {
        self.point
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// The derivative estimate computed by the last reset, `None` before the first
    pub fn true_derivative(&self) -> Option<f64> {
        self.true_derivative
    }

    fn central_difference(&self) -> f64 {
        let Self {
            function: f,
            point: x,
            step_size: h,
            ..
        } = self;
        (f(x + h) - f(x - h)) / (2.0 * h)
    }
}

impl<F> Environment for DerivativeEnv<F>
where
    F: Fn(f64) -> f64,
{
    type State = f64;
    type Action = f64;

    fn reset(&mut self) -> Self::State {
        let derivative = self.central_difference();
        if !derivative.is_finite() {
            warn!(
                "non-finite derivative {derivative} at x = {}, rewards will not be finite",
                self.point
            );
        }
        if self.true_derivative.is_none() {
            debug!("f'({}) ~ {derivative} (h = {})", self.point, self.step_size);
        }
        self.true_derivative = Some(derivative);
        self.done = false;
        self.point
    }

    /// **Panics** if the episode has already ended or was never started
    fn step(&mut self, action: Self::Action) -> (Self::State, f64, bool) {
        assert!(!self.done, "Episode is over, call `reset` before stepping");
        let derivative = self
            .true_derivative
            .expect("An active episode always has a derivative");
        let reward = -(action - derivative).abs();
        self.done = true;
        (self.point, reward, self.done)
    }

    fn is_active(&self) -> bool {
        !self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_env_functional() {
        let mut env = DerivativeEnv::new(|x: f64| x * x, 1.0);
        assert!(!env.is_active());
        assert_eq!(env.true_derivative(), None);

        let state = env.reset();
        assert_eq!(state, 1.0, "State is the evaluation point");
        assert!(env.is_active());

        let derivative = env.true_derivative().unwrap();
        assert!((derivative - 2.0).abs() < 1e-8, "f'(1) ~ 2, got {derivative}");

        let (next_state, reward, done) = env.step(1.5);
        assert_eq!(next_state, 1.0);
        assert!(done);
        assert!(!env.is_active());
        assert!((reward + (derivative - 1.5).abs()).abs() < 1e-12);
    }

    #[test]
    fn reset_is_deterministic() {
        let mut env = DerivativeEnv::new(f64::sin, 0.3);
        env.reset();
        let first = env.true_derivative();
        for _ in 0..10 {
            env.reset();
            assert_eq!(env.true_derivative(), first);
        }
    }

    #[test]
    fn converges_with_step_size() {
        let error = |h| {
            let mut env = DerivativeEnv::with_step_size(|x: f64| x.powi(3), 2.0, h).unwrap();
            env.reset();
            (env.true_derivative().unwrap() - 12.0).abs()
        };
        // central difference error on x^3 is exactly h^2
        assert!((error(0.1) - 0.01).abs() < 1e-9);
        assert!(error(1e-3) < error(1e-2));
        assert!(error(1e-2) < error(1e-1));
    }

    #[test]
    fn reward_is_non_positive() {
        let mut env = DerivativeEnv::new(f64::exp, 0.5);
        for action in [-10.0, -1.0, 0.0, 1.0, 1.6, 10.0] {
            env.reset();
            let (_, reward, _) = env.step(action);
            assert!(reward <= 0.0);
        }

        env.reset();
        let exact = env.true_derivative().unwrap();
        assert_eq!(env.step(exact).1, 0.0, "Exact estimate is not penalized");
    }

    #[test]
    fn non_finite_function_propagates() {
        let mut env = DerivativeEnv::new(|x: f64| x.ln(), -1.0);
        env.reset();
        assert!(env.true_derivative().unwrap().is_nan());
        assert!(env.step(0.0).1.is_nan());
    }

    #[test]
    fn invalid_step_size() {
        for h in [0.0, -1e-5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                DerivativeEnv::with_step_size(|x: f64| x, 0.0, h),
                Err(Error::InvalidStepSize(_))
            ));
        }
    }

    #[test]
    #[should_panic]
    fn step_before_reset() {
        let mut env = DerivativeEnv::new(|x: f64| x, 0.0);
        env.step(1.0);
    }

    #[test]
    #[should_panic]
    fn step_twice() {
        let mut env = DerivativeEnv::new(|x: f64| x, 0.0);
        env.reset();
        env.step(1.0);
        env.step(1.0);
    }
}
