//! Step size policies for descent algorithms.
//!
//! Each optimizer family accepts only the rules that make sense for it, so an
//! invalid combination (Armijo with momentum, say) cannot be expressed:
//!
//! | family           | rules                                       |
//! |------------------|---------------------------------------------|
//! | gradient descent | [`DescentRule`]: exponential, inverse, Armijo |
//! | heavy ball, Nesterov | [`MomentumStepRule`]: exponential, inverse, constant |
//! | Adam             | [`AdamRule`]: dynamic, constant             |
//!
//! # Schedules
//!
//! With `α₀` the initial step, `μ` the decay rate and `k` the zero-based
//! iteration index:
//!
//! - **Exponential decay**: `α ← α·e^{−μ}`
//! - **Inverse decay**: `α ← α₀ / (1 + μ·k/‖∇f(xₖ)‖)`
//! - **Adam dynamic**: `α ← α₀·√(1 − β₂ᵗ) / (1 − β₁ᵗ)`
//!
//! All three are gated: the rule is applied only while `α > minimum_step`.
//! Once the step has fallen to the floor it stays where it is. A constant
//! rule leaves `α = α₀` for the whole run.
//!
//! The decayed step is recomputed *before* the update on every iteration,
//! so even the first update uses a decayed step.

use crate::types::{constants, DVector, Scalar};
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step size rule for plain gradient descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DescentRule {
    /// Gated exponential decay.
    #[cfg_attr(feature = "serde", serde(rename = "Exponential decay"))]
    ExponentialDecay,
    /// Gated residual-scaled inverse decay.
    #[cfg_attr(feature = "serde", serde(rename = "Inverse decay"))]
    InverseDecay,
    /// Armijo backtracking from the initial step on every iteration.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "Armijo rule"))]
    Armijo,
}

impl DescentRule {
    /// Whether the gradient is normalised before the update.
    ///
    /// Decay rules move along the unit gradient; Armijo moves along the raw
    /// gradient and lets the backtracking absorb its scale.
    pub fn normalizes_gradient(self) -> bool {
        !matches!(self, Self::Armijo)
    }
}

impl fmt::Display for DescentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExponentialDecay => "exponential decay of the step size",
            Self::InverseDecay => "inverse decay of the step size",
            Self::Armijo => "Armijo rule for the step size",
        })
    }
}

/// Step size rule for the momentum methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MomentumStepRule {
    /// Gated exponential decay.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "Exponential decay"))]
    ExponentialDecay,
    /// Gated residual-scaled inverse decay.
    #[cfg_attr(feature = "serde", serde(rename = "Inverse decay"))]
    InverseDecay,
    /// Fixed step `α₀`.
    #[cfg_attr(feature = "serde", serde(rename = "Constant"))]
    Constant,
}

impl fmt::Display for MomentumStepRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExponentialDecay => "exponential decay of the step size",
            Self::InverseDecay => "inverse decay of the step size",
            Self::Constant => "constant step size",
        })
    }
}

/// Step size rule for Adam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AdamRule {
    /// Bias-corrected adaptive step.
    #[default]
    Dynamic,
    /// Fixed step `α₀`.
    Constant,
}

impl fmt::Display for AdamRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dynamic => "dynamic decay of the step size",
            Self::Constant => "constant step size",
        })
    }
}

/// Running step size of a descent loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizeState<T: Scalar> {
    initial: T,
    current: T,
    minimum: T,
    decay_rate: T,
}

impl<T: Scalar> StepSizeState<T> {
    /// Starts at `initial` with the given floor and decay rate `μ`.
    pub fn new(initial: T, minimum: T, decay_rate: T) -> Self {
        Self {
            initial,
            current: initial,
            minimum,
            decay_rate,
        }
    }

    /// The current step.
    pub fn current(&self) -> T {
        self.current
    }

    fn above_floor(&self) -> bool {
        self.current > self.minimum
    }

    /// `α ← α·e^{−μ}` while above the floor.
    pub fn exponential_decay(&mut self) -> T {
        if self.above_floor() {
            self.current = self.current * <T as Float>::exp(-self.decay_rate);
        }
        self.current
    }

    /// `α ← α₀ / (1 + μ·k·(1/‖g‖))`, recomputed at every iteration.
    ///
    /// The residual is not guarded against zero; callers run the residual
    /// convergence check first.
    pub fn inverse_schedule(&mut self, iteration: usize, residual: T) -> T {
        let k = <T as Scalar>::from_usize(iteration);
        self.current = self.initial / (T::one() + self.decay_rate * k * (T::one() / residual));
        self.current
    }

    /// [`inverse_schedule`](Self::inverse_schedule) while above the floor.
    pub fn inverse_decay(&mut self, iteration: usize, residual: T) -> T {
        if self.above_floor() {
            self.inverse_schedule(iteration, residual);
        }
        self.current
    }

    /// `α ← α₀·√(1 − β₂ᵗ)/(1 − β₁ᵗ)` while above the floor.
    pub fn adaptive(&mut self, beta1_power: T, beta2_power: T) -> T {
        if self.above_floor() {
            self.current =
                self.initial * <T as Float>::sqrt(T::one() - beta2_power) / (T::one() - beta1_power);
        }
        self.current
    }
}

/// Outcome of an Armijo backtracking search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmijoStep<T> {
    /// Accepted step
    pub step: T,
    /// Whether sufficient decrease held at the accepted step
    pub satisfied: bool,
    /// Objective evaluations used, including `f(x)`
    pub evaluations: usize,
}

/// Armijo backtracking along the negative gradient.
///
/// Starting from `α₀`, halves `α` while `α > minimum_step` and
///
/// ```text
/// f(x) − f(x − α·g) < σ·α·‖g‖²
/// ```
///
/// `f(x)` is evaluated once per search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmijoBacktracking<T: Scalar> {
    /// Sufficient decrease parameter σ
    pub sigma: T,
    /// First trial step
    pub initial_step: T,
    /// Floor below which no further halving happens
    pub minimum_step: T,
}

impl<T: Scalar> ArmijoBacktracking<T> {
    /// Creates a backtracking search.
    pub fn new(sigma: T, initial_step: T, minimum_step: T) -> Self {
        Self {
            sigma,
            initial_step,
            minimum_step,
        }
    }

    /// Searches along `−gradient` from `x`.
    pub fn search<F>(&self, f: &F, x: &DVector<T>, gradient: &DVector<T>) -> ArmijoStep<T>
    where
        F: Fn(&DVector<T>) -> T + ?Sized,
    {
        let half = constants::half::<T>();
        let fx = f(x);
        let slope = gradient.norm_squared();
        let mut evaluations = 1;
        let mut alpha = self.initial_step;

        loop {
            let trial = f(&(x - gradient * alpha));
            evaluations += 1;
            let insufficient = fx - trial < self.sigma * alpha * slope;

            if !insufficient || alpha <= self.minimum_step {
                return ArmijoStep {
                    step: alpha,
                    satisfied: !insufficient,
                    evaluations,
                };
            }
            alpha = alpha * half;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_exponential_decay_is_gated() {
        let mut state = StepSizeState::new(1.0, 0.5, 0.2);

        let first = state.exponential_decay();
        assert_relative_eq!(first, (-0.2f64).exp());

        while state.current() > 0.5 {
            state.exponential_decay();
        }
        let frozen = state.current();
        assert!(frozen <= 0.5);
        assert_eq!(state.exponential_decay(), frozen);
        assert_eq!(state.exponential_decay(), frozen);
    }

    #[test]
    fn test_inverse_decay() {
        let mut state = StepSizeState::new(1.0, 1e-2, 0.2);

        // k = 0 leaves the initial step.
        assert_relative_eq!(state.inverse_decay(0, 2.0), 1.0);
        // 1 / (1 + 0.2 * 3 / 0.5) = 1 / 2.2
        assert_relative_eq!(state.inverse_decay(3, 0.5), 1.0 / 2.2);
    }

    #[test]
    fn test_inverse_decay_stops_at_floor() {
        let mut state = StepSizeState::new(1.0, 0.1, 1.0);
        let low = state.inverse_decay(100, 1.0);
        assert!(low < 0.1);
        assert_eq!(state.inverse_decay(1, 1.0), low);
    }

    #[test]
    fn test_inverse_schedule_ignores_floor() {
        let mut state = StepSizeState::new(1.0, 0.1, 1.0);
        let low = state.inverse_schedule(100, 1.0);
        assert_relative_eq!(low, 1.0 / 101.0);
        // Below the floor the schedule keeps following k and the residual.
        assert_relative_eq!(state.inverse_schedule(1, 1.0), 0.5);
        assert_relative_eq!(state.inverse_schedule(200, 0.5), 1.0 / 401.0);
    }

    #[test]
    fn test_adaptive_step() {
        let mut state = StepSizeState::new(1.0, 1e-2, 0.2);
        let step = state.adaptive(0.9, 0.999);
        assert_relative_eq!(step, (1.0f64 - 0.999).sqrt() / (1.0 - 0.9));
    }

    #[test]
    fn test_armijo_accepts_full_step_when_possible() {
        let f = |x: &DVector<f64>| 0.5 * x.norm_squared();
        let x = DVector::from_vec(vec![1.0, -1.0]);
        let g = x.clone();

        let search = ArmijoBacktracking::new(0.1, 1.0, 1e-2);
        let result = search.search(&f, &x, &g);

        assert_eq!(result.step, 1.0);
        assert!(result.satisfied);
        assert_eq!(result.evaluations, 2);
    }

    #[test]
    fn test_armijo_halves_on_steep_function() {
        // f = 50 x², g = 100 x: the full step overshoots badly.
        let f = |x: &DVector<f64>| 50.0 * x[0] * x[0];
        let x = DVector::from_vec(vec![1.0]);
        let g = DVector::from_vec(vec![100.0]);

        let result = ArmijoBacktracking::new(0.1, 1.0, 1e-6).search(&f, &x, &g);

        assert!(result.satisfied);
        assert!(result.step < 1.0);
        assert!(f(&x) - f(&(&x - &g * result.step)) >= 0.1 * result.step * g.norm_squared());
    }

    #[test]
    fn test_armijo_stops_at_floor() {
        // Ascent direction: sufficient decrease can never hold.
        let f = |x: &DVector<f64>| x[0];
        let x = DVector::from_vec(vec![0.0]);
        let g = DVector::from_vec(vec![-1.0]);

        let result = ArmijoBacktracking::new(0.1, 1.0, 0.1).search(&f, &x, &g);

        assert!(!result.satisfied);
        assert!(result.step <= 0.1);
        assert!(result.step > 0.05);
    }

    #[test]
    fn test_rule_display_and_normalisation() {
        assert!(DescentRule::ExponentialDecay.normalizes_gradient());
        assert!(DescentRule::InverseDecay.normalizes_gradient());
        assert!(!DescentRule::Armijo.normalizes_gradient());
        assert_eq!(MomentumStepRule::Constant.to_string(), "constant step size");
        assert_eq!(AdamRule::default(), AdamRule::Dynamic);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_rule_names_deserialize() {
        let rule: DescentRule = serde_json::from_str("\"Armijo rule\"").unwrap();
        assert_eq!(rule, DescentRule::Armijo);
        let rule: MomentumStepRule = serde_json::from_str("\"Inverse decay\"").unwrap();
        assert_eq!(rule, MomentumStepRule::InverseDecay);
        let rule: AdamRule = serde_json::from_str("\"Constant\"").unwrap();
        assert_eq!(rule, AdamRule::Constant);
        assert!(serde_json::from_str::<DescentRule>("\"Constant\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_armijo_exit_condition(
            a in 0.1f64..20.0,
            x0 in -5.0f64..5.0,
            sigma in 0.01f64..0.5,
        ) {
            let f = move |x: &DVector<f64>| a * x[0] * x[0];
            let x = DVector::from_vec(vec![x0]);
            let g = DVector::from_vec(vec![2.0 * a * x0]);
            let minimum = 1e-2;

            let result = ArmijoBacktracking::new(sigma, 1.0, minimum).search(&f, &x, &g);
            let decrease = f(&x) - f(&(&x - &g * result.step));

            prop_assert!(result.satisfied || result.step <= minimum);
            if result.satisfied {
                prop_assert!(decrease >= sigma * result.step * g.norm_squared());
            }
        }
    }
}
