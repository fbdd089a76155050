//! Gradient descent.
//!
//! Moves against the gradient, `xₖ₊₁ = xₖ − αₖ·dₖ`, with the step size chosen
//! by a [`DescentRule`]:
//!
//! - **Exponential / inverse decay**: `dₖ` is the *normalised* gradient
//!   `∇f(xₖ)/‖∇f(xₖ)‖` and `αₖ` follows the gated decay schedule.
//! - **Armijo**: `dₖ` is the *raw* gradient and `αₖ` is found by
//!   backtracking from `α₀` on every iteration.
//!
//! The asymmetry is intentional: normalisation changes the effective step
//! scale, and the backtracking already adapts to the raw gradient's scale.
//!
//! # Examples
//!
//! ```rust
//! use descentopt_core::prelude::*;
//! use descentopt_optim::{GradientDescent, GradientDescentConfig};
//!
//! let params = Parameters::new(
//!     scalar_function(|x: &DVector<f64>| (x[0] - 1.0).powi(2) + 2.0 * x[1] * x[1]),
//!     vector_function(|x: &DVector<f64>| DVector::from_vec(vec![2.0 * (x[0] - 1.0), 4.0 * x[1]])),
//!     DVector::from_vec(vec![3.0, -1.0]),
//! );
//! let optimizer = GradientDescent::new(params, GradientDescentConfig::new()).unwrap();
//! let result = optimizer.minimize().unwrap();
//!
//! assert!(result.converged);
//! assert!((result.point[0] - 1.0).abs() < 1e-4);
//! ```

use crate::descent::{self, Iterate, Update, UpdateRule};
use descentopt_core::{
    callback::OptimizationCallback,
    convergence::OptimizationResult,
    error::{OptimizerError, OptimizerResult},
    optimizer::Optimizer,
    parameters::Parameters,
    step_size::{ArmijoBacktracking, DescentRule, StepSizeState},
    types::{DVector, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientDescentConfig<T> {
    /// Step size rule
    pub rule: DescentRule,
    /// Armijo sufficient decrease parameter σ
    pub sigma: T,
    /// Decay rate μ for the exponential and inverse rules
    pub mu: T,
}

impl<T: Scalar> Default for GradientDescentConfig<T> {
    fn default() -> Self {
        Self {
            rule: DescentRule::Armijo,
            sigma: <T as Scalar>::from_f64(0.1),
            mu: <T as Scalar>::from_f64(0.2),
        }
    }
}

impl<T: Scalar> GradientDescentConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step size rule.
    pub fn with_rule(mut self, rule: DescentRule) -> Self {
        self.rule = rule;
        self
    }

    /// Uses exponential decay with rate `mu`.
    pub fn with_exponential_decay(mut self, mu: T) -> Self {
        self.rule = DescentRule::ExponentialDecay;
        self.mu = mu;
        self
    }

    /// Uses inverse decay with rate `mu`.
    pub fn with_inverse_decay(mut self, mu: T) -> Self {
        self.rule = DescentRule::InverseDecay;
        self.mu = mu;
        self
    }

    /// Uses Armijo backtracking with parameter `sigma`.
    pub fn with_armijo(mut self, sigma: T) -> Self {
        self.rule = DescentRule::Armijo;
        self.sigma = sigma;
        self
    }

    /// Checks `0 < σ < 1` and `μ ≥ 0`.
    pub fn validate(&self) -> OptimizerResult<()> {
        if !(self.sigma > T::zero() && self.sigma < T::one()) {
            return Err(OptimizerError::invalid_configuration(
                "must lie in (0, 1)",
                "sigma",
                self.sigma,
            ));
        }
        if !(self.mu >= T::zero()) {
            return Err(OptimizerError::invalid_configuration(
                "must be non-negative",
                "mu",
                self.mu,
            ));
        }
        Ok(())
    }
}

/// Gradient descent optimizer.
#[derive(Debug, Clone)]
pub struct GradientDescent<T: Scalar> {
    params: Parameters<T>,
    config: GradientDescentConfig<T>,
}

impl<T: Scalar> GradientDescent<T> {
    /// Creates an optimizer, validating both records.
    pub fn new(params: Parameters<T>, config: GradientDescentConfig<T>) -> OptimizerResult<Self> {
        params.validate()?;
        config.validate()?;
        Ok(Self { params, config })
    }

    /// Creates an optimizer with the default configuration.
    pub fn with_default_config(params: Parameters<T>) -> OptimizerResult<Self> {
        Self::new(params, GradientDescentConfig::default())
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &GradientDescentConfig<T> {
        &self.config
    }
}

struct DescentUpdate<T: Scalar> {
    config: GradientDescentConfig<T>,
    step: StepSizeState<T>,
}

impl<T: Scalar> UpdateRule<T> for DescentUpdate<T> {
    fn update(
        &mut self,
        x: &mut DVector<T>,
        iterate: &Iterate<'_, T>,
        params: &Parameters<T>,
    ) -> OptimizerResult<Update<T>> {
        let (alpha, direction, function_evaluations) = match self.config.rule {
            DescentRule::Armijo => {
                let search =
                    ArmijoBacktracking::new(self.config.sigma, params.initial_step, params.minimum_step);
                let accepted = search.search(params.f.as_ref(), x, iterate.gradient);
                (accepted.step, iterate.gradient.clone(), accepted.evaluations)
            }
            DescentRule::ExponentialDecay => {
                let direction = iterate.gradient * (T::one() / iterate.residual);
                (self.step.exponential_decay(), direction, 0)
            }
            DescentRule::InverseDecay => {
                let direction = iterate.gradient * (T::one() / iterate.residual);
                (self.step.inverse_schedule(iterate.index, iterate.residual), direction, 0)
            }
        };

        let previous = x.clone();
        *x -= direction * alpha;

        Ok(Update {
            step_size: alpha,
            step_length: (&*x - &previous).norm(),
            function_evaluations,
            gradient_evaluations: 0,
        })
    }
}

impl<T: Scalar> Optimizer<T> for GradientDescent<T> {
    fn name(&self) -> &str {
        "Gradient Descent"
    }

    fn parameters(&self) -> &Parameters<T> {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut Parameters<T> {
        &mut self.params
    }

    fn minimize_with_callback(
        &self,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T>> {
        self.config.validate()?;
        let rule = DescentUpdate {
            config: self.config,
            step: StepSizeState::new(self.params.initial_step, self.params.minimum_step, self.config.mu),
        };
        descent::run(&self.params, rule, callback)
    }
}

impl<T: Scalar> fmt::Display for GradientDescent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name())?;
        writeln!(f, "Descent type: {}", self.config.rule)?;
        writeln!(f, "The parameters of this method are:")?;
        writeln!(f, "{}", self.params)?;
        writeln!(f, "mu: {}", self.config.mu)?;
        write!(f, "sigma: {}", self.config.sigma)
    }
}
