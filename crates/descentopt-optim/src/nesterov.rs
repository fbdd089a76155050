//! Nesterov accelerated gradient.
//!
//! Takes the gradient step from a lookahead point `y` rather than from `x`:
//!
//! ```text
//! x' ← y − α·ĝ(y)
//! y  ← x' + c·(x' − x)
//! ```
//!
//! `ĝ(y)` is the gradient at the lookahead, normalised unless it vanishes.
//! The step size schedule still reads the residual at `x`, so each
//! iteration costs two gradient evaluations.

use crate::descent::{self, Iterate, Update, UpdateRule};
use crate::heavy_ball::{momentum_step, validate_momentum};
use descentopt_core::{
    callback::OptimizationCallback,
    convergence::OptimizationResult,
    error::OptimizerResult,
    momentum::{MomentumStrategy, NesterovMomentum},
    optimizer::Optimizer,
    parameters::Parameters,
    step_size::{MomentumStepRule, StepSizeState},
    types::{DVector, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the Nesterov method.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NesterovConfig<T> {
    /// Step size rule
    pub rule: MomentumStepRule,
    /// How the momentum coefficient is chosen
    pub strategy: MomentumStrategy,
    /// Decay rate μ
    pub mu: T,
    /// Memory parameter η
    pub eta: T,
}

impl<T: Scalar> Default for NesterovConfig<T> {
    fn default() -> Self {
        Self {
            rule: MomentumStepRule::ExponentialDecay,
            strategy: MomentumStrategy::Constant,
            mu: <T as Scalar>::from_f64(0.2),
            eta: <T as Scalar>::from_f64(0.9),
        }
    }
}

impl<T: Scalar> NesterovConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step size rule.
    pub fn with_rule(mut self, rule: MomentumStepRule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the momentum strategy.
    pub fn with_strategy(mut self, strategy: MomentumStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the decay rate μ.
    pub fn with_mu(mut self, mu: T) -> Self {
        self.mu = mu;
        self
    }

    /// Sets the memory parameter η.
    pub fn with_eta(mut self, eta: T) -> Self {
        self.eta = eta;
        self
    }

    /// Checks `μ ≥ 0` and `0 ≤ η < 1`.
    pub fn validate(&self) -> OptimizerResult<()> {
        validate_momentum(self.mu, self.eta)
    }
}

/// Nesterov optimizer.
#[derive(Debug, Clone)]
pub struct Nesterov<T: Scalar> {
    params: Parameters<T>,
    config: NesterovConfig<T>,
}

impl<T: Scalar> Nesterov<T> {
    /// Creates an optimizer, validating both records.
    pub fn new(params: Parameters<T>, config: NesterovConfig<T>) -> OptimizerResult<Self> {
        params.validate()?;
        config.validate()?;
        Ok(Self { params, config })
    }

    /// Creates an optimizer with the default configuration.
    pub fn with_default_config(params: Parameters<T>) -> OptimizerResult<Self> {
        Self::new(params, NesterovConfig::default())
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &NesterovConfig<T> {
        &self.config
    }
}

struct NesterovUpdate<T: Scalar> {
    config: NesterovConfig<T>,
    step: StepSizeState<T>,
    momentum: NesterovMomentum<T>,
}

impl<T: Scalar> UpdateRule<T> for NesterovUpdate<T> {
    fn update(
        &mut self,
        x: &mut DVector<T>,
        iterate: &Iterate<'_, T>,
        params: &Parameters<T>,
    ) -> OptimizerResult<Update<T>> {
        let alpha = momentum_step(self.config.rule, &mut self.step, iterate);
        let coefficient = self.config.strategy.coefficient(alpha, self.config.eta);

        let lookahead_gradient = descent::evaluate_gradient(params, self.momentum.lookahead())?;
        let direction = match lookahead_gradient.try_normalize(T::zero()) {
            Some(unit) => unit,
            None => lookahead_gradient,
        };
        let step_length = self.momentum.step(x, &direction, alpha, coefficient);

        Ok(Update {
            step_size: alpha,
            step_length,
            function_evaluations: 0,
            gradient_evaluations: 1,
        })
    }
}

impl<T: Scalar> Optimizer<T> for Nesterov<T> {
    fn name(&self) -> &str {
        "Nesterov"
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
        let rule = NesterovUpdate {
            config: self.config,
            step: StepSizeState::new(self.params.initial_step, self.params.minimum_step, self.config.mu),
            momentum: NesterovMomentum::new(&self.params.initial_condition),
        };
        descent::run(&self.params, rule, callback)
    }
}

impl<T: Scalar> fmt::Display for Nesterov<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name())?;
        writeln!(f, "Descent type: {}", self.config.rule)?;
        writeln!(f, "Strategy to compute the momentum: {}", self.config.strategy)?;
        writeln!(f, "The parameters of this method are:")?;
        writeln!(f, "{}", self.params)?;
        writeln!(f, "mu: {}", self.config.mu)?;
        write!(f, "eta: {}", self.config.eta)
    }
}
