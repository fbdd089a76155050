//! Adam.
//!
//! Tracks bias-corrected first and second moment estimates of the raw
//! gradient and moves along `m̂/(√v̂ + ε)`. Under [`AdamRule::Dynamic`] the
//! step follows `α_t = α₀·√(1−β₂ᵗ)/(1−β₁ᵗ)` while it stays above
//! `minimum_step`; under [`AdamRule::Constant`] it stays at `α₀`.

use crate::descent::{self, Iterate, Update, UpdateRule};
use descentopt_core::{
    callback::OptimizationCallback,
    convergence::OptimizationResult,
    error::{OptimizerError, OptimizerResult},
    momentum::AdamMoments,
    optimizer::Optimizer,
    parameters::Parameters,
    step_size::{AdamRule, StepSizeState},
    types::{constants, DVector, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for Adam.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdamConfig<T> {
    /// Step size rule
    pub rule: AdamRule,
    /// Decay rate μ, carried for display only
    pub mu: T,
    /// Exponential decay rate for the first moment
    pub beta1: T,
    /// Exponential decay rate for the second moment
    pub beta2: T,
    /// Denominator guard
    pub epsilon: T,
}

impl<T: Scalar> Default for AdamConfig<T> {
    fn default() -> Self {
        Self {
            rule: AdamRule::Dynamic,
            mu: <T as Scalar>::from_f64(0.2),
            beta1: <T as Scalar>::from_f64(0.9),
            beta2: <T as Scalar>::from_f64(0.999),
            epsilon: constants::adam_epsilon(),
        }
    }
}

impl<T: Scalar> AdamConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step size rule.
    pub fn with_rule(mut self, rule: AdamRule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the decay rate μ.
    pub fn with_mu(mut self, mu: T) -> Self {
        self.mu = mu;
        self
    }

    /// Sets both moment decay rates.
    pub fn with_betas(mut self, beta1: T, beta2: T) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Sets the denominator guard ε.
    pub fn with_epsilon(mut self, epsilon: T) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Checks `0 < β₁, β₂ < 1` and `ε > 0`.
    pub fn validate(&self) -> OptimizerResult<()> {
        for (name, beta) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(beta > T::zero() && beta < T::one()) {
                return Err(OptimizerError::invalid_configuration("must lie in (0, 1)", name, beta));
            }
        }
        if !(self.epsilon > T::zero()) {
            return Err(OptimizerError::invalid_configuration(
                "must be positive",
                "epsilon",
                self.epsilon,
            ));
        }
        Ok(())
    }
}

/// Adam optimizer.
#[derive(Debug, Clone)]
pub struct Adam<T: Scalar> {
    params: Parameters<T>,
    config: AdamConfig<T>,
}

impl<T: Scalar> Adam<T> {
    /// Creates an optimizer, validating both records.
    pub fn new(params: Parameters<T>, config: AdamConfig<T>) -> OptimizerResult<Self> {
        params.validate()?;
        config.validate()?;
        Ok(Self { params, config })
    }

    /// Creates an optimizer with the default configuration.
    pub fn with_default_config(params: Parameters<T>) -> OptimizerResult<Self> {
        Self::new(params, AdamConfig::default())
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &AdamConfig<T> {
        &self.config
    }
}

struct AdamUpdate<T: Scalar> {
    rule: AdamRule,
    step: StepSizeState<T>,
    moments: AdamMoments<T>,
}

impl<T: Scalar> UpdateRule<T> for AdamUpdate<T> {
    fn update(
        &mut self,
        x: &mut DVector<T>,
        iterate: &Iterate<'_, T>,
        _params: &Parameters<T>,
    ) -> OptimizerResult<Update<T>> {
        let corrected = self.moments.update(iterate.gradient);
        let alpha = match self.rule {
            AdamRule::Dynamic => self.step.adaptive(corrected.beta1_power, corrected.beta2_power),
            AdamRule::Constant => self.step.current(),
        };

        let step = corrected.direction * alpha;
        *x -= &step;

        Ok(Update {
            step_size: alpha,
            step_length: step.norm(),
            function_evaluations: 0,
            gradient_evaluations: 0,
        })
    }
}

impl<T: Scalar> Optimizer<T> for Adam<T> {
    fn name(&self) -> &str {
        "Adam"
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
        let rule = AdamUpdate {
            rule: self.config.rule,
            step: StepSizeState::new(self.params.initial_step, self.params.minimum_step, self.config.mu),
            moments: AdamMoments::new(
                self.params.dimension(),
                self.config.beta1,
                self.config.beta2,
                self.config.epsilon,
            ),
        };
        descent::run(&self.params, rule, callback)
    }
}

impl<T: Scalar> fmt::Display for Adam<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name())?;
        writeln!(f, "Descent type: {}", self.config.rule)?;
        writeln!(f, "The parameters of this method are:")?;
        writeln!(f, "{}", self.params)?;
        writeln!(f, "mu: {}", self.config.mu)?;
        writeln!(f, "beta1: {}", self.config.beta1)?;
        writeln!(f, "beta2: {}", self.config.beta2)?;
        write!(f, "epsilon: {}", self.config.epsilon)
    }
}
