//! Heavy ball (Polyak momentum).
//!
//! Keeps a velocity `d` and updates
//!
//! ```text
//! d ← c·d − α·ĝ
//! x ← x + d
//! ```
//!
//! where `ĝ` is the normalised gradient and `c` the momentum coefficient
//! from the [`MomentumStrategy`]. The step length compared against
//! `tolerance_s` is `‖d‖`.

use crate::descent::{self, Iterate, Update, UpdateRule};
use descentopt_core::{
    callback::OptimizationCallback,
    convergence::OptimizationResult,
    error::{OptimizerError, OptimizerResult},
    momentum::{HeavyBallMomentum, MomentumStrategy},
    optimizer::Optimizer,
    parameters::Parameters,
    step_size::{MomentumStepRule, StepSizeState},
    types::{DVector, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the heavy ball method.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeavyBallConfig<T> {
    /// Step size rule
    pub rule: MomentumStepRule,
    /// How the momentum coefficient is chosen
    pub strategy: MomentumStrategy,
    /// Decay rate μ
    pub mu: T,
    /// Memory parameter η
    pub eta: T,
}

impl<T: Scalar> Default for HeavyBallConfig<T> {
    fn default() -> Self {
        Self {
            rule: MomentumStepRule::ExponentialDecay,
            strategy: MomentumStrategy::Constant,
            mu: <T as Scalar>::from_f64(0.2),
            eta: <T as Scalar>::from_f64(0.9),
        }
    }
}

impl<T: Scalar> HeavyBallConfig<T> {
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

/// Shared by the heavy ball and Nesterov configs.
pub(crate) fn validate_momentum<T: Scalar>(mu: T, eta: T) -> OptimizerResult<()> {
    if !(mu >= T::zero()) {
        return Err(OptimizerError::invalid_configuration("must be non-negative", "mu", mu));
    }
    if !(eta >= T::zero() && eta < T::one()) {
        return Err(OptimizerError::invalid_configuration("must lie in [0, 1)", "eta", eta));
    }
    Ok(())
}

/// Advances the step size for a momentum method.
pub(crate) fn momentum_step<T: Scalar>(
    rule: MomentumStepRule,
    step: &mut StepSizeState<T>,
    iterate: &Iterate<'_, T>,
) -> T {
    match rule {
        MomentumStepRule::ExponentialDecay => step.exponential_decay(),
        MomentumStepRule::InverseDecay => step.inverse_decay(iterate.index, iterate.residual),
        MomentumStepRule::Constant => step.current(),
    }
}

/// Heavy ball optimizer.
#[derive(Debug, Clone)]
pub struct HeavyBall<T: Scalar> {
    params: Parameters<T>,
    config: HeavyBallConfig<T>,
}

impl<T: Scalar> HeavyBall<T> {
    /// Creates an optimizer, validating both records.
    pub fn new(params: Parameters<T>, config: HeavyBallConfig<T>) -> OptimizerResult<Self> {
        params.validate()?;
        config.validate()?;
        Ok(Self { params, config })
    }

    /// Creates an optimizer with the default configuration.
    pub fn with_default_config(params: Parameters<T>) -> OptimizerResult<Self> {
        Self::new(params, HeavyBallConfig::default())
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &HeavyBallConfig<T> {
        &self.config
    }
}

struct HeavyBallUpdate<T: Scalar> {
    config: HeavyBallConfig<T>,
    step: StepSizeState<T>,
    momentum: HeavyBallMomentum<T>,
}

impl<T: Scalar> UpdateRule<T> for HeavyBallUpdate<T> {
    fn update(
        &mut self,
        x: &mut DVector<T>,
        iterate: &Iterate<'_, T>,
        _params: &Parameters<T>,
    ) -> OptimizerResult<Update<T>> {
        let direction = iterate.gradient * (T::one() / iterate.residual);
        let alpha = momentum_step(self.config.rule, &mut self.step, iterate);
        let coefficient = self.config.strategy.coefficient(alpha, self.config.eta);
        let step_length = self.momentum.step(x, &direction, alpha, coefficient);

        Ok(Update {
            step_size: alpha,
            step_length,
            function_evaluations: 0,
            gradient_evaluations: 0,
        })
    }
}

impl<T: Scalar> Optimizer<T> for HeavyBall<T> {
    fn name(&self) -> &str {
        "Heavy Ball"
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
        let rule = HeavyBallUpdate {
            config: self.config,
            step: StepSizeState::new(self.params.initial_step, self.params.minimum_step, self.config.mu),
            momentum: HeavyBallMomentum::new(self.params.dimension()),
        };
        descent::run(&self.params, rule, callback)
    }
}

impl<T: Scalar> fmt::Display for HeavyBall<T> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use descentopt_core::callback::HistoryCallback;
    use descentopt_core::types::{scalar_function, vector_function};

    fn line(x0: f64) -> Parameters<f64> {
        Parameters::new(
            scalar_function(|x: &DVector<f64>| x[0] * x[0]),
            vector_function(|x: &DVector<f64>| DVector::from_vec(vec![2.0 * x[0]])),
            DVector::from_vec(vec![x0]),
        )
    }

    #[test]
    fn test_velocity_accumulates() {
        let config = HeavyBallConfig::new()
            .with_rule(MomentumStepRule::Constant)
            .with_eta(0.5);
        let optimizer = HeavyBall::new(line(10.0).with_initial_step(1.0), config).unwrap();
        let mut history = HistoryCallback::stopping_after(2);
        let result = optimizer.minimize_with_callback(&mut history).unwrap();

        // d₁ = −1, d₂ = 0.5·(−1) − 1 = −1.5
        assert_relative_eq!(history.records[0].step_length.unwrap(), 1.0);
        assert_relative_eq!(history.records[1].step_length.unwrap(), 1.5);
        assert_relative_eq!(result.point[0], 7.5);
    }

    #[test]
    fn test_dynamic_coefficient_follows_step() {
        // α = 0.5 gives c = 1 − α = 0.5, the same as η = 0.5 above.
        let config = HeavyBallConfig::new()
            .with_rule(MomentumStepRule::Constant)
            .with_strategy(MomentumStrategy::Dynamic)
            .with_eta(0.9);
        let optimizer = HeavyBall::new(line(10.0).with_initial_step(0.5), config).unwrap();
        let mut history = HistoryCallback::stopping_after(2);
        let result = optimizer.minimize_with_callback(&mut history).unwrap();

        assert_relative_eq!(history.records[1].step_length.unwrap(), 0.75);
        assert_relative_eq!(result.point[0], 8.75);
    }

    #[test]
    fn test_default_config() {
        let config = HeavyBallConfig::<f64>::default();
        assert_eq!(config.rule, MomentumStepRule::ExponentialDecay);
        assert_eq!(config.strategy, MomentumStrategy::Constant);
        assert_eq!(config.eta, 0.9);
        assert!(HeavyBallConfig::<f64>::new().with_eta(1.0).validate().is_err());
        assert!(HeavyBallConfig::<f64>::new().with_mu(-1.0).validate().is_err());
    }

    #[test]
    fn test_display() {
        let optimizer = HeavyBall::with_default_config(line(1.0)).unwrap();
        let text = optimizer.to_string();
        assert!(text.contains("Strategy to compute the momentum: constant (eta)"));
        assert!(text.ends_with("eta: 0.9"));
    }
}
