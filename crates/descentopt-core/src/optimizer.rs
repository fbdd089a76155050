//! The optimizer interface shared by every descent method.
//!
//! An optimizer owns a [`Parameters`] record and its method settings. A run
//! borrows the optimizer immutably and keeps all of its scratch state (the
//! decayed step, momentum memory, counters) on its own stack, so reruns are
//! deterministic and distinct instances can run concurrently.

use crate::{
    callback::{NoOpCallback, OptimizationCallback},
    convergence::OptimizationResult,
    error::OptimizerResult,
    parameters::Parameters,
    types::{DVector, Scalar, ScalarFunction, VectorFunction},
};
use std::fmt::Debug;

/// Trait for descent optimizers.
pub trait Optimizer<T: Scalar>: Debug {
    /// Returns the name of the optimizer.
    fn name(&self) -> &str;

    /// The shared parameter record.
    fn parameters(&self) -> &Parameters<T>;

    /// Mutable access to the shared parameter record.
    fn parameters_mut(&mut self) -> &mut Parameters<T>;

    /// Runs from the stored initial condition, reporting to `callback`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the settings are invalid, and
    /// `DimensionMismatch` if the gradient returns a vector of the wrong
    /// length. Failing to converge is not an error.
    fn minimize_with_callback(
        &self,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T>>;

    /// Runs from the stored initial condition.
    fn minimize(&self) -> OptimizerResult<OptimizationResult<T>> {
        self.minimize_with_callback(&mut NoOpCallback)
    }

    /// Replaces the objective, gradient and starting point, then runs.
    ///
    /// All other settings are kept.
    fn minimize_from(
        &mut self,
        f: ScalarFunction<T>,
        grad_f: VectorFunction<T>,
        initial_condition: DVector<T>,
    ) -> OptimizerResult<OptimizationResult<T>> {
        let params = self.parameters_mut();
        params.f = f;
        params.grad_f = grad_f;
        params.initial_condition = initial_condition;
        self.minimize()
    }
}
