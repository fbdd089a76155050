//! The descent loop shared by every optimizer.
//!
//! Each iteration evaluates `∇f(xₖ)`, stops if the residual is below
//! tolerance, lets the method's [`UpdateRule`] move the iterate, then stops
//! if the step length is below tolerance or the budget is spent. Methods
//! differ only in their update rule.

use descentopt_core::{
    callback::{CallbackInfo, OptimizationCallback},
    convergence::{ConvergenceStatus, OptimizationResult},
    error::{OptimizerError, OptimizerResult},
    parameters::Parameters,
    types::{DVector, Scalar},
};
use std::time::Instant;

/// Inputs of a single update.
pub(crate) struct Iterate<'a, T: Scalar> {
    /// Zero-based iteration index
    pub index: usize,
    /// `∇f(xₖ)`
    pub gradient: &'a DVector<T>,
    /// `‖∇f(xₖ)‖`, known to be above tolerance
    pub residual: T,
}

/// What an update did.
pub(crate) struct Update<T> {
    /// Step size used
    pub step_size: T,
    /// Step length measure compared against `tolerance_s`
    pub step_length: T,
    /// Objective evaluations made by the update
    pub function_evaluations: usize,
    /// Extra gradient evaluations made by the update
    pub gradient_evaluations: usize,
}

/// Per-run update state of one method.
pub(crate) trait UpdateRule<T: Scalar> {
    /// Moves `x` and reports the step.
    fn update(
        &mut self,
        x: &mut DVector<T>,
        iterate: &Iterate<'_, T>,
        params: &Parameters<T>,
    ) -> OptimizerResult<Update<T>>;
}

/// Evaluates the gradient, rejecting a result of the wrong length.
pub(crate) fn evaluate_gradient<T: Scalar>(
    params: &Parameters<T>,
    x: &DVector<T>,
) -> OptimizerResult<DVector<T>> {
    let gradient = (params.grad_f)(x);
    if gradient.len() != x.len() {
        return Err(OptimizerError::dimension_mismatch(x.len(), gradient.len()));
    }
    Ok(gradient)
}

/// Runs the loop from `params.initial_condition`.
pub(crate) fn run<T, R>(
    params: &Parameters<T>,
    mut rule: R,
    callback: &mut dyn OptimizationCallback<T>,
) -> OptimizerResult<OptimizationResult<T>>
where
    T: Scalar,
    R: UpdateRule<T>,
{
    params.validate()?;

    let start = Instant::now();
    let monitor = params.monitor();
    let mut x = params.initial_condition.clone();
    let mut status = ConvergenceStatus::Running;
    let mut iterations = 0;
    let mut function_evaluations = 0;
    let mut gradient_evaluations = 0;
    let mut residual = T::zero();
    let mut step_length = None;
    let mut step_size = params.initial_step;

    callback.on_optimization_start()?;

    while !status.is_terminal() {
        let gradient = evaluate_gradient(params, &x)?;
        gradient_evaluations += 1;
        residual = gradient.norm();

        status = monitor.check_residual(residual);
        if status.is_terminal() {
            break;
        }

        let iterate = Iterate {
            index: iterations,
            gradient: &gradient,
            residual,
        };
        let update = rule.update(&mut x, &iterate, params)?;
        iterations += 1;
        function_evaluations += update.function_evaluations;
        gradient_evaluations += update.gradient_evaluations;
        step_size = update.step_size;
        step_length = Some(update.step_length);

        status = monitor.check_step(update.step_length);
        if !status.is_terminal() {
            status = monitor.check_iterations(iterations);
        }

        let info = CallbackInfo {
            iteration: iterations,
            point: x.clone(),
            residual,
            step_length,
            step_size,
            elapsed: start.elapsed(),
            status,
        };
        if !callback.on_iteration_end(&info)? && !status.is_terminal() {
            status = ConvergenceStatus::CallbackRequest;
        }
    }

    let value = (params.f)(&x);
    function_evaluations += 1;
    let duration = start.elapsed();

    callback.on_optimization_end(&CallbackInfo {
        iteration: iterations,
        point: x.clone(),
        residual,
        step_length,
        step_size,
        elapsed: duration,
        status,
    })?;

    let mut result = OptimizationResult::new(x, value, iterations, duration, status)
        .with_gradient_norm(residual)
        .with_function_evaluations(function_evaluations)
        .with_gradient_evaluations(gradient_evaluations);
    if let Some(length) = step_length {
        result = result.with_step_length(length);
    }
    Ok(result)
}
