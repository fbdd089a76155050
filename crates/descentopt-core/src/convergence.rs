//! Convergence policy and optimization results.
//!
//! Every descent run is driven by the same three checks, evaluated in this
//! order on each iteration:
//!
//! 1. **Residual**: `‖∇f(xₖ)‖ < tolerance_r` stops with
//!    [`ConvergenceStatus::ConvergedResidual`] before any update is made.
//! 2. **Step length**: after the update, if the step measure (usually
//!    `‖xₖ₊₁ − xₖ‖`) is `< tolerance_s` the run stops with
//!    [`ConvergenceStatus::ConvergedStep`].
//! 3. **Budget**: after `max_iterations` completed updates the run stops with
//!    [`ConvergenceStatus::MaxIterationsReached`] and the last iterate is
//!    returned.
//!
//! None of these outcomes is an error. Callers inspect the status on the
//! returned [`OptimizationResult`].

use crate::types::{DVector, Scalar};
use std::fmt;
use std::time::Duration;

/// State of a descent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvergenceStatus {
    /// The run has not terminated yet.
    Running,
    /// Gradient norm fell below the residual tolerance.
    ConvergedResidual,
    /// Step length fell below the step tolerance.
    ConvergedStep,
    /// The iteration budget was exhausted.
    MaxIterationsReached,
    /// A progress callback asked the run to stop.
    CallbackRequest,
}

impl ConvergenceStatus {
    /// True for the two convergence outcomes.
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::ConvergedResidual | Self::ConvergedStep)
    }

    /// True for every state except `Running`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for ConvergenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Running => "running",
            Self::ConvergedResidual => "converged (residual below tolerance)",
            Self::ConvergedStep => "converged (step length below tolerance)",
            Self::MaxIterationsReached => "maximum number of iterations reached",
            Self::CallbackRequest => "stopped by callback",
        };
        f.write_str(text)
    }
}

/// Applies the residual, step-length and budget checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceMonitor<T: Scalar> {
    /// Residual tolerance on `‖∇f‖`
    pub tolerance_r: T,
    /// Step tolerance on the step-length measure
    pub tolerance_s: T,
    /// Maximum number of updates
    pub max_iterations: usize,
}

impl<T: Scalar> ConvergenceMonitor<T> {
    /// Creates a monitor with the given tolerances and budget.
    pub fn new(tolerance_r: T, tolerance_s: T, max_iterations: usize) -> Self {
        Self {
            tolerance_r,
            tolerance_s,
            max_iterations,
        }
    }

    /// Residual check, run before the update.
    pub fn check_residual(&self, residual: T) -> ConvergenceStatus {
        if residual < self.tolerance_r {
            ConvergenceStatus::ConvergedResidual
        } else {
            ConvergenceStatus::Running
        }
    }

    /// Step-length check, run after the update.
    pub fn check_step(&self, step_length: T) -> ConvergenceStatus {
        if step_length < self.tolerance_s {
            ConvergenceStatus::ConvergedStep
        } else {
            ConvergenceStatus::Running
        }
    }

    /// Budget check on the number of completed updates.
    pub fn check_iterations(&self, completed: usize) -> ConvergenceStatus {
        if completed >= self.max_iterations {
            ConvergenceStatus::MaxIterationsReached
        } else {
            ConvergenceStatus::Running
        }
    }
}

/// Outcome of a descent run.
#[derive(Debug, Clone)]
pub struct OptimizationResult<T: Scalar> {
    /// The final iterate
    pub point: DVector<T>,

    /// Objective value at the final iterate
    pub value: T,

    /// Last residual `‖∇f‖` observed by the loop
    pub gradient_norm: Option<T>,

    /// Last step length observed by the loop
    pub step_length: Option<T>,

    /// Number of completed updates
    pub iterations: usize,

    /// Objective evaluations made by the optimizer itself
    ///
    /// Evaluations hidden inside a finite-difference gradient are not
    /// counted here.
    pub function_evaluations: usize,

    /// Gradient evaluations
    pub gradient_evaluations: usize,

    /// Wall-clock time elapsed during the run
    pub duration: Duration,

    /// Why the run stopped
    pub status: ConvergenceStatus,

    /// True if the run stopped on a tolerance
    pub converged: bool,
}

impl<T: Scalar> OptimizationResult<T> {
    /// Creates a new optimization result.
    pub fn new(
        point: DVector<T>,
        value: T,
        iterations: usize,
        duration: Duration,
        status: ConvergenceStatus,
    ) -> Self {
        Self {
            point,
            value,
            gradient_norm: None,
            step_length: None,
            iterations,
            function_evaluations: 0,
            gradient_evaluations: 0,
            duration,
            status,
            converged: status.is_converged(),
        }
    }

    /// Sets the last residual.
    pub fn with_gradient_norm(mut self, norm: T) -> Self {
        self.gradient_norm = Some(norm);
        self
    }

    /// Sets the last step length.
    pub fn with_step_length(mut self, length: T) -> Self {
        self.step_length = Some(length);
        self
    }

    /// Sets the function evaluation count.
    pub fn with_function_evaluations(mut self, count: usize) -> Self {
        self.function_evaluations = count;
        self
    }

    /// Sets the gradient evaluation count.
    pub fn with_gradient_evaluations(mut self, count: usize) -> Self {
        self.gradient_evaluations = count;
        self
    }
}

impl<T: Scalar> fmt::Display for OptimizationResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "status:     {}", self.status)?;
        writeln!(f, "iterations: {}", self.iterations)?;
        write!(f, "point:      (")?;
        for (i, xi) in self.point.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{xi}")?;
        }
        writeln!(f, ")")?;
        write!(f, "value:      {}", self.value)?;
        if let Some(norm) = self.gradient_norm {
            write!(f, "\nresidual:   {norm}")?;
        }
        Ok(())
    }
}
