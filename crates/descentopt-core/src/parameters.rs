//! Parameters shared by every descent method.
//!
//! A [`Parameters`] record carries the objective, its gradient, the starting
//! point and the convergence settings. Method-specific settings live in the
//! per-method configs of `descentopt-optim`, which compose with this record
//! instead of extending it.

use crate::{
    convergence::ConvergenceMonitor,
    error::{OptimizerError, OptimizerResult},
    types::{DVector, Scalar, ScalarFunction, VectorFunction},
};
use std::fmt;

/// Shared parameter record.
///
/// # Examples
///
/// ```rust
/// use descentopt_core::parameters::Parameters;
/// use descentopt_core::types::{scalar_function, vector_function};
/// use nalgebra::DVector;
///
/// let params = Parameters::new(
///     scalar_function(|x: &DVector<f64>| x.norm_squared()),
///     vector_function(|x: &DVector<f64>| x * 2.0),
///     DVector::from_vec(vec![1.0, -1.0]),
/// )
/// .with_tolerance_r(1e-8)
/// .with_max_iterations(500);
///
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Parameters<T: Scalar> {
    /// Objective
    pub f: ScalarFunction<T>,
    /// Gradient of the objective, analytic or finite-difference
    pub grad_f: VectorFunction<T>,
    /// Starting point
    pub initial_condition: DVector<T>,
    /// Residual tolerance on `‖∇f‖`
    pub tolerance_r: T,
    /// Step length tolerance
    pub tolerance_s: T,
    /// Initial step size `α₀`
    pub initial_step: T,
    /// Maximum number of updates
    pub max_iterations: usize,
    /// Floor below which step-size decay stops
    pub minimum_step: T,
}

impl<T: Scalar> Parameters<T> {
    /// Creates a record with the default settings: residual and step
    /// tolerances `1e-6`, initial step `1`, `1000` iterations and minimum
    /// step `1e-2`.
    pub fn new(f: ScalarFunction<T>, grad_f: VectorFunction<T>, initial_condition: DVector<T>) -> Self {
        Self {
            f,
            grad_f,
            initial_condition,
            tolerance_r: <T as Scalar>::from_f64(1e-6),
            tolerance_s: <T as Scalar>::from_f64(1e-6),
            initial_step: T::one(),
            max_iterations: 1000,
            minimum_step: <T as Scalar>::from_f64(1e-2),
        }
    }

    /// Sets the residual tolerance.
    pub fn with_tolerance_r(mut self, tolerance: T) -> Self {
        self.tolerance_r = tolerance;
        self
    }

    /// Sets the step length tolerance.
    pub fn with_tolerance_s(mut self, tolerance: T) -> Self {
        self.tolerance_s = tolerance;
        self
    }

    /// Sets the initial step size.
    pub fn with_initial_step(mut self, step: T) -> Self {
        self.initial_step = step;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the step-size floor.
    pub fn with_minimum_step(mut self, step: T) -> Self {
        self.minimum_step = step;
        self
    }

    /// Replaces the objective, gradient and starting point.
    pub fn with_problem(
        mut self,
        f: ScalarFunction<T>,
        grad_f: VectorFunction<T>,
        initial_condition: DVector<T>,
    ) -> Self {
        self.f = f;
        self.grad_f = grad_f;
        self.initial_condition = initial_condition;
        self
    }

    /// Dimension of the search space.
    pub fn dimension(&self) -> usize {
        self.initial_condition.len()
    }

    /// Convergence checks for these settings.
    pub fn monitor(&self) -> ConvergenceMonitor<T> {
        ConvergenceMonitor::new(self.tolerance_r, self.tolerance_s, self.max_iterations)
    }

    /// Checks the record's invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.initial_condition.is_empty() {
            return Err(OptimizerError::invalid_configuration(
                "must have at least one component",
                "initial_condition",
                "()",
            ));
        }
        let positive = [
            ("tolerance_r", self.tolerance_r),
            ("tolerance_s", self.tolerance_s),
            ("initial_step", self.initial_step),
            ("minimum_step", self.minimum_step),
        ];
        for (name, value) in positive {
            // Written as a negation so NaN is rejected too.
            if !(value > T::zero()) {
                return Err(OptimizerError::invalid_configuration("must be positive", name, value));
            }
        }
        if self.max_iterations == 0 {
            return Err(OptimizerError::invalid_configuration(
                "must be at least 1",
                "max_iterations",
                self.max_iterations,
            ));
        }
        Ok(())
    }
}

impl<T: Scalar> fmt::Debug for Parameters<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameters")
            .field("initial_condition", &self.initial_condition.as_slice())
            .field("tolerance_r", &self.tolerance_r)
            .field("tolerance_s", &self.tolerance_s)
            .field("initial_step", &self.initial_step)
            .field("max_iterations", &self.max_iterations)
            .field("minimum_step", &self.minimum_step)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> fmt::Display for Parameters<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "initial_condition: (")?;
        for (i, xi) in self.initial_condition.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{xi}")?;
        }
        writeln!(f, ")")?;
        writeln!(f, "tolerance_r: {}", self.tolerance_r)?;
        writeln!(f, "tolerance_s: {}", self.tolerance_s)?;
        writeln!(f, "initial_step: {}", self.initial_step)?;
        writeln!(f, "max_iterations: {}", self.max_iterations)?;
        write!(f, "minimum_step: {}", self.minimum_step)
    }
}
