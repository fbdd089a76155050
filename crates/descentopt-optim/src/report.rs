//! Summary of a computed minimum.

use descentopt_core::{
    convergence::OptimizationResult,
    parameters::Parameters,
    types::{DVector, Scalar},
};
use std::fmt;

/// The point a run stopped at, with `f` and `‖∇f‖` evaluated there.
///
/// Displays as
///
/// ```text
/// Computed minimum: (-0.5415,0.2707)
/// f (-0.5415,0.2707) = -0.8251
/// || grad_f (-0.5415,0.2707) || = 0.0001
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MinimumReport<T: Scalar> {
    /// Point reached
    pub point: DVector<T>,
    /// `f(point)`
    pub value: T,
    /// `‖∇f(point)‖`
    pub gradient_norm: T,
}

impl<T: Scalar> MinimumReport<T> {
    /// Evaluates the objective and its gradient of `params` at `point`.
    pub fn new(params: &Parameters<T>, point: DVector<T>) -> Self {
        let value = (params.f)(&point);
        let gradient_norm = (params.grad_f)(&point).norm();
        Self {
            point,
            value,
            gradient_norm,
        }
    }

    /// Reports the final point of `result`.
    pub fn from_result(params: &Parameters<T>, result: &OptimizationResult<T>) -> Self {
        Self::new(params, result.point.clone())
    }
}

struct Tuple<'a, T: Scalar>(&'a DVector<T>);

impl<T: Scalar> fmt::Display for Tuple<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, xi) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{xi}")?;
        }
        write!(f, ")")
    }
}

impl<T: Scalar> fmt::Display for MinimumReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let point = Tuple(&self.point);
        writeln!(f, "Computed minimum: {point}")?;
        writeln!(f, "f {point} = {}", self.value)?;
        write!(f, "|| grad_f {point} || = {}", self.gradient_norm)
    }
}
