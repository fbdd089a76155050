//! Derivative validation utilities.
//!
//! Compares a caller-supplied analytic gradient against a centered
//! finite-difference reference, and checks approximated Hessians for the
//! symmetry a twice continuously differentiable objective must have.

use crate::{
    error::{OptimizerError, OptimizerResult},
    finite_difference::FiniteDifference,
    types::{constants, DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Results from gradient checking.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientCheckResult<T> {
    /// Maximum component-wise absolute error
    pub max_error: T,
    /// Index of the component with the largest error
    pub worst_component: Option<usize>,
    /// Whether the check passed
    pub passed: bool,
    /// Individual errors for each component
    pub component_errors: Vec<T>,
}

/// Checks derivative implementations against finite differences.
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Checks an analytic gradient against a centered finite difference.
    ///
    /// The reference step is `∛ε`, which balances truncation against
    /// rounding error for centered quotients.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `grad_f(x)` does not have the length
    /// of `x`.
    pub fn check_gradient<T, F, G>(
        f: &F,
        grad_f: &G,
        x: &DVector<T>,
        tol: T,
    ) -> OptimizerResult<GradientCheckResult<T>>
    where
        T: Scalar,
        F: Fn(&DVector<T>) -> T + Sync + ?Sized,
        G: Fn(&DVector<T>) -> DVector<T> + ?Sized,
    {
        let analytical = grad_f(x);
        if analytical.len() != x.len() {
            return Err(OptimizerError::dimension_mismatch(x.len(), analytical.len()));
        }

        let h = <T as Float>::cbrt(constants::epsilon::<T>());
        let reference = FiniteDifference::centered(h).gradient_at(f, x);

        let component_errors: Vec<T> = analytical
            .iter()
            .zip(reference.iter())
            .map(|(a, r)| <T as Float>::abs(*a - *r))
            .collect();

        let (worst_component, max_error) = component_errors
            .iter()
            .copied()
            .enumerate()
            .fold((None, T::zero()), |(idx, best), (i, e)| {
                if idx.is_none() || e > best {
                    (Some(i), e)
                } else {
                    (idx, best)
                }
            });

        Ok(GradientCheckResult {
            max_error,
            worst_component,
            passed: max_error < tol,
            component_errors,
        })
    }

    /// Checks that a square matrix is symmetric within `tol`.
    ///
    /// Returns `(is_symmetric, max_asymmetry)`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the matrix is not square.
    pub fn check_hessian_symmetry<T: Scalar>(hessian: &DMatrix<T>, tol: T) -> OptimizerResult<(bool, T)> {
        let (rows, cols) = hessian.shape();
        if rows != cols {
            return Err(OptimizerError::dimension_mismatch(rows, cols));
        }

        let mut max_asymmetry = T::zero();
        for i in 0..rows {
            for j in (i + 1)..cols {
                let asymmetry = <T as Float>::abs(hessian[(i, j)] - hessian[(j, i)]);
                max_asymmetry = <T as Float>::max(max_asymmetry, asymmetry);
            }
        }

        Ok((max_asymmetry < tol, max_asymmetry))
    }
}
