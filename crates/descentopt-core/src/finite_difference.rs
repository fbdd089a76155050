//! Finite-difference differentiation engine.
//!
//! Turns an opaque scalar function into callable gradient and Hessian
//! approximators, and an opaque vector function into a Jacobian
//! approximator, using forward, backward or centered stencils.
//!
//! # Stencils
//!
//! For a step `h > 0` and the unit vector `eᵢ` along axis `i`:
//!
//! - **Forward**: `(f(x + h·eᵢ) − f(x)) / h`
//! - **Backward**: `(f(x) − f(x − h·eᵢ)) / h`
//! - **Centered**: `(f(x + h·eᵢ) − f(x − h·eᵢ)) / (2h)`
//!
//! One-sided stencils carry an `O(h)` bias; for a convex function the
//! forward quotient overestimates the slope and the backward quotient
//! underestimates it. Centered differences are `O(h²)`.
//!
//! # Second derivatives
//!
//! Row `i` of the Hessian is the gradient of `y ↦ ∂ᵢf(y)` taken with the
//! **opposite** stencil of the one used for `∂ᵢf`. Pairing a forward inner
//! difference with a backward outer difference (and vice versa) cancels the
//! leading one-sided bias term; centered pairs with centered.
//!
//! # Limitations
//!
//! The step `h` is not validated. `h = 0` divides by zero and yields
//! `inf`/`NaN` entries. Panics raised by the supplied function propagate to
//! the caller unchanged, including from parallel workers.

use crate::{
    parallel::ParallelConfig,
    types::{constants, DMatrix, DVector, MatrixFunction, Scalar, ScalarFunction, VectorFunction},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pattern of sample points used to approximate a derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DifferenceStencil {
    /// Samples `x` and `x + h·eᵢ`.
    Forward,
    /// Samples `x − h·eᵢ` and `x`.
    Backward,
    /// Samples `x − h·eᵢ` and `x + h·eᵢ`.
    #[default]
    Centered,
}

impl DifferenceStencil {
    /// Stencil used for the outer derivative when composing second
    /// derivatives: Forward ↔ Backward, Centered ↔ Centered.
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::Centered => Self::Centered,
        }
    }

    /// Whether the stencil samples the function at `x` itself.
    pub fn samples_center(self) -> bool {
        !matches!(self, Self::Centered)
    }
}

impl fmt::Display for DifferenceStencil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "Forward",
            Self::Backward => "Backward",
            Self::Centered => "Centered",
        };
        f.write_str(name)
    }
}

/// Returns `x` moved by `delta` along axis `i`.
fn shifted<T: Scalar>(x: &DVector<T>, i: usize, delta: T) -> DVector<T> {
    let mut moved = x.clone();
    moved[i] += delta;
    moved
}

/// Approximates `∂f/∂xᵢ` at `x`.
///
/// `center` may carry an already computed `f(x)`; it is only consulted by
/// the one-sided stencils.
fn axis_difference<T, F>(
    f: &F,
    x: &DVector<T>,
    i: usize,
    h: T,
    stencil: DifferenceStencil,
    center: Option<T>,
) -> T
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T + ?Sized,
{
    match stencil {
        DifferenceStencil::Forward => {
            let fx = center.unwrap_or_else(|| f(x));
            (f(&shifted(x, i, h)) - fx) / h
        }
        DifferenceStencil::Backward => {
            let fx = center.unwrap_or_else(|| f(x));
            (fx - f(&shifted(x, i, -h))) / h
        }
        DifferenceStencil::Centered => {
            (f(&shifted(x, i, h)) - f(&shifted(x, i, -h))) / (constants::two::<T>() * h)
        }
    }
}

/// Approximates a single partial derivative `∂f/∂xᵢ` at `x`.
pub fn partial_derivative<T, F>(
    f: &F,
    x: &DVector<T>,
    i: usize,
    h: T,
    stencil: DifferenceStencil,
) -> T
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T + ?Sized,
{
    axis_difference(f, x, i, h, stencil, None)
}

/// Finite-difference engine with a fixed step and stencil.
///
/// # Examples
///
/// ```rust
/// use descentopt_core::finite_difference::{DifferenceStencil, FiniteDifference};
/// use nalgebra::DVector;
///
/// let engine = FiniteDifference::new(1e-4, DifferenceStencil::Centered);
/// let f = |x: &DVector<f64>| x[0] * x[0] + x[1] * x[1];
/// let g = engine.gradient_at(&f, &DVector::from_vec(vec![1.0, 1.0]));
/// assert!((g[0] - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteDifference<T: Scalar> {
    /// Perturbation size `h`
    pub step: T,
    /// Stencil for first derivatives
    pub stencil: DifferenceStencil,
    /// Fan-out policy across coordinates
    pub parallel: ParallelConfig,
}

impl<T: Scalar> FiniteDifference<T> {
    /// Creates an engine with the default parallel threshold.
    pub fn new(step: T, stencil: DifferenceStencil) -> Self {
        Self {
            step,
            stencil,
            parallel: ParallelConfig::default(),
        }
    }

    /// Forward differences with step `h`.
    pub fn forward(step: T) -> Self {
        Self::new(step, DifferenceStencil::Forward)
    }

    /// Backward differences with step `h`.
    pub fn backward(step: T) -> Self {
        Self::new(step, DifferenceStencil::Backward)
    }

    /// Centered differences with step `h`.
    pub fn centered(step: T) -> Self {
        Self::new(step, DifferenceStencil::Centered)
    }

    /// Sets the parallel execution policy.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Approximates `∇f(x)`.
    pub fn gradient_at<F>(&self, f: &F, x: &DVector<T>) -> DVector<T>
    where
        F: Fn(&DVector<T>) -> T + Sync + ?Sized,
    {
        let center = self.stencil.samples_center().then(|| f(x));
        let components = self.parallel.map_indices(x.len(), |i| {
            axis_difference(f, x, i, self.step, self.stencil, center)
        });
        DVector::from_vec(components)
    }

    /// Approximates the Hessian of `f` at `x`.
    ///
    /// Row `i` is the gradient, under the opposite stencil, of the `i`-th
    /// component of the finite-difference gradient. Only component `i` of
    /// the inner gradient is evaluated at each outer sample, since it depends
    /// on nothing but the axis-`i` perturbation.
    pub fn hessian_at<F>(&self, f: &F, x: &DVector<T>) -> DMatrix<T>
    where
        F: Fn(&DVector<T>) -> T + Sync + ?Sized,
    {
        let n = x.len();
        let h = self.step;
        let inner = self.stencil;
        let outer = inner.opposite();

        let rows = self.parallel.map_indices(n, |i| {
            let grad_i = |y: &DVector<T>| axis_difference(f, y, i, h, inner, None);
            let center = outer.samples_center().then(|| grad_i(x));
            (0..n)
                .map(|j| axis_difference(&grad_i, x, j, h, outer, center))
                .collect::<Vec<T>>()
        });

        DMatrix::from_fn(n, n, |i, j| rows[i][j])
    }

    /// Approximates the Jacobian of a vector function `g` at `x`.
    ///
    /// Entry `(i, j)` approximates `∂gᵢ/∂xⱼ`; column `j` is the stencil
    /// difference of `g` along axis `j`.
    pub fn jacobian_at<G>(&self, g: &G, x: &DVector<T>) -> DMatrix<T>
    where
        G: Fn(&DVector<T>) -> DVector<T> + Sync + ?Sized,
    {
        let n = x.len();
        let h = self.step;
        let center = self.stencil.samples_center().then(|| g(x));

        let columns = self.parallel.map_indices(n, |j| match self.stencil {
            DifferenceStencil::Forward => {
                let gx = center.as_ref().map_or_else(|| g(x), Clone::clone);
                (g(&shifted(x, j, h)) - gx) / h
            }
            DifferenceStencil::Backward => {
                let gx = center.as_ref().map_or_else(|| g(x), Clone::clone);
                (gx - g(&shifted(x, j, -h))) / h
            }
            DifferenceStencil::Centered => {
                (g(&shifted(x, j, h)) - g(&shifted(x, j, -h))) / (constants::two::<T>() * h)
            }
        });

        if columns.is_empty() {
            return DMatrix::zeros(g(x).len(), 0);
        }
        DMatrix::from_columns(&columns)
    }
}

/// Synthesises a gradient approximator for `f`.
///
/// # Examples
///
/// ```rust
/// use descentopt_core::finite_difference::{gradient, DifferenceStencil};
/// use descentopt_core::types::scalar_function;
/// use nalgebra::DVector;
///
/// let f = scalar_function(|x: &DVector<f64>| x[0].sin() + x[1].sin());
/// let grad_f = gradient(f, 1e-4, DifferenceStencil::Centered);
/// let g = grad_f(&DVector::from_vec(vec![0.0, 0.0]));
/// assert!((g[0] - 1.0).abs() < 1e-6);
/// ```
pub fn gradient<T: Scalar>(f: ScalarFunction<T>, h: T, stencil: DifferenceStencil) -> VectorFunction<T> {
    let engine = FiniteDifference::new(h, stencil);
    Arc::new(move |x: &DVector<T>| engine.gradient_at(f.as_ref(), x))
}

/// Synthesises a Hessian approximator for `f`.
pub fn hessian<T: Scalar>(f: ScalarFunction<T>, h: T, stencil: DifferenceStencil) -> MatrixFunction<T> {
    let engine = FiniteDifference::new(h, stencil);
    Arc::new(move |x: &DVector<T>| engine.hessian_at(f.as_ref(), x))
}

/// Synthesises a Jacobian approximator for the vector function `g`.
pub fn jacobian<T: Scalar>(g: VectorFunction<T>, h: T, stencil: DifferenceStencil) -> MatrixFunction<T> {
    let engine = FiniteDifference::new(h, stencil);
    Arc::new(move |x: &DVector<T>| engine.jacobian_at(g.as_ref(), x))
}
