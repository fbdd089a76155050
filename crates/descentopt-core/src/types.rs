//! Type definitions and aliases for descent optimization.
//!
//! This module provides the scalar trait shared by every algorithm, the
//! dense vector/matrix aliases used for points and Hessians, and the
//! function-object aliases through which objectives are handed to the
//! optimizers.

use nalgebra::{OMatrix, OVector, Dyn, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// Trait for scalar types used in optimization (f32 or f64).
///
/// This trait combines all the numeric traits required by the finite
/// difference engine and the descent algorithms.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Guard added to the Adam denominator `√v̂ + ε`.
    const ADAM_EPSILON: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Convert from usize (for iteration counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const ADAM_EPSILON: Self = 1e-8;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const ADAM_EPSILON: Self = 1e-8;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

/// A point of the search space: a dense real vector of fixed dimension.
pub type Point<T> = DVector<T>;

/// Opaque objective `Point → real`.
pub type ScalarFunction<T> = Arc<dyn Fn(&DVector<T>) -> T + Send + Sync>;

/// Opaque vector field `Point → Point`, typically a gradient.
pub type VectorFunction<T> = Arc<dyn Fn(&DVector<T>) -> DVector<T> + Send + Sync>;

/// Opaque matrix field `Point → Matrix`, typically a Hessian or Jacobian.
pub type MatrixFunction<T> = Arc<dyn Fn(&DVector<T>) -> DMatrix<T> + Send + Sync>;

/// Wraps a closure into a [`ScalarFunction`].
pub fn scalar_function<T, F>(f: F) -> ScalarFunction<T>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> T + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure into a [`VectorFunction`].
pub fn vector_function<T, F>(f: F) -> VectorFunction<T>
where
    T: Scalar,
    F: Fn(&DVector<T>) -> DVector<T> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Numerical constants for different precision levels.
pub mod constants {
    use super::Scalar;

    /// Get machine epsilon for the given scalar type.
    pub fn epsilon<T: Scalar>() -> T {
        T::EPSILON
    }

    /// Get the Adam denominator guard.
    pub fn adam_epsilon<T: Scalar>() -> T {
        T::ADAM_EPSILON
    }

    /// One half.
    pub fn half<T: Scalar>() -> T {
        <T as Scalar>::from_f64(0.5)
    }

    /// Two.
    pub fn two<T: Scalar>() -> T {
        <T as Scalar>::from_f64(2.0)
    }
}
