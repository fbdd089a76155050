//! Core types and policies for first-order descent optimization.
//!
//! This crate provides the building blocks shared by the descent methods of
//! `descentopt-optim`: the scalar and vector types, a finite-difference
//! differentiation engine, the convergence policy, step size and momentum
//! policies, the shared parameter record and the optimizer interface.
//!
//! # Modules
//!
//! - [`callback`]: Progress callbacks and early stopping
//! - [`convergence`]: Convergence checks and optimization results
//! - [`error`]: Error types
//! - [`finite_difference`]: Gradient, Hessian and Jacobian approximation
//! - [`momentum`]: Heavy ball, Nesterov and Adam state
//! - [`optimizer`]: The optimizer trait
//! - [`parallel`]: Parallel fan-out configuration
//! - [`parameters`]: Parameters shared by every method
//! - [`step_size`]: Step size rules and Armijo backtracking
//! - [`types`]: Type aliases and numerical constants
//! - [`validation`]: Derivative checks

pub mod callback;
pub mod convergence;
pub mod error;
pub mod finite_difference;
pub mod momentum;
pub mod optimizer;
pub mod parallel;
pub mod parameters;
pub mod step_size;
pub mod types;
pub mod validation;

// Re-export commonly used items at the crate root
pub use error::{OptimizerError, OptimizerResult};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use descentopt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::callback::{
        CallbackInfo, HistoryCallback, IterationRecord, NoOpCallback, OptimizationCallback,
        PrintProgressCallback,
    };
    pub use crate::convergence::{ConvergenceMonitor, ConvergenceStatus, OptimizationResult};
    pub use crate::error::{OptimizerError, OptimizerResult};
    pub use crate::finite_difference::{
        gradient, hessian, jacobian, partial_derivative, DifferenceStencil, FiniteDifference,
    };
    pub use crate::momentum::{
        AdamDirection, AdamMoments, HeavyBallMomentum, MomentumStrategy, NesterovMomentum,
    };
    pub use crate::optimizer::Optimizer;
    pub use crate::parallel::ParallelConfig;
    pub use crate::parameters::Parameters;
    pub use crate::step_size::{
        AdamRule, ArmijoBacktracking, ArmijoStep, DescentRule, MomentumStepRule, StepSizeState,
    };
    pub use crate::types::{
        constants, scalar_function, vector_function, DMatrix, DVector, MatrixFunction, Point,
        Scalar, ScalarFunction, VectorFunction,
    };
    pub use crate::validation::{DerivativeChecker, GradientCheckResult};
}
