//! First-order descent optimizers.
//!
//! This crate provides the four descent methods built on `descentopt-core`,
//! together with tag-based method selection, JSON run configuration and
//! result reporting.
//!
//! # Available Optimizers
//!
//! - **Gradient descent**: exponential or inverse step decay, or Armijo backtracking
//! - **Heavy ball**: Polyak momentum with a constant or step-dependent coefficient
//! - **Nesterov**: accelerated gradient evaluated at a lookahead point
//! - **Adam**: bias-corrected adaptive moment estimation
//!
//! All four run the same loop and share its stopping rules; they differ only
//! in how a step is taken.
//!
//! # Examples
//!
//! ```rust
//! use descentopt_core::prelude::*;
//! use descentopt_optim::{HeavyBall, HeavyBallConfig};
//!
//! let params = Parameters::new(
//!     scalar_function(|x: &DVector<f64>| x[0] * x[0] + 4.0 * x[1] * x[1]),
//!     vector_function(|x: &DVector<f64>| DVector::from_vec(vec![2.0 * x[0], 8.0 * x[1]])),
//!     DVector::from_vec(vec![1.0, 1.0]),
//! );
//! let optimizer = HeavyBall::new(params, HeavyBallConfig::new().with_eta(0.5)).unwrap();
//! let result = optimizer.minimize().unwrap();
//!
//! // Non-convergence is a status, never an error.
//! println!("{}", result.status);
//! ```

pub mod adam;
#[cfg(feature = "serde")]
pub mod config;
pub(crate) mod descent;
pub mod gradient_descent;
pub mod heavy_ball;
pub mod method;
pub mod nesterov;
pub mod report;

// Re-export main optimizers for convenience
pub use adam::{Adam, AdamConfig};
#[cfg(feature = "serde")]
pub use config::{ConfigError, RunConfig};
pub use gradient_descent::{GradientDescent, GradientDescentConfig};
pub use heavy_ball::{HeavyBall, HeavyBallConfig};
pub use method::{MethodConfig, Solver};
pub use nesterov::{Nesterov, NesterovConfig};
pub use report::MinimumReport;

// Re-export commonly used items from core
pub use descentopt_core::{
    convergence::{ConvergenceStatus, OptimizationResult},
    optimizer::Optimizer,
    parameters::Parameters,
    step_size::{AdamRule, DescentRule, MomentumStepRule},
    momentum::MomentumStrategy,
};
