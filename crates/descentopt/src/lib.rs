//! First-order descent optimization.
//!
//! `descentopt` minimises a scalar function of several variables with
//! gradient descent, heavy ball, Nesterov or Adam, using either an analytic
//! gradient or one synthesised by finite differences.
//!
//! This crate re-exports [`descentopt_core`] and [`descentopt_optim`].
//!
//! # Example
//!
//! ```rust
//! use descentopt::prelude::*;
//!
//! // f = 4x₀⁴ + 2x₁² + 2x₀x₁ + 2x₀
//! let f = scalar_function(|x: &DVector<f64>| {
//!     4.0 * x[0].powi(4) + 2.0 * x[1] * x[1] + 2.0 * x[0] * x[1] + 2.0 * x[0]
//! });
//! let grad_f = gradient(f.clone(), 1e-2, DifferenceStencil::Centered);
//!
//! let params = Parameters::new(f, grad_f, DVector::zeros(2));
//! let optimizer = GradientDescent::with_default_config(params).unwrap();
//! let result = optimizer.minimize().unwrap();
//!
//! assert!(result.converged);
//! println!("{}", MinimumReport::from_result(optimizer.parameters(), &result));
//! ```

pub use descentopt_core;
pub use descentopt_optim;
pub use nalgebra;

/// Everything needed to set up and run a minimisation.
pub mod prelude {
    pub use descentopt_core::prelude::*;
    pub use descentopt_optim::{
        Adam, AdamConfig, GradientDescent, GradientDescentConfig, HeavyBall, HeavyBallConfig,
        MethodConfig, MinimumReport, Nesterov, NesterovConfig, Solver,
    };
    #[cfg(feature = "serde")]
    pub use descentopt_optim::{ConfigError, RunConfig};
}
