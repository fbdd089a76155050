//! Run configuration loaded from JSON.
//!
//! A [`RunConfig`] holds everything a batch run needs besides the objective
//! itself: the shared settings, the finite-difference settings, and which
//! methods to run with which rules. Every key is optional and falls back to
//! its default, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!     "initial_condition": [0.0, 0.0],
//!     "fd_t": "Centered",
//!     "h": 0.01,
//!     "gradient_method_t": "Armijo rule",
//!     "heavy_ball_t": "Inverse decay",
//!     "heavy_ball_s": "Dynamic",
//!     "adam": false
//! }
//! ```
//!
//! Rule and strategy names are parsed straight into their enums, so a typo
//! fails at load time rather than when the method is dispatched.

use crate::{
    adam::AdamConfig,
    gradient_descent::GradientDescentConfig,
    heavy_ball::HeavyBallConfig,
    method::{MethodConfig, Solver},
    nesterov::NesterovConfig,
};
use descentopt_core::{
    error::OptimizerError,
    finite_difference::{self, DifferenceStencil},
    momentum::MomentumStrategy,
    parameters::Parameters,
    step_size::{AdamRule, DescentRule, MomentumStepRule},
    types::{constants, DVector, ScalarFunction, VectorFunction},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a configuration or building its solvers.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or names an unknown rule.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// `fd` is off and no analytic gradient was supplied.
    #[error("Finite differences are disabled but no analytic gradient was given")]
    MissingGradient,

    /// The settings violate an optimizer invariant.
    #[error(transparent)]
    Invalid(#[from] OptimizerError),
}

/// Settings of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Starting point
    pub initial_condition: Vec<f64>,
    /// Residual tolerance
    pub tolerance_r: f64,
    /// Step length tolerance
    pub tolerance_s: f64,
    /// Initial step size
    pub initial_step: f64,
    /// Maximum number of updates
    pub max_iterations: usize,
    /// Decay rate for the exponential and inverse rules
    pub mu: f64,
    /// Step size floor
    pub minimum_step: f64,

    /// Approximate the gradient by finite differences
    pub fd: bool,
    /// Stencil used when `fd` is set
    pub fd_t: DifferenceStencil,
    /// Stencil step
    pub h: f64,

    /// Armijo parameter
    pub sigma: f64,
    /// Heavy ball memory parameter
    pub eta: f64,
    /// Nesterov memory parameter
    pub eta_nest: f64,
    /// Adam first moment decay
    pub beta1: f64,
    /// Adam second moment decay
    pub beta2: f64,

    /// Run gradient descent
    pub gradient_descent: bool,
    /// Run heavy ball
    pub heavy_ball: bool,
    /// Run Nesterov
    pub nesterov: bool,
    /// Run Adam
    pub adam: bool,

    /// Gradient descent step size rule
    pub gradient_method_t: DescentRule,
    /// Heavy ball step size rule
    pub heavy_ball_t: MomentumStepRule,
    /// Heavy ball momentum strategy
    pub heavy_ball_s: MomentumStrategy,
    /// Nesterov step size rule
    pub nesterov_t: MomentumStepRule,
    /// Nesterov momentum strategy
    pub nesterov_s: MomentumStrategy,
    /// Adam step size rule
    pub adam_t: AdamRule,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_condition: vec![0.0, 0.0],
            tolerance_r: 1e-6,
            tolerance_s: 1e-6,
            initial_step: 1.0,
            max_iterations: 1000,
            mu: 0.2,
            minimum_step: 1e-2,
            fd: true,
            fd_t: DifferenceStencil::Centered,
            h: 1e-2,
            sigma: 0.1,
            eta: 0.9,
            eta_nest: 0.9,
            beta1: 0.9,
            beta2: 0.999,
            gradient_descent: true,
            heavy_ball: true,
            nesterov: true,
            adam: true,
            gradient_method_t: DescentRule::Armijo,
            heavy_ball_t: MomentumStepRule::ExponentialDecay,
            heavy_ball_s: MomentumStrategy::Constant,
            nesterov_t: MomentumStepRule::ExponentialDecay,
            nesterov_s: MomentumStrategy::Constant,
            adam_t: AdamRule::Dynamic,
        }
    }
}

impl RunConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Builds the shared parameter record for objective `f`.
    ///
    /// With `fd` set the gradient is synthesised from `f` with the configured
    /// stencil and `analytic_gradient` is ignored.
    ///
    /// # Errors
    ///
    /// `MissingGradient` if `fd` is off and no gradient was given, `Invalid`
    /// if the shared settings are out of range.
    pub fn parameters(
        &self,
        f: ScalarFunction<f64>,
        analytic_gradient: Option<VectorFunction<f64>>,
    ) -> Result<Parameters<f64>, ConfigError> {
        let grad_f = if self.fd {
            finite_difference::gradient(f.clone(), self.h, self.fd_t)
        } else {
            analytic_gradient.ok_or(ConfigError::MissingGradient)?
        };

        let params = Parameters::new(f, grad_f, DVector::from_vec(self.initial_condition.clone()))
            .with_tolerance_r(self.tolerance_r)
            .with_tolerance_s(self.tolerance_s)
            .with_initial_step(self.initial_step)
            .with_max_iterations(self.max_iterations)
            .with_minimum_step(self.minimum_step);
        params.validate()?;
        Ok(params)
    }

    /// The enabled methods, in the order gradient descent, heavy ball,
    /// Nesterov, Adam.
    pub fn methods(&self) -> Vec<MethodConfig<f64>> {
        let mut methods = Vec::with_capacity(4);
        if self.gradient_descent {
            methods.push(MethodConfig::GradientDescent(GradientDescentConfig {
                rule: self.gradient_method_t,
                sigma: self.sigma,
                mu: self.mu,
            }));
        }
        if self.heavy_ball {
            methods.push(MethodConfig::HeavyBall(HeavyBallConfig {
                rule: self.heavy_ball_t,
                strategy: self.heavy_ball_s,
                mu: self.mu,
                eta: self.eta,
            }));
        }
        if self.nesterov {
            methods.push(MethodConfig::Nesterov(NesterovConfig {
                rule: self.nesterov_t,
                strategy: self.nesterov_s,
                mu: self.mu,
                eta: self.eta_nest,
            }));
        }
        if self.adam {
            methods.push(MethodConfig::Adam(AdamConfig {
                rule: self.adam_t,
                mu: self.mu,
                beta1: self.beta1,
                beta2: self.beta2,
                epsilon: constants::adam_epsilon(),
            }));
        }
        methods
    }

    /// Builds one solver per enabled method, all sharing the same
    /// parameter record.
    pub fn solvers(
        &self,
        f: ScalarFunction<f64>,
        analytic_gradient: Option<VectorFunction<f64>>,
    ) -> Result<Vec<Solver<f64>>, ConfigError> {
        let params = self.parameters(f, analytic_gradient)?;
        self.methods()
            .into_iter()
            .map(|method| method.into_solver(params.clone()).map_err(ConfigError::from))
            .collect()
    }
}
