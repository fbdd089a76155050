//! Method selection by tag.
//!
//! [`MethodConfig`] is the closed set of method settings. Turning one into a
//! [`Solver`] pairs it with a [`Parameters`] record; the solver then runs
//! through the [`Optimizer`] trait without the caller knowing which method
//! it holds.

use crate::{
    adam::{Adam, AdamConfig},
    gradient_descent::{GradientDescent, GradientDescentConfig},
    heavy_ball::{HeavyBall, HeavyBallConfig},
    nesterov::{Nesterov, NesterovConfig},
};
use descentopt_core::{
    callback::OptimizationCallback,
    convergence::OptimizationResult,
    error::OptimizerResult,
    optimizer::Optimizer,
    parameters::Parameters,
    types::Scalar,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings of one descent method.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MethodConfig<T> {
    /// Gradient descent
    GradientDescent(GradientDescentConfig<T>),
    /// Heavy ball
    HeavyBall(HeavyBallConfig<T>),
    /// Nesterov
    Nesterov(NesterovConfig<T>),
    /// Adam
    Adam(AdamConfig<T>),
}

impl<T: Scalar> MethodConfig<T> {
    /// Display name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GradientDescent(_) => "Gradient Descent",
            Self::HeavyBall(_) => "Heavy Ball",
            Self::Nesterov(_) => "Nesterov",
            Self::Adam(_) => "Adam",
        }
    }

    /// Builds the optimizer for these settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if either record is invalid.
    pub fn into_solver(self, params: Parameters<T>) -> OptimizerResult<Solver<T>> {
        Ok(match self {
            Self::GradientDescent(config) => Solver::GradientDescent(GradientDescent::new(params, config)?),
            Self::HeavyBall(config) => Solver::HeavyBall(HeavyBall::new(params, config)?),
            Self::Nesterov(config) => Solver::Nesterov(Nesterov::new(params, config)?),
            Self::Adam(config) => Solver::Adam(Adam::new(params, config)?),
        })
    }
}

impl<T> From<GradientDescentConfig<T>> for MethodConfig<T> {
    fn from(config: GradientDescentConfig<T>) -> Self {
        Self::GradientDescent(config)
    }
}

impl<T> From<HeavyBallConfig<T>> for MethodConfig<T> {
    fn from(config: HeavyBallConfig<T>) -> Self {
        Self::HeavyBall(config)
    }
}

impl<T> From<NesterovConfig<T>> for MethodConfig<T> {
    fn from(config: NesterovConfig<T>) -> Self {
        Self::Nesterov(config)
    }
}

impl<T> From<AdamConfig<T>> for MethodConfig<T> {
    fn from(config: AdamConfig<T>) -> Self {
        Self::Adam(config)
    }
}

/// Any of the descent optimizers.
#[derive(Debug, Clone)]
pub enum Solver<T: Scalar> {
    /// Gradient descent
    GradientDescent(GradientDescent<T>),
    /// Heavy ball
    HeavyBall(HeavyBall<T>),
    /// Nesterov
    Nesterov(Nesterov<T>),
    /// Adam
    Adam(Adam<T>),
}

impl<T: Scalar> Solver<T> {
    fn inner(&self) -> &dyn Optimizer<T> {
        match self {
            Self::GradientDescent(optimizer) => optimizer,
            Self::HeavyBall(optimizer) => optimizer,
            Self::Nesterov(optimizer) => optimizer,
            Self::Adam(optimizer) => optimizer,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Optimizer<T> {
        match self {
            Self::GradientDescent(optimizer) => optimizer,
            Self::HeavyBall(optimizer) => optimizer,
            Self::Nesterov(optimizer) => optimizer,
            Self::Adam(optimizer) => optimizer,
        }
    }
}

impl<T: Scalar> Optimizer<T> for Solver<T> {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn parameters(&self) -> &Parameters<T> {
        self.inner().parameters()
    }

    fn parameters_mut(&mut self) -> &mut Parameters<T> {
        self.inner_mut().parameters_mut()
    }

    fn minimize_with_callback(
        &self,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T>> {
        self.inner().minimize_with_callback(callback)
    }
}

impl<T: Scalar> fmt::Display for Solver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GradientDescent(optimizer) => fmt::Display::fmt(optimizer, f),
            Self::HeavyBall(optimizer) => fmt::Display::fmt(optimizer, f),
            Self::Nesterov(optimizer) => fmt::Display::fmt(optimizer, f),
            Self::Adam(optimizer) => fmt::Display::fmt(optimizer, f),
        }
    }
}
