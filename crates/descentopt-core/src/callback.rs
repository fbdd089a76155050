//! Callback support for descent algorithms.
//!
//! Callbacks observe a run as it progresses and may stop it early. They are
//! the only reporting channel of the optimizers: nothing is printed unless a
//! printing callback is attached.

use crate::{
    convergence::ConvergenceStatus,
    error::OptimizerResult,
    types::{DVector, Scalar},
};
use std::time::Duration;

/// Information passed to callbacks during optimization.
#[derive(Clone, Debug)]
pub struct CallbackInfo<T: Scalar> {
    /// Number of completed updates
    pub iteration: usize,
    /// Current iterate
    pub point: DVector<T>,
    /// Gradient norm observed at the start of the iteration
    pub residual: T,
    /// Step length of the last update, if one was made
    pub step_length: Option<T>,
    /// Step size used by the last update
    pub step_size: T,
    /// Elapsed time since optimization start
    pub elapsed: Duration,
    /// Run state after this iteration
    pub status: ConvergenceStatus,
}

/// Trait for optimization callbacks.
///
/// Callbacks allow monitoring and controlling the optimization process.
/// They can be used for logging, recording traces, early stopping, etc.
pub trait OptimizationCallback<T: Scalar>: Send {
    /// Called at the start of optimization.
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        Ok(())
    }

    /// Called after each completed update.
    ///
    /// Returns `true` to continue optimization, `false` to stop early.
    fn on_iteration_end(&mut self, info: &CallbackInfo<T>) -> OptimizerResult<bool> {
        let _ = info;
        Ok(true)
    }

    /// Called once the run has terminated.
    fn on_optimization_end(&mut self, info: &CallbackInfo<T>) -> OptimizerResult<()> {
        let _ = info;
        Ok(())
    }
}

/// A no-op callback that does nothing.
pub struct NoOpCallback;

impl<T: Scalar> OptimizationCallback<T> for NoOpCallback {}

/// A callback that prints progress to stdout.
pub struct PrintProgressCallback {
    print_every: usize,
}

impl PrintProgressCallback {
    /// Create a new progress printing callback.
    pub fn new(print_every: usize) -> Self {
        Self {
            print_every: print_every.max(1),
        }
    }
}

impl<T: Scalar> OptimizationCallback<T> for PrintProgressCallback {
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        println!("Starting optimization...");
        Ok(())
    }

    fn on_iteration_end(&mut self, info: &CallbackInfo<T>) -> OptimizerResult<bool> {
        if info.iteration % self.print_every == 0 {
            println!(
                "Iteration {}: residual = {}, step size = {}, step length = {:?}",
                info.iteration, info.residual, info.step_size, info.step_length
            );
        }
        Ok(true)
    }

    fn on_optimization_end(&mut self, info: &CallbackInfo<T>) -> OptimizerResult<()> {
        match info.status {
            ConvergenceStatus::ConvergedResidual => println!(
                "Converged in {} iterations thanks to residual criterion.",
                info.iteration
            ),
            ConvergenceStatus::ConvergedStep => println!(
                "Converged in {} iterations thanks to step size criterion.",
                info.iteration
            ),
            ConvergenceStatus::MaxIterationsReached => {
                println!("Not converged (max_iteration = {})", info.iteration)
            }
            status => println!("Stopped after {} iterations: {status}", info.iteration),
        }
        Ok(())
    }
}

/// One recorded iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationRecord<T> {
    /// Number of completed updates
    pub iteration: usize,
    /// Residual at the start of the iteration
    pub residual: T,
    /// Step size used
    pub step_size: T,
    /// Step length of the update
    pub step_length: Option<T>,
}

/// Records every iteration, and optionally stops after a fixed number.
#[derive(Clone, Debug, Default)]
pub struct HistoryCallback<T> {
    /// Recorded iterations, in order
    pub records: Vec<IterationRecord<T>>,
    /// Final status, once the run has ended
    pub final_status: Option<ConvergenceStatus>,
    stop_after: Option<usize>,
}

impl<T: Scalar> HistoryCallback<T> {
    /// Records without interfering.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            final_status: None,
            stop_after: None,
        }
    }

    /// Asks the run to stop once `iterations` updates have completed.
    pub fn stopping_after(iterations: usize) -> Self {
        Self {
            stop_after: Some(iterations),
            ..Self::new()
        }
    }

    /// Recorded step sizes.
    pub fn step_sizes(&self) -> Vec<T> {
        self.records.iter().map(|r| r.step_size).collect()
    }

    /// Recorded residuals.
    pub fn residuals(&self) -> Vec<T> {
        self.records.iter().map(|r| r.residual).collect()
    }
}

impl<T: Scalar> OptimizationCallback<T> for HistoryCallback<T> {
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        self.records.clear();
        self.final_status = None;
        Ok(())
    }

    fn on_iteration_end(&mut self, info: &CallbackInfo<T>) -> OptimizerResult<bool> {
        self.records.push(IterationRecord {
            iteration: info.iteration,
            residual: info.residual,
            step_size: info.step_size,
            step_length: info.step_length,
        });
        Ok(self.stop_after.map_or(true, |limit| info.iteration < limit))
    }

    fn on_optimization_end(&mut self, info: &CallbackInfo<T>) -> OptimizerResult<()> {
        self.final_status = Some(info.status);
        Ok(())
    }
}
