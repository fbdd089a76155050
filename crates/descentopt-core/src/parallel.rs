//! Parallel fan-out for per-coordinate work.
//!
//! Finite-difference gradients, Jacobians and Hessian rows are made of
//! independent per-coordinate evaluations. Above a dimension threshold they
//! are mapped over a Rayon parallel iterator and joined in index order, so
//! the parallel and sequential paths produce identical vectors.

use rayon::prelude::*;

/// Configuration for parallel execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Minimum dimension to trigger parallel execution
    pub min_dimension_for_parallel: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            min_dimension_for_parallel: 64,
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always evaluate sequentially.
    pub fn sequential() -> Self {
        Self {
            min_dimension_for_parallel: usize::MAX,
        }
    }

    /// Always fan out, whatever the dimension.
    pub fn always() -> Self {
        Self {
            min_dimension_for_parallel: 0,
        }
    }

    /// Set the minimum dimension for parallel execution.
    pub fn with_min_dimension(mut self, min_dim: usize) -> Self {
        self.min_dimension_for_parallel = min_dim;
        self
    }

    /// Check if parallel execution should be used for given dimension.
    pub fn should_parallelize(&self, dimension: usize) -> bool {
        dimension >= self.min_dimension_for_parallel
    }

    /// Evaluates `op(i)` for every `i in 0..n` and collects the results in
    /// index order.
    pub fn map_indices<R, F>(&self, n: usize, op: F) -> Vec<R>
    where
        R: Send,
        F: Fn(usize) -> R + Sync + Send,
    {
        if self.should_parallelize(n) {
            (0..n).into_par_iter().map(op).collect()
        } else {
            (0..n).map(op).collect()
        }
    }
}
