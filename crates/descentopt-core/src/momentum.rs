//! Momentum state for the accelerated methods.
//!
//! Holds the per-run memory of heavy ball (velocity), Nesterov (lookahead
//! point) and Adam (first and second moment estimates). Each state is created
//! at the start of a run and dropped at its end.

use crate::types::{DVector, Scalar};
use num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the momentum coefficient is chosen on each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MomentumStrategy {
    /// `1 − α` while the step is below one, `η` otherwise.
    Dynamic,
    /// Always `η`.
    #[default]
    Constant,
}

impl MomentumStrategy {
    /// Momentum coefficient for the current step `α` and memory parameter `η`.
    pub fn coefficient<T: Scalar>(self, step: T, eta: T) -> T {
        match self {
            Self::Dynamic if step < T::one() => T::one() - step,
            _ => eta,
        }
    }
}

impl fmt::Display for MomentumStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dynamic => "dynamic (1 - alpha)",
            Self::Constant => "constant (eta)",
        })
    }
}

/// Heavy ball velocity `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeavyBallMomentum<T: Scalar> {
    velocity: DVector<T>,
}

impl<T: Scalar> HeavyBallMomentum<T> {
    /// Zero velocity in dimension `n`.
    pub fn new(n: usize) -> Self {
        Self {
            velocity: DVector::zeros(n),
        }
    }

    /// The current velocity.
    pub fn velocity(&self) -> &DVector<T> {
        &self.velocity
    }

    /// Applies `d ← c·d − α·ĝ` and `x ← x + d`.
    ///
    /// `direction` is the normalised gradient. Returns `‖d‖`, the step
    /// length measure heavy ball reports.
    pub fn step(&mut self, x: &mut DVector<T>, direction: &DVector<T>, step: T, coefficient: T) -> T {
        self.velocity = &self.velocity * coefficient - direction * step;
        *x += &self.velocity;
        self.velocity.norm()
    }
}

/// Nesterov lookahead point `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct NesterovMomentum<T: Scalar> {
    lookahead: DVector<T>,
}

impl<T: Scalar> NesterovMomentum<T> {
    /// Starts the lookahead at the initial point.
    pub fn new(initial: &DVector<T>) -> Self {
        Self {
            lookahead: initial.clone(),
        }
    }

    /// The point the next update gradient is evaluated at.
    pub fn lookahead(&self) -> &DVector<T> {
        &self.lookahead
    }

    /// Applies `x ← y − α·ĝ(y)` then `y ← x + c·(x − x_prev)`.
    ///
    /// `direction` is the normalised gradient at the lookahead. Returns
    /// `‖x − x_prev‖`.
    pub fn step(&mut self, x: &mut DVector<T>, direction: &DVector<T>, step: T, coefficient: T) -> T {
        let displacement = {
            let next = &self.lookahead - direction * step;
            let displacement = &next - &*x;
            *x = next;
            displacement
        };
        self.lookahead = &*x + &displacement * coefficient;
        displacement.norm()
    }
}

/// Bias-corrected Adam direction for one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct AdamDirection<T: Scalar> {
    /// `m̂ / (√v̂ + ε)`
    pub direction: DVector<T>,
    /// `β₁ᵗ` used for the bias correction
    pub beta1_power: T,
    /// `β₂ᵗ` used for the bias correction
    pub beta2_power: T,
}

/// Adam first and second moment estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct AdamMoments<T: Scalar> {
    /// First moment estimate (mean of gradients)
    pub m: DVector<T>,

    /// Second moment estimate (mean of squared gradients)
    pub v: DVector<T>,

    /// Exponential decay rate for first moment
    pub beta1: T,

    /// Exponential decay rate for second moment
    pub beta2: T,

    /// Small constant for numerical stability
    pub epsilon: T,

    beta1_power: T,
    beta2_power: T,
}

impl<T: Scalar> AdamMoments<T> {
    /// Zero moments in dimension `n`; `t` starts at one.
    pub fn new(n: usize, beta1: T, beta2: T, epsilon: T) -> Self {
        Self {
            m: DVector::zeros(n),
            v: DVector::zeros(n),
            beta1,
            beta2,
            epsilon,
            beta1_power: beta1,
            beta2_power: beta2,
        }
    }

    /// Current `(β₁ᵗ, β₂ᵗ)`.
    pub fn beta_powers(&self) -> (T, T) {
        (self.beta1_power, self.beta2_power)
    }

    /// Folds `gradient` into the moments and returns the corrected
    /// direction, then advances `t`.
    pub fn update(&mut self, gradient: &DVector<T>) -> AdamDirection<T> {
        let one = T::one();
        self.m = &self.m * self.beta1 + gradient * (one - self.beta1);
        self.v = &self.v * self.beta2 + gradient.component_mul(gradient) * (one - self.beta2);

        let m_hat = &self.m / (one - self.beta1_power);
        let v_hat = &self.v / (one - self.beta2_power);
        let epsilon = self.epsilon;
        let denominator = v_hat.map(|vi| <T as Float>::sqrt(vi) + epsilon);

        let result = AdamDirection {
            direction: m_hat.component_div(&denominator),
            beta1_power: self.beta1_power,
            beta2_power: self.beta2_power,
        };

        self.beta1_power = self.beta1_power * self.beta1;
        self.beta2_power = self.beta2_power * self.beta2;
        result
    }
}
