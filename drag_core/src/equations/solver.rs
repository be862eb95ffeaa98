//! # Newton-Raphson Root Finder
//!
//! Scalar Newton iteration with an analytic derivative, used by the implicit
//! skin friction laws. The iteration is capped and never fails: when it does
//! not converge the iterate with the smallest residual is returned together
//! with a status the caller can log.
//!
//! Friction coefficients are strictly positive, so a step that would leave
//! the positive axis is damped to half the current iterate instead.

use serde::{Deserialize, Serialize};

/// Iteration controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonSettings {
    /// Converged when |g(x)| or the relative step drops below this
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        NewtonSettings {
            tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewtonStatus {
    Converged,
    /// Hit the iteration cap; `root` is the best iterate seen
    MaxIterations,
    /// Residual or derivative became NaN/inf or the derivative vanished
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSolution {
    pub root: f64,
    pub iterations: usize,
    pub status: NewtonStatus,
}

impl NewtonSolution {
    pub fn converged(&self) -> bool {
        self.status == NewtonStatus::Converged
    }
}

/// Solve g(x) = 0 starting from `guess`.
pub fn newton_raphson<G, D>(g: G, dg: D, guess: f64, settings: &NewtonSettings) -> NewtonSolution
where
    G: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = guess;
    let mut best = (guess, f64::INFINITY);

    for iteration in 0..settings.max_iterations {
        let value = g(x);
        let slope = dg(x);

        if !value.is_finite() || !slope.is_finite() || slope == 0.0 {
            let root = if best.1.is_finite() { best.0 } else { x };
            return NewtonSolution {
                root,
                iterations: iteration,
                status: NewtonStatus::NonFinite,
            };
        }

        if value.abs() < best.1 {
            best = (x, value.abs());
        }
        if value.abs() <= settings.tolerance {
            return NewtonSolution {
                root: x,
                iterations: iteration,
                status: NewtonStatus::Converged,
            };
        }

        let mut next = x - value / slope;
        if next <= 0.0 {
            next = 0.5 * x;
        }

        if (next - x).abs() <= settings.tolerance * x.abs().max(f64::MIN_POSITIVE) {
            return NewtonSolution {
                root: next,
                iterations: iteration + 1,
                status: NewtonStatus::Converged,
            };
        }
        x = next;
    }

    NewtonSolution {
        root: best.0,
        iterations: settings.max_iterations,
        status: NewtonStatus::MaxIterations,
    }
}
