use crate::error::TrainError;

use ndarray::prelude::*;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default bias for freshly initialized models, a small positive nudge so
/// the very first step output is deterministic.
pub const DEFAULT_BIAS: f64 = 0.05;

/// Raw output crosses this value and the step output flips to 1.
pub const STEP_THRESHOLD: f64 = 0.5;

/// One weight per input feature plus a scalar bias. This is a plain value:
/// the trainer hands out snapshots of it and never a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub weights: Array1<f64>,
    pub bias: f64,
}

impl Parameters {
    pub fn new(weights: Array1<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// All-zero weights and the default small positive bias.
    pub fn zeroed(dim: usize) -> Self {
        Self {
            weights: Array1::zeros(dim),
            bias: DEFAULT_BIAS,
        }
    }

    /// Uniform weights and bias in (-0.01, 0.01).
    pub fn random(dim: usize) -> Self {
        Self {
            weights: Array1::random(dim, Uniform::new(-0.01, 0.01)),
            bias: Array1::random(1, Uniform::new(-0.01, 0.01))[0],
        }
    }

    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    /// Raw linear output: dot(weights, features) + bias.
    pub fn activation(&self, features: &Array1<f64>) -> f64 {
        self.weights.dot(features) + self.bias
    }

    /// Hard 0/1 classification of an unseen input. Pure; dimension-checked.
    pub fn predict(&self, features: &Array1<f64>) -> Result<bool, TrainError> {
        if features.len() != self.dim() {
            return Err(TrainError::InputDimension {
                expected: self.dim(),
                found: features.len(),
            });
        }
        Ok(step(self.activation(features)) == 1.0)
    }

    /// False once any weight or the bias has diverged to NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (j, w) in self.weights.iter().enumerate() {
            if j > 0 {
                write!(f, " ")?;
            }
            write!(f, "{w:+.3}")?;
        }
        write!(f, " | bias {:+.3}", self.bias)
    }
}

/// Hard threshold on a raw output.
pub fn step(raw: f64) -> f64 {
    if raw >= STEP_THRESHOLD {
        1.0
    } else {
        0.0
    }
}
