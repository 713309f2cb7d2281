use crate::error::TrainError;

use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// One labeled feature vector. `target` is a binary desired label in step
/// mode, or the value the raw output is driven towards in linear mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    features: Array1<f64>,
    target: f64,
}

impl TrainingExample {
    pub fn new(features: Array1<f64>, target: f64) -> Self {
        Self { features, target }
    }

    /// Builds an example from a bit pattern whose trailing bit is the label.
    pub fn from_bits(bits: &[u8]) -> Self {
        assert!(bits.len() >= 2, "pattern needs at least one feature bit and a label bit");
        let (label, pixels) = bits.split_last().unwrap();
        Self {
            features: pixels.iter().map(|&b| f64::from(b)).collect(),
            target: f64::from(*label),
        }
    }

    /// A 2-D point the fitted line should pass through: desired output 0.
    pub fn zero_target(x: f64, y: f64) -> Self {
        Self {
            features: array![x, y],
            target: 0.0,
        }
    }

    pub fn features(&self) -> &Array1<f64> {
        &self.features
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// A non-empty, dimension-consistent batch of examples, fully materialized
/// before training starts. The invariants are checked once here so the
/// trainer never sees a malformed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    examples: Vec<TrainingExample>,
}

impl TrainingSet {
    pub fn new(examples: Vec<TrainingExample>) -> Result<Self, TrainError> {
        let dim = match examples.first() {
            Some(first) => first.dim(),
            None => return Err(TrainError::EmptyTrainingSet),
        };
        for (index, example) in examples.iter().enumerate() {
            if example.dim() != dim {
                return Err(TrainError::ExampleDimension {
                    index,
                    expected: dim,
                    found: example.dim(),
                });
            }
        }
        Ok(Self { examples })
    }

    /// Labeled-bit datasets: each row's trailing bit is the desired label.
    pub fn from_patterns<const N: usize>(patterns: &[[u8; N]]) -> Result<Self, TrainError> {
        Self::new(patterns.iter().map(|p| TrainingExample::from_bits(p)).collect())
    }

    /// Zero-target 2-D point clouds for line fitting.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self, TrainError> {
        Self::new(
            points
                .iter()
                .map(|&(x, y)| TrainingExample::zero_target(x, y))
                .collect(),
        )
    }

    pub fn dim(&self) -> usize {
        self.examples[0].dim()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Always false: emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainingExample> {
        self.examples.iter()
    }
}

/// 4x5 pixel grids for the letters A-E, 20 pixels plus a trailing bit
/// marking whether the pattern is a 'B'.
pub mod letters {
    pub const PATTERN_WIDTH: usize = 4;

    pub const A: [u8; 21] = [
        0, 1, 1, 0, 1, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 0, 0, 1, 0,
    ];
    pub const B: [u8; 21] = [
        1, 1, 1, 0, 1, 0, 0, 1, 1, 1, 1, 0, 1, 0, 0, 1, 1, 1, 1, 0, 1,
    ];
    pub const C: [u8; 21] = [
        0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1, 1, 1, 0,
    ];
    pub const D: [u8; 21] = [
        1, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 1, 1, 0, 0,
    ];
    pub const E: [u8; 21] = [
        1, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1, 0, 1, 0, 0, 0, 1, 1, 1, 1, 0,
    ];

    pub const ALL: [[u8; 21]; 5] = [A, B, C, D, E];

    /// A 'B' with two pixels flipped, the demo's unseen input.
    pub const DAMAGED_B: [u8; 20] = [
        0, 1, 1, 0, 0, 0, 0, 1, 1, 1, 1, 0, 1, 0, 0, 1, 1, 1, 1, 0,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bits_splits_trailing_label() {
        let example = TrainingExample::from_bits(&[1, 0, 1, 1]);
        assert_eq!(example.features(), &array![1.0, 0.0, 1.0]);
        assert_eq!(example.target(), 1.0);
    }

    #[test]
    fn zero_target_point_has_dim_two() {
        let example = TrainingExample::zero_target(2.5, -1.0);
        assert_eq!(example.dim(), 2);
        assert_eq!(example.target(), 0.0);
        assert_eq!(example.features(), &array![2.5, -1.0]);
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            TrainingSet::new(Vec::new()).unwrap_err(),
            TrainError::EmptyTrainingSet
        );
    }

    #[test]
    fn ragged_set_is_rejected() {
        let err = TrainingSet::new(vec![
            TrainingExample::new(array![1.0, 0.0], 1.0),
            TrainingExample::new(array![1.0, 0.0, 1.0], 0.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TrainError::ExampleDimension {
                index: 1,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn letter_patterns_build_a_twenty_dim_set() {
        let set = TrainingSet::from_patterns(&letters::ALL).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.dim(), 20);
        // only 'B' carries the positive label
        let targets: Vec<f64> = set.iter().map(|e| e.target()).collect();
        assert_eq!(targets, vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    }
}
