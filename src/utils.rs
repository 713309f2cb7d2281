use crate::dataset::letters::PATTERN_WIDTH;

use ndarray::prelude::*;
use std::fmt::Write;

/// Builds a zero-target training set from 2-D point literals.
#[macro_export]
macro_rules! points {
    ($(($x:expr, $y:expr)),* $(,)?) => {
        $crate::dataset::TrainingSet::from_points(&[$(($x, $y)),*])
    };
}

/// Renders pixel bits as a grid, one row per `PATTERN_WIDTH` pixels, blank
/// for 0. A trailing label bit, if present, is not drawn.
pub fn render_pattern(bits: &[u8]) -> String {
    let mut out = String::new();
    let pixels = bits.len() - bits.len() % PATTERN_WIDTH;
    for (i, &bit) in bits.iter().take(pixels).enumerate() {
        if i % PATTERN_WIDTH == 0 && i > 0 {
            out.push('\n');
        }
        out.push(if bit == 0 { ' ' } else { '1' });
    }
    out
}

/// Renders weights four to a line in signed fixed-point, the way the
/// classifier demo prints its trained model.
pub fn render_weights(weights: &Array1<f64>) -> String {
    let mut out = String::new();
    for (i, w) in weights.iter().enumerate() {
        if i > 0 {
            if i % 4 == 0 {
                out.push('\n');
            } else {
                out.push(' ');
            }
        }
        let _ = write!(out, "{w:+.3}");
    }
    out
}
