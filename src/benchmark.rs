use crate::dataset::TrainingSet;
use crate::error::TrainError;
use crate::trainer::{OutputMode, Trainer, TrainingConfig};

use serde::{Deserialize, Serialize};

/// Candidate rates for the sweep, smallest first.
pub const DEFAULT_SWEEP_RATES: [f64; 8] = [1e-5, 1e-4, 1e-3, 0.01, 0.05, 0.1, 0.5, 1.0];

/// How one learning rate fared: epochs spent, the error it settled at, and
/// how far that landed from the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub rate: f64,
    pub epochs: usize,
    pub total_error: f64,
    /// Distance from the target error; smaller is better.
    pub accuracy: f64,
    pub overflowed: bool,
}

/// Trains once per candidate rate, identical initial parameters each time,
/// and reports convergence speed and accuracy side by side. No sinks are
/// attached; sweeps are about the end state, not the path.
pub fn sweep(
    data: &TrainingSet,
    base: &TrainingConfig,
    mode: OutputMode,
    rates: &[f64],
) -> Result<Vec<SweepOutcome>, TrainError> {
    rates
        .iter()
        .map(|&rate| {
            let config = base.clone().with_learning_rate(rate);
            let result = Trainer::new(mode, config).train(data)?;
            Ok(SweepOutcome {
                rate,
                epochs: result.epochs,
                total_error: result.total_error,
                accuracy: (result.total_error - base.target_error).abs(),
                overflowed: result.overflowed(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TrainingExample;
    use ndarray::prelude::*;

    #[test]
    fn sweep_reports_one_outcome_per_rate() {
        let data = TrainingSet::from_points(&[(0.0, 1.0), (1.0, 2.0), (-1.0, 0.0)]).unwrap();
        let base = TrainingConfig::new(0.01, 200, 0.001);
        let outcomes =
            sweep(&data, &base, OutputMode::Linear, &[1e-4, 0.01, 0.05]).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes.iter().map(|o| o.rate).collect::<Vec<_>>(),
            vec![1e-4, 0.01, 0.05]
        );
        for outcome in &outcomes {
            assert!(outcome.epochs <= 200);
            assert!(outcome.accuracy >= 0.0);
        }
    }

    #[test]
    fn diverging_rates_are_flagged_not_fatal() {
        let data = TrainingSet::from_points(&[(1e3, 2e3), (-3e3, 1e3)]).unwrap();
        let base = TrainingConfig::new(0.01, 5000, 0.0);
        let outcomes = sweep(&data, &base, OutputMode::Linear, &[1e-9, 10.0]).unwrap();

        assert!(!outcomes[0].overflowed);
        assert!(outcomes[1].overflowed);
        assert!(outcomes[1].total_error.is_finite());
    }

    #[test]
    fn faster_rate_converges_in_fewer_epochs() {
        let data = TrainingSet::new(vec![
            TrainingExample::new(array![0.0, 0.0], 0.0),
            TrainingExample::new(array![0.0, 3.0], 1.0),
        ])
        .unwrap();
        let base = TrainingConfig::new(0.075, 1000, 0.0);
        let outcomes = sweep(&data, &base, OutputMode::Step, &[0.01, 0.2]).unwrap();

        assert!(outcomes[1].epochs <= outcomes[0].epochs);
        assert_eq!(outcomes[1].accuracy, 0.0);
    }
}
