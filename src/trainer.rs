use crate::dataset::TrainingSet;
use crate::error::TrainError;
use crate::model::Parameters;
use crate::sink::{ModelSink, ProgressSink};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Below this epoch cap every epoch is reported; above it, every
/// `PROGRESS_EVERY`-th.
pub const VERBOSE_EPOCH_LIMIT: usize = 3_000;
pub const PROGRESS_EVERY: usize = 100;

/// How the raw output is interpreted against the desired value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Hard 0/1 threshold compared against a binary label (perceptron).
    Step,
    /// Raw continuous value, driven towards the desired value (linear unit).
    Linear,
}

impl OutputMode {
    pub fn output(self, raw: f64) -> f64 {
        match self {
            OutputMode::Step => crate::model::step(raw),
            OutputMode::Linear => raw,
        }
    }
}

/// Hyperparameters for one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub max_epochs: usize,
    pub target_error: f64,
    /// Starting weights and bias; `None` means all-zero weights with the
    /// default small positive bias.
    pub initial: Option<Parameters>,
}

impl TrainingConfig {
    pub fn new(learning_rate: f64, max_epochs: usize, target_error: f64) -> Self {
        Self {
            learning_rate,
            max_epochs,
            target_error,
            initial: None,
        }
    }

    pub fn with_initial(mut self, params: Parameters) -> Self {
        self.initial = Some(params);
        self
    }

    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    fn validate(&self, dim: usize) -> Result<(), TrainError> {
        if !(self.learning_rate > 0.0) {
            return Err(TrainError::InvalidLearningRate(self.learning_rate));
        }
        if self.max_epochs == 0 {
            return Err(TrainError::ZeroMaxEpochs);
        }
        if !(self.target_error >= 0.0) {
            return Err(TrainError::NegativeTargetError(self.target_error));
        }
        if let Some(initial) = &self.initial {
            if initial.dim() != dim {
                return Err(TrainError::InitialDimension {
                    expected: dim,
                    found: initial.dim(),
                });
            }
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::new(0.075, 1000, 0.0)
    }
}

/// Why a run stopped, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A weight, the bias or the total error went non-finite; the result
    /// carries the last finite state instead of the diverged one.
    Overflow,
    /// The epoch cap was hit. A valid outcome, not an error.
    EpochCapReached,
    /// Total error dropped to the target or below.
    TargetReached,
}

/// Final state of a run. Epoch count only includes committed epochs, so it
/// never exceeds the configured maximum, and weights, bias and total error
/// are always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub epochs: usize,
    pub total_error: f64,
    pub params: Parameters,
    pub termination: Termination,
}

impl TrainingResult {
    pub fn overflowed(&self) -> bool {
        self.termination == Termination::Overflow
    }
}

/// Online delta-rule trainer. Owns the evolving parameters for the duration
/// of a run and hands out immutable snapshots; blocking and single-threaded,
/// callers wanting a responsive front end run `train` on a worker.
pub struct Trainer<'a> {
    mode: OutputMode,
    config: TrainingConfig,
    progress: Option<Box<dyn ProgressSink + 'a>>,
    model_sink: Option<Box<dyn ModelSink + 'a>>,
}

impl<'a> Trainer<'a> {
    pub fn new(mode: OutputMode, config: TrainingConfig) -> Self {
        Self {
            mode,
            config,
            progress: None,
            model_sink: None,
        }
    }

    pub fn with_progress(mut self, sink: impl ProgressSink + 'a) -> Self {
        self.progress = Some(Box::new(sink));
        self
    }

    pub fn with_model_sink(mut self, sink: impl ModelSink + 'a) -> Self {
        self.model_sink = Some(Box::new(sink));
        self
    }

    /// Runs epochs of per-example delta-rule updates until the total error
    /// reaches the target, the epoch cap is hit, or the numbers diverge.
    pub fn train(&mut self, data: &TrainingSet) -> Result<TrainingResult, TrainError> {
        self.config.validate(data.dim())?;

        let rate = self.config.learning_rate;
        let mut params = match &self.config.initial {
            Some(initial) => initial.clone(),
            None => Parameters::zeroed(data.dim()),
        };
        debug!(
            examples = data.len(),
            dim = data.dim(),
            rate,
            max_epochs = self.config.max_epochs,
            "training started"
        );

        // Finite fallback in case the very first epoch diverges.
        let mut total_error = classification_error(data, &params, self.mode);
        let mut epochs = 0;
        // Sentinel instead of evaluating the initial parameters: the first
        // epoch always runs.
        let mut last_error = f64::MAX;
        let mut termination = None;

        while epochs < self.config.max_epochs && last_error > self.config.target_error {
            let (candidate, candidate_error) = sweep(data, &params, rate, self.mode);

            if !candidate.is_finite() || !candidate_error.is_finite() {
                warn!(epoch = epochs + 1, "numeric overflow, discarding diverged epoch");
                termination = Some(Termination::Overflow);
                break;
            }

            params = candidate;
            total_error = candidate_error;
            last_error = candidate_error;
            epochs += 1;

            if let Some(progress) = &mut self.progress {
                if self.config.max_epochs < VERBOSE_EPOCH_LIMIT || epochs % PROGRESS_EVERY == 0 {
                    progress.log(&format!(
                        "epoch {epochs}: {params} | total error {total_error:.4}"
                    ));
                }
            }
            if let Some(model_sink) = &mut self.model_sink {
                model_sink.snapshot(&params);
            }
        }

        let termination = termination.unwrap_or(if epochs == self.config.max_epochs {
            Termination::EpochCapReached
        } else {
            Termination::TargetReached
        });
        info!(epochs, total_error, ?termination, "training finished");

        Ok(TrainingResult {
            epochs,
            total_error,
            params,
            termination,
        })
    }
}

/// One pass over the set: per-example updates, then the total error of the
/// updated parameters. The input parameters are left untouched so the caller
/// can discard a diverged pass.
fn sweep(
    data: &TrainingSet,
    params: &Parameters,
    rate: f64,
    mode: OutputMode,
) -> (Parameters, f64) {
    let mut params = params.clone();
    for example in data.iter() {
        let output = mode.output(params.activation(example.features()));
        let err = example.target() - output;

        params.weights.scaled_add(rate * err, example.features());
        params.bias += rate * err;
    }
    let total_error = classification_error(data, &params, mode);
    (params, total_error)
}

/// Total squared-error objective, `0.5 * sum((desired - output)^2)`, for
/// evaluating a model without retraining. Training uses the same formula
/// once per epoch as its stopping criterion.
pub fn classification_error(data: &TrainingSet, params: &Parameters, mode: OutputMode) -> f64 {
    let sum: f64 = data
        .iter()
        .map(|example| {
            let err = example.target() - mode.output(params.activation(example.features()));
            err * err
        })
        .sum();
    0.5 * sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TrainingExample;
    use ndarray::prelude::*;
    use std::cell::RefCell;

    fn single_example_set() -> TrainingSet {
        TrainingSet::new(vec![TrainingExample::new(array![1.0, 0.0, 1.0], 1.0)]).unwrap()
    }

    #[test]
    fn one_epoch_matches_the_delta_rule_by_hand() {
        // step(0.05) = 0, so err = 1 and each active feature gains one full
        // rate-sized correction.
        let data = single_example_set();
        let config = TrainingConfig::new(0.075, 1, 0.0);
        let result = Trainer::new(OutputMode::Step, config).train(&data).unwrap();

        assert_eq!(result.epochs, 1);
        assert_eq!(result.params.weights, array![0.075, 0.0, 0.075]);
        assert_eq!(result.params.bias, 0.05 + 0.075);
        assert_eq!(result.termination, Termination::EpochCapReached);
    }

    #[test]
    fn epoch_count_never_exceeds_the_cap() {
        let data = single_example_set();
        for cap in [1, 3, 10] {
            let config = TrainingConfig::new(0.001, cap, 0.0);
            let result = Trainer::new(OutputMode::Step, config).train(&data).unwrap();
            assert!(result.epochs <= cap);
        }
    }

    #[test]
    fn separable_classes_converge_before_the_cap() {
        let data = TrainingSet::new(vec![
            TrainingExample::new(array![0.0, 0.0], 0.0),
            TrainingExample::new(array![1.0, 0.0], 0.0),
            TrainingExample::new(array![0.0, 3.0], 1.0),
            TrainingExample::new(array![1.0, 3.0], 1.0),
        ])
        .unwrap();
        let config = TrainingConfig::new(0.075, 1000, 0.0);
        let result = Trainer::new(OutputMode::Step, config).train(&data).unwrap();

        assert_eq!(result.termination, Termination::TargetReached);
        assert_eq!(result.total_error, 0.0);
        assert!(result.epochs < 1000);
        for example in data.iter() {
            let predicted = result.params.predict(example.features()).unwrap();
            assert_eq!(predicted, example.target() == 1.0);
        }
    }

    #[test]
    fn pathological_rate_overflows_to_last_finite_state() {
        let data = TrainingSet::from_points(&[(1e10, 1e10), (-2e10, 3e10)]).unwrap();
        let config = TrainingConfig::new(1e308, 1000, 0.0);
        let result = Trainer::new(OutputMode::Linear, config).train(&data).unwrap();

        assert!(result.overflowed());
        assert!(result.params.is_finite());
        assert!(result.total_error.is_finite());
        assert!(result.epochs < 1000);
    }

    #[test]
    fn moderate_divergence_keeps_the_previous_epoch() {
        // rate 10 on far-out points oscillates with growing amplitude until
        // the squared error leaves the f64 range.
        let data = TrainingSet::from_points(&[(1e3, 2e3), (-3e3, 1e3)]).unwrap();
        let config = TrainingConfig::new(10.0, 10_000, 0.0);
        let result = Trainer::new(OutputMode::Linear, config).train(&data).unwrap();

        assert!(result.overflowed());
        assert!(result.params.is_finite());
        assert!(result.total_error.is_finite());
    }

    #[test]
    fn linear_mode_fits_a_line_through_collinear_points() {
        // points on y = x + 1, i.e. x - y + 1 = 0
        let data = TrainingSet::from_points(&[(0.0, 1.0), (1.0, 2.0), (-1.0, 0.0)]).unwrap();
        let config = TrainingConfig::new(0.05, 5000, 1e-6);
        let result = Trainer::new(OutputMode::Linear, config).train(&data).unwrap();

        assert_eq!(result.termination, Termination::TargetReached);
        assert!(result.total_error <= 1e-6);
        for example in data.iter() {
            assert!(result.params.activation(example.features()).abs() < 2e-3);
        }
    }

    #[test]
    fn invalid_config_fails_before_any_work() {
        let data = single_example_set();

        let bad_rate = TrainingConfig::new(0.0, 10, 0.0);
        assert_eq!(
            Trainer::new(OutputMode::Step, bad_rate).train(&data).unwrap_err(),
            TrainError::InvalidLearningRate(0.0)
        );

        let bad_cap = TrainingConfig::new(0.1, 0, 0.0);
        assert_eq!(
            Trainer::new(OutputMode::Step, bad_cap).train(&data).unwrap_err(),
            TrainError::ZeroMaxEpochs
        );

        let bad_target = TrainingConfig::new(0.1, 10, -1.0);
        assert_eq!(
            Trainer::new(OutputMode::Step, bad_target).train(&data).unwrap_err(),
            TrainError::NegativeTargetError(-1.0)
        );

        let bad_initial =
            TrainingConfig::new(0.1, 10, 0.0).with_initial(Parameters::zeroed(5));
        assert_eq!(
            Trainer::new(OutputMode::Step, bad_initial).train(&data).unwrap_err(),
            TrainError::InitialDimension {
                expected: 3,
                found: 5
            }
        );
    }

    #[test]
    fn sinks_see_every_epoch_under_the_verbose_limit() {
        let data = single_example_set();
        let lines = RefCell::new(Vec::new());
        let snapshots = RefCell::new(Vec::new());

        let config = TrainingConfig::new(0.075, 3, 0.0);
        let result = Trainer::new(OutputMode::Step, config)
            .with_progress(|line: &str| lines.borrow_mut().push(line.to_string()))
            .with_model_sink(|p: &Parameters| snapshots.borrow_mut().push(p.clone()))
            .train(&data)
            .unwrap();

        let lines = lines.into_inner();
        let snapshots = snapshots.into_inner();
        assert_eq!(lines.len(), result.epochs);
        assert_eq!(snapshots.len(), result.epochs);
        assert!(lines[0].starts_with("epoch 1:"));
        // the last snapshot is the final model
        assert_eq!(snapshots.last().unwrap(), &result.params);
    }

    #[test]
    fn progress_is_subsampled_above_the_verbose_limit() {
        // single zero point with a tiny rate never converges, so the run
        // walks all the way to the cap
        let data = TrainingSet::new(vec![TrainingExample::new(array![1.0, 1.0], 1.0)]).unwrap();
        let count = RefCell::new(0usize);

        let config = TrainingConfig::new(1e-9, 3000, 0.0);
        let result = Trainer::new(OutputMode::Linear, config)
            .with_progress(|_: &str| *count.borrow_mut() += 1)
            .train(&data)
            .unwrap();

        assert_eq!(result.epochs, 3000);
        assert_eq!(count.into_inner(), 3000 / PROGRESS_EVERY);
    }

    #[test]
    fn update_then_evaluate_is_the_reported_error() {
        // after the only epoch the example is still misclassified, and the
        // error must reflect the post-update weights: 0.5 * 1^2
        let data = single_example_set();
        let config = TrainingConfig::new(0.075, 1, 0.0);
        let result = Trainer::new(OutputMode::Step, config).train(&data).unwrap();
        assert_eq!(result.total_error, 0.5);
        assert_eq!(
            result.total_error,
            classification_error(&data, &result.params, OutputMode::Step)
        );
    }
}
