use thiserror::Error;

/// Everything that can go wrong before a training run starts.
///
/// Numeric overflow during training is not an error; it terminates the run
/// and is reported on [`crate::trainer::TrainingResult`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("example {index} has {found} features, expected {expected}")]
    ExampleDimension {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("input has {found} features, model expects {expected}")]
    InputDimension { expected: usize, found: usize },

    #[error("initial parameters have {found} weights, dataset has {expected} features")]
    InitialDimension { expected: usize, found: usize },

    #[error("learning rate must be positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("max epochs must be at least 1")]
    ZeroMaxEpochs,

    #[error("target error must be non-negative, got {0}")]
    NegativeTargetError(f64),
}
