pub use serde::{Deserialize, Serialize};

pub use ndarray::prelude::*;
pub use ndarray_rand::rand_distr::Uniform;
pub use ndarray_rand::RandomExt;

pub use crate::benchmark::{sweep, SweepOutcome, DEFAULT_SWEEP_RATES};
pub use crate::dataset::{letters, TrainingExample, TrainingSet};
pub use crate::error::TrainError;
pub use crate::model::{step, Parameters, DEFAULT_BIAS, STEP_THRESHOLD};
pub use crate::sink::{ModelSink, ProgressSink};
pub use crate::trainer::{
    classification_error, OutputMode, Termination, Trainer, TrainingConfig, TrainingResult,
};
pub use crate::utils::{render_pattern, render_weights};

pub use crate::points;
