//! Online delta-rule training for a single linear unit, with a step-output
//! perceptron mode for binary bitmap classification and a linear mode for
//! fitting a line through zero-target 2-D points.

pub mod prelude;

pub mod benchmark;
pub mod dataset;
pub mod error;
pub mod model;
pub mod sink;
pub mod trainer;
pub mod utils;

#[allow(unused_imports)]
use crate::prelude::*;

#[test]
fn classify_letter_patterns() {
    let data = TrainingSet::from_patterns(&letters::ALL).unwrap();
    let config = TrainingConfig::new(0.075, 1000, 0.0);
    let result = Trainer::new(OutputMode::Step, config).train(&data).unwrap();

    assert_eq!(result.termination, Termination::TargetReached);
    assert_eq!(result.total_error, 0.0);

    // the trained classifier separates 'B' from the other four letters
    for pattern in &letters::ALL {
        let example = TrainingExample::from_bits(pattern);
        let is_b = result.params.predict(example.features()).unwrap();
        assert_eq!(is_b, example.target() == 1.0);
    }

    // and still recognizes a 'B' with two damaged pixels
    let probe: Array1<f64> = letters::DAMAGED_B.iter().map(|&b| f64::from(b)).collect();
    assert!(result.params.predict(&probe).unwrap());
}

#[test]
fn stream_snapshots_while_fitting_a_line() {
    let (tx, rx) = crossbeam_channel::unbounded::<Parameters>();

    let data = points![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)].unwrap();
    let config = TrainingConfig::new(0.01, 50, 0.001)
        .with_initial(Parameters::new(array![3.0, 3.0], 1.0));

    let result = Trainer::new(OutputMode::Linear, config)
        .with_model_sink(move |p: &Parameters| {
            let _ = tx.send(p.clone());
        })
        .train(&data)
        .unwrap();

    let snapshots: Vec<Parameters> = rx.iter().collect();
    assert_eq!(snapshots.len(), result.epochs);
    assert_eq!(snapshots.last().unwrap(), &result.params);
    assert!(snapshots.iter().all(|p| p.is_finite()));
}
