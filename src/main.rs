use delta_rule::prelude::*;

use clap::{Parser, Subcommand};
use rand::Rng;
use std::error::Error;
use std::thread;

#[derive(Parser)]
#[command(about = "Single-layer delta-rule training demos")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train an is-'B' perceptron on the A-E bitmap patterns
    Classify {
        #[arg(long, default_value_t = 0.075)]
        rate: f64,
        #[arg(long, default_value_t = 1000)]
        max_epochs: usize,
        #[arg(long, default_value_t = 0.0)]
        target_error: f64,
    },
    /// Fit a line through a random 2-D point cloud, streaming snapshots
    FitLine {
        #[arg(long, default_value_t = 0.01)]
        rate: f64,
        #[arg(long, default_value_t = 50)]
        max_epochs: usize,
        #[arg(long, default_value_t = 0.001)]
        target_error: f64,
        /// Points sampled around the line y = x + 1
        #[arg(long, default_value_t = 30)]
        points: usize,
    },
    /// Compare convergence speed and accuracy across learning rates
    Sweep {
        #[arg(long, default_value_t = 1000)]
        max_epochs: usize,
        #[arg(long, default_value_t = 0.001)]
        target_error: f64,
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        rates: Option<Vec<f64>>,
        #[arg(long, default_value_t = 30)]
        points: usize,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = tracing_subscriber::fmt().compact().finish();
    tracing::subscriber::set_global_default(subscriber)?;
    let args = Cli::parse();

    match args.command {
        Command::Classify {
            rate,
            max_epochs,
            target_error,
        } => classify(rate, max_epochs, target_error)?,
        Command::FitLine {
            rate,
            max_epochs,
            target_error,
            points,
        } => fit_line(rate, max_epochs, target_error, points)?,
        Command::Sweep {
            max_epochs,
            target_error,
            rates,
            points,
        } => run_sweep(max_epochs, target_error, rates, points)?,
    }
    Ok(())
}

fn classify(rate: f64, max_epochs: usize, target_error: f64) -> Result<(), Box<dyn Error>> {
    println!("Training patterns are the letters A-E; goal is recognizing 'B'.\n");
    for pattern in &letters::ALL {
        println!("{}\n", render_pattern(pattern));
    }

    let data = TrainingSet::from_patterns(&letters::ALL)?;
    let config = TrainingConfig::new(rate, max_epochs, target_error);
    let result = Trainer::new(OutputMode::Step, config)
        .with_progress(|line: &str| println!("{line}"))
        .train(&data)?;

    println!("\nTrained weights:");
    println!("{}", render_weights(&result.params.weights));
    println!("bias {:+.3}", result.params.bias);
    println!(
        "\n{} epochs, total error {:.4} ({:?})",
        result.epochs, result.total_error, result.termination
    );

    let probe: Array1<f64> = letters::DAMAGED_B.iter().map(|&b| f64::from(b)).collect();
    println!("\nClassifying a damaged 'B':\n");
    println!("{}\n", render_pattern(&letters::DAMAGED_B));
    if result.params.predict(&probe)? {
        println!("pattern IS recognized as a 'B'");
    } else {
        println!("pattern is NOT recognized as a 'B'");
    }
    Ok(())
}

/// Samples `count` points around y = x + 1 so the fitted line has something
/// to find.
fn sample_points(count: usize) -> Vec<(f64, f64)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let x: f64 = rng.gen_range(-5.0..5.0);
            let noise: f64 = rng.gen_range(-0.2..0.2);
            (x, x + 1.0 + noise)
        })
        .collect()
}

fn fit_line(
    rate: f64,
    max_epochs: usize,
    target_error: f64,
    points: usize,
) -> Result<(), Box<dyn Error>> {
    let data = TrainingSet::from_points(&sample_points(points))?;
    let config = TrainingConfig::new(rate, max_epochs, target_error)
        .with_initial(Parameters::new(array![3.0, 3.0], 1.0));

    // Snapshots go through a channel to a printer thread so slow rendering
    // never stalls the training loop.
    let (tx, rx) = crossbeam_channel::unbounded::<Parameters>();
    let printer = thread::spawn(move || {
        for (i, p) in rx.iter().enumerate() {
            if i % 10 == 0 {
                println!("  w1 {:+.4}  w2 {:+.4}  b {:+.4}", p.weights[0], p.weights[1], p.bias);
            }
        }
    });

    let result = Trainer::new(OutputMode::Linear, config)
        .with_model_sink(move |p: &Parameters| {
            let _ = tx.send(p.clone());
        })
        .train(&data)?;

    printer.join().map_err(|_| "printer thread panicked")?;

    println!(
        "\n{}/{} epochs, total error {:.6} ({:?})",
        result.epochs, max_epochs, result.total_error, result.termination
    );
    println!("{}", result.params);
    let [w1, w2] = [result.params.weights[0], result.params.weights[1]];
    if w2 != 0.0 {
        println!(
            "fitted line: y = {:.4} * x + {:.4}",
            -w1 / w2,
            -result.params.bias / w2
        );
    }
    Ok(())
}

fn run_sweep(
    max_epochs: usize,
    target_error: f64,
    rates: Option<Vec<f64>>,
    points: usize,
) -> Result<(), Box<dyn Error>> {
    let data = TrainingSet::from_points(&sample_points(points))?;
    let base = TrainingConfig::new(DEFAULT_SWEEP_RATES[0], max_epochs, target_error);
    let rates = rates.unwrap_or_else(|| DEFAULT_SWEEP_RATES.to_vec());

    let outcomes = sweep(&data, &base, OutputMode::Linear, &rates)?;

    println!("{:>12} {:>8} {:>14} {:>14}", "rate", "epochs", "total error", "accuracy");
    for o in &outcomes {
        if o.overflowed {
            println!("{:>12.5} {:>8} {:>14} {:>14}", o.rate, o.epochs, "overflow", "-");
        } else {
            println!(
                "{:>12.5} {:>8} {:>14.6} {:>14.6}",
                o.rate, o.epochs, o.total_error, o.accuracy
            );
        }
    }
    Ok(())
}
