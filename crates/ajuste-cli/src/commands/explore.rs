//! Learning-rate sweep command.

use ajuste_config::ExploreConfig;
use ajuste_core::{AdaptiveFilter, ErrorMetric, explore_learning, explore_learning_blocks};
use clap::Args;
use serde::Serialize;

use super::common::ExperimentArgs;
use super::signal::Dataset;

#[derive(Args)]
pub struct ExploreArgs {
    #[command(flatten)]
    experiment: ExperimentArgs,

    /// First candidate step size
    #[arg(long, default_value_t = 0.01)]
    mu_start: f64,

    /// Last candidate step size
    #[arg(long, default_value_t = 1.0)]
    mu_end: f64,

    /// Number of candidates
    #[arg(long, default_value_t = 20)]
    steps: usize,

    /// Share of the data used for training
    #[arg(long, default_value_t = 0.5)]
    n_train: f64,

    /// Training passes per candidate
    #[arg(long, default_value_t = 1)]
    epochs: usize,

    /// Error metric: MAE, MSE or RMSE
    #[arg(long, default_value = "MSE")]
    metric: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Candidate {
    mu: f64,
    error: f64,
}

#[derive(Debug, Serialize)]
struct ExploreReport {
    filter: String,
    n: usize,
    metric: String,
    candidates: Vec<Candidate>,
    best_mu: Option<f64>,
    best_error: Option<f64>,
}

pub fn run(args: ExploreArgs) -> anyhow::Result<()> {
    let experiment = args.experiment.experiment()?;

    // A sweep in the experiment file takes precedence over the flags.
    let sweep = match (&args.experiment.config, &experiment.explore) {
        (Some(_), Some(explore)) => explore.clone(),
        _ => ExploreConfig {
            mu_start: args.mu_start,
            mu_end: args.mu_end,
            steps: args.steps,
            n_train: args.n_train,
            epochs: args.epochs,
            metric: args.metric.clone(),
        },
    };
    let options = sweep.options()?;

    let mut filter = experiment.build()?;
    let n = filter.filter_len();
    let data = Dataset::generate(&experiment.signal, n)?;

    tracing::info!(
        filter = %filter.kind(),
        mu_start = sweep.mu_start,
        mu_end = sweep.mu_end,
        steps = sweep.steps,
        "exploring step sizes"
    );

    let result = if let Some(sample) = filter.as_sample_mut() {
        explore_learning(
            sample,
            &data.desired,
            &data.rows(n),
            sweep.mu_start,
            sweep.mu_end,
            sweep.steps,
            &options,
        )?
    } else if let Some(block) = filter.as_block_mut() {
        let (d, x) = data.blocks(n);
        explore_learning_blocks(
            block,
            &d,
            &x,
            sweep.mu_start,
            sweep.mu_end,
            sweep.steps,
            &options,
        )?
    } else {
        anyhow::bail!("filter {} cannot be explored", filter.kind());
    };

    let best = result.best();
    let report = ExploreReport {
        filter: filter.kind().name().to_string(),
        n,
        metric: options.metric.name().to_string(),
        candidates: result
            .pairs()
            .map(|(mu, error)| Candidate { mu, error })
            .collect(),
        best_mu: best.map(|(mu, _)| mu),
        best_error: best.map(|(_, e)| e),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_table(&report, options.metric);
    Ok(())
}

fn print_table(report: &ExploreReport, metric: ErrorMetric) {
    println!("Learning-Rate Exploration ({}, n = {})", report.filter, report.n);
    println!();
    println!("  {:>12}  {:>14}", "mu", metric.name());
    println!("  {:>12}  {:>14}", "--", "-".repeat(metric.name().len()));
    for c in &report.candidates {
        println!("  {:>12.6}  {:>14.6e}", c.mu, c.error);
    }
    println!();
    match (report.best_mu, report.best_error) {
        (Some(mu), Some(error)) => {
            println!("The step size mu with the smallest error is {mu:.3} ({error:.6e})");
        }
        _ => println!("No candidate produced a finite error."),
    }
}
