//! System identification command.

use ajuste_core::{AdaptiveFilter, mse};
use clap::Args;
use serde::Serialize;

use super::common::ExperimentArgs;
use super::signal::Dataset;

#[derive(Args)]
pub struct IdentifyArgs {
    #[command(flatten)]
    experiment: ExperimentArgs,

    /// Share of the run, from the end, used for the steady-state error
    #[arg(long, default_value_t = 0.25)]
    tail: f64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct IdentifyReport {
    filter: String,
    n: usize,
    mu: f64,
    samples: usize,
    mse: f64,
    steady_state_mse: f64,
    misalignment: f64,
    weights: Vec<f64>,
    system: Vec<f64>,
}

/// Mean of the squared errors.
fn mean_square(errors: &[f64]) -> anyhow::Result<f64> {
    Ok(mse(errors, &vec![0.0; errors.len()])?)
}

pub fn run(args: IdentifyArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.tail) {
        anyhow::bail!("--tail must be between 0 and 1, got {}", args.tail);
    }

    let experiment = args.experiment.experiment()?;
    let mut filter = experiment.build()?;
    let n = filter.filter_len();
    let data = Dataset::generate(&experiment.signal, n)?;

    tracing::info!(filter = %filter.kind(), n, mu = filter.step_size(), "identifying system");

    let errors: Vec<f64> = if let Some(sample) = filter.as_sample_mut() {
        sample.run(&data.desired, &data.rows(n))?.errors
    } else if let Some(block) = filter.as_block_mut() {
        let (d, x) = data.blocks(n);
        block.run_blocks(&d, &x)?.errors.concat()
    } else {
        anyhow::bail!("filter {} has no run method", filter.kind());
    };

    let tail_len = ((errors.len() as f64) * args.tail).ceil() as usize;
    let tail = &errors[errors.len() - tail_len.min(errors.len())..];

    let weights = match &filter {
        ajuste_core::AnyFilter::Fblms(f) => f.active_weights().to_vec(),
        other => other.weights().to_vec(),
    };

    let report = IdentifyReport {
        filter: filter.kind().name().to_string(),
        n,
        mu: filter.step_size(),
        samples: errors.len(),
        mse: mean_square(&errors)?,
        steady_state_mse: mean_square(tail)?,
        misalignment: data.misalignment(&weights),
        weights,
        system: data.system.clone(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("System Identification");
    println!("=====================");
    println!();
    println!("  Filter:        {} (n = {}, mu = {})", report.filter, report.n, report.mu);
    println!("  Samples:       {}", report.samples);
    println!("  MSE:           {:.6e}", report.mse);
    println!("  Tail MSE:      {:.6e}", report.steady_state_mse);
    println!("  Misalignment:  {:.6e}", report.misalignment);
    println!();
    println!("  {:>4}  {:>12}  {:>12}", "Tap", "Estimate", "System");
    println!("  {:>4}  {:>12}  {:>12}", "---", "--------", "------");
    let taps = report.weights.len().max(report.system.len());
    for k in 0..taps {
        let fmt = |v: Option<&f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.6}"));
        println!(
            "  {:>4}  {:>12}  {:>12}",
            k,
            fmt(report.weights.get(k)),
            fmt(report.system.get(k))
        );
    }

    Ok(())
}
