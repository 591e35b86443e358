//! Indirect-rate sensitivity sweep
//!
//! Evaluates the project summary over a grid of fringe, overhead and G&A
//! rates and writes one row per combination.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use project_financials::params::DEFAULT_DATA_PATH;
use project_financials::reports::write_csv_path;
use project_financials::scenario::rate_grid;
use project_financials::{Project, ScenarioRunner};

#[derive(Parser)]
#[command(about = "Sweep indirect rates and report profit margin for each combination")]
struct Args {
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    #[arg(short, long, default_value = "rate_sensitivity.csv")]
    output: PathBuf,

    /// Step applied either side of each configured rate
    #[arg(long, default_value_t = 0.025)]
    step: f64,

    /// Steps taken either side of each configured rate
    #[arg(long, default_value_t = 2)]
    steps: u32,
}

#[derive(Debug, Serialize)]
struct SensitivityRow {
    #[serde(rename = "Fringe_Rate")]
    fringe_rate: f64,
    #[serde(rename = "Overhead_Rate")]
    overhead_rate: f64,
    #[serde(rename = "GA_Rate")]
    ga_rate: f64,
    #[serde(rename = "Total_Indirect")]
    total_indirect: f64,
    #[serde(rename = "Total_Costs")]
    total_costs: f64,
    #[serde(rename = "Profit_Loss")]
    profit_loss: f64,
    #[serde(rename = "Profit_Margin_Pct")]
    profit_margin_pct: f64,
}

/// Rates around `center`, never below zero
fn around(center: f64, step: f64, steps: u32) -> Vec<f64> {
    let steps = steps as i32;
    (-steps..=steps)
        .map(|i| center + step * i as f64)
        .filter(|rate| *rate >= 0.0)
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let project = Project::load_dir(&args.data_dir)
        .with_context(|| format!("Failed to load project from {}", args.data_dir.display()))?;
    println!("Loaded project in {:?}", start.elapsed());

    let base = project.params().clone();
    let scenarios = rate_grid(
        &base,
        &around(base.fringe_rate, args.step, args.steps),
        &around(base.overhead_rate, args.step, args.steps),
        &around(base.ga_rate, args.step, args.steps),
    );
    let runner = ScenarioRunner::new(project);

    println!("Running {} scenarios...", scenarios.len());
    let sweep_start = Instant::now();

    // Summaries are independent, run them in parallel
    let rows: Vec<SensitivityRow> = scenarios
        .par_iter()
        .map(|scenario| {
            let summary = runner.run(&scenario.parameters);
            SensitivityRow {
                fringe_rate: scenario.parameters.fringe_rate,
                overhead_rate: scenario.parameters.overhead_rate,
                ga_rate: scenario.parameters.ga_rate,
                total_indirect: summary.indirect_costs.total_indirect,
                total_costs: summary.total_costs,
                profit_loss: summary.profit_loss,
                profit_margin_pct: summary.profit_margin_pct,
            }
        })
        .collect();

    println!("Completed in {:?}", sweep_start.elapsed());

    if let Some(best) = rows
        .iter()
        .max_by(|a, b| a.profit_margin_pct.total_cmp(&b.profit_margin_pct))
    {
        println!(
            "Best margin {:.2}% at fringe {:.3}, overhead {:.3}, G&A {:.3}",
            best.profit_margin_pct, best.fringe_rate, best.overhead_rate, best.ga_rate
        );
    }

    write_csv_path(&args.output, &rows)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Results written to {}", args.output.display());

    Ok(())
}
