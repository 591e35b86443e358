//! Project Financials CLI
//!
//! Loads a project data directory and prints or writes its financial views.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use project_financials::engine::CategoryPolicy;
use project_financials::params::{CONVENTIONAL_SUBCONTRACTOR_MARKUP, DEFAULT_DATA_PATH};
use project_financials::reports;
use project_financials::{FinancialSummary, Project, RevenueBasis, Snapshot};

#[derive(Parser)]
#[command(name = "project_financials")]
#[command(about = "Financial aggregation and allocation for labor-contract projects")]
struct Cli {
    /// Directory holding employees.csv, subcontractors.csv, hours files and project.json
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// Markup on subcontractor revenue (overrides project.json)
    #[arg(long)]
    subcontractor_markup: Option<f64>,

    /// Apply the conventional 1.2 subcontractor markup
    #[arg(long, conflicts_with = "subcontractor_markup")]
    conventional_markup: bool,

    /// Hours basis for recalculated revenue (overrides project.json)
    #[arg(long, value_enum)]
    revenue_basis: Option<BasisArg>,

    /// Category grouping (overrides project.json)
    #[arg(long, value_enum)]
    category_policy: Option<PolicyArg>,

    /// Continue even if validation fails
    #[arg(long)]
    skip_validation: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BasisArg {
    Billable,
    Actual,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Exact,
    Normalized,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the financial summary
    Summary,

    /// Write monthly revenue, burn-rate, category, task and summary CSVs
    Report {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print employee and subcontractor roster metrics
    Metrics,

    /// Validate inputs and list every issue
    Validate,

    /// Save a JSON snapshot of the loaded project
    Snapshot {
        /// Snapshot file to write
        output: PathBuf,
    },

    /// Restore a JSON snapshot and print its recomputed summary
    Restore {
        /// Snapshot file to read
        input: PathBuf,
    },
}

fn load_project(cli: &Cli) -> Result<Project> {
    let mut project = Project::load_dir(&cli.data_dir)
        .with_context(|| format!("Failed to load project from {}", cli.data_dir.display()))?;

    apply_overrides(cli, &mut project);
    project.recompute();
    Ok(project)
}

fn apply_overrides(cli: &Cli, project: &mut Project) {
    if let Some(markup) = cli.subcontractor_markup {
        project.config.recompute.subcontractor_markup = markup;
    }
    if cli.conventional_markup {
        project.config.recompute.subcontractor_markup = CONVENTIONAL_SUBCONTRACTOR_MARKUP;
    }
    if let Some(basis) = cli.revenue_basis {
        project.params_mut().revenue_basis = match basis {
            BasisArg::Billable => RevenueBasis::BillableHours,
            BasisArg::Actual => RevenueBasis::ActualHours,
        };
    }
    if let Some(policy) = cli.category_policy {
        project.config.recompute.category_policy = match policy {
            PolicyArg::Exact => CategoryPolicy::Exact,
            PolicyArg::Normalized => CategoryPolicy::Normalized,
        };
    }
}

fn print_summary(summary: &FinancialSummary, project: &Project) {
    let params = project.params();

    println!("Project Summary");
    println!("===============\n");
    if let Some(date) = params.current_date {
        match project.periods.index_containing(date) {
            Some(index) => println!(
                "  Status Date:         {} (period {} {}, {})",
                date,
                index + 1,
                project.periods.as_slice()[index],
                project.config.calendar.contract_year(index)
            ),
            None => println!("  Status Date:         {} (outside the project periods)", date),
        }
    }
    println!("  Indirect Rate:       {:>13.2}%", params.total_indirect_rate() * 100.0);
    println!("  EAC Hours:          {:>14.2}", params.eac_hours);
    println!("  Actual Hours:        {:>14.2}", params.actual_hours);
    println!("  Billable Hours:      {:>14.2}", summary.billable_hours);
    println!("  Completion:          {:>13.2}%", summary.completion_percentage);
    println!();

    println!("  Cost Breakdown:");
    for (label, amount) in summary.cost_breakdown() {
        println!("    {:<18} ${:>14.2}", label, amount);
    }
    println!("    {:<18} ${:>14.2}", "Total Costs", summary.total_costs);
    println!();

    println!("  Recalculated Revenue: ${:>13.2}", summary.recalculated_revenue);
    println!("  Profit/Loss:          ${:>13.2}", summary.profit_loss);
    println!("  Profit Margin:        {:>13.2}%", summary.profit_margin_pct);
    println!(
        "  vs Target ({:.2}%):   {:>+13.2} pts",
        params.target_profit * 100.0,
        summary.margin_vs_target_pct(params)
    );
}

fn write_report<T: Serialize>(out_dir: &Path, file_name: &str, rows: &[T]) -> Result<()> {
    let path = out_dir.join(file_name);
    reports::write_csv_path(&path, rows)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {} ({} rows)", path.display(), rows.len());
    Ok(())
}

fn write_reports(project: &Project, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    write_report(out_dir, "monthly_revenue.csv", &reports::monthly_revenue(project))?;
    write_report(out_dir, "burn_rate.csv", &reports::burn_rate(project))?;
    write_report(out_dir, "category_summary.csv", &reports::category_summary(project))?;
    write_report(out_dir, "task_summary.csv", &reports::task_summary(&project.tasks))?;
    write_report(out_dir, "summary.csv", &reports::summary_lines(&project.summary()))?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::Restore { input } = &cli.command {
        let snapshot = Snapshot::load(input)
            .with_context(|| format!("Failed to read snapshot {}", input.display()))?;
        println!("Snapshot taken {}\n", snapshot.created_at);
        let mut project = snapshot
            .restore()
            .with_context(|| format!("Failed to restore snapshot {}", input.display()))?;
        apply_overrides(&cli, &mut project);
        project.recompute();
        print_summary(&project.summary(), &project);
        return Ok(());
    }

    let project = load_project(&cli)?;

    if let Commands::Validate = cli.command {
        return match project.validate() {
            Ok(()) => {
                println!("No validation issues");
                Ok(())
            }
            Err(e) => Err(e).context("Project data is invalid"),
        };
    }

    if !cli.skip_validation {
        project.validate().context("Project data is invalid (use --skip-validation to override)")?;
    }

    match &cli.command {
        Commands::Summary => print_summary(&project.summary(), &project),
        Commands::Report { out_dir } => write_reports(&project, out_dir)?,
        Commands::Metrics => {
            let employees = reports::employee_metrics(&project.employees);
            let subs = reports::subcontractor_metrics(&project.subcontractors);

            println!(
                "Employees:       {} ({} active, {} inactive, {} on leave, {} contract ended)",
                employees.total_employees,
                employees.active_employees,
                employees.inactive_employees,
                employees.on_leave_employees,
                employees.contract_ended_employees
            );
            println!("  Total Salary:  ${:.2}", employees.total_salary);
            println!("  Avg Salary:    ${:.2}", employees.average_salary);
            println!("Subcontractors:  {}", subs.total_subcontractors);
            println!("  Avg Rate:      ${:.2}/h", subs.average_hourly_rate);
            println!("  Monthly Cost:  ${:.2}", subs.standard_monthly_cost);
            println!("  Companies:     {}", subs.companies.join(", "));
        }
        Commands::Snapshot { output } => {
            Snapshot::capture(&project)
                .save(output)
                .with_context(|| format!("Failed to write snapshot {}", output.display()))?;
            println!("Saved snapshot to {}", output.display());
        }
        Commands::Validate | Commands::Restore { .. } => {}
    }

    Ok(())
}
