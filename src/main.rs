//! Fiscal Projection CLI
//!
//! Command-line interface for running unified budget projections

use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use fiscal_projection::{
    Assumptions, BudgetRequest, FiscalModel, ModelConfig, PolicyMechanics, TrustFund,
};

#[derive(Parser, Debug)]
#[command(name = "fiscal_projection")]
#[command(about = "Monte Carlo projection of federal revenue, spending, debt and trust fund solvency")]
struct Cli {
    /// Projection horizon in years
    #[arg(short, long, default_value = "30")]
    years: u32,

    /// Monte Carlo iterations per component
    #[arg(short = 'n', long, default_value = "1000")]
    iterations: u32,

    #[arg(long, default_value = "baseline")]
    revenue_scenario: String,

    #[arg(long, default_value = "baseline")]
    social_security_scenario: String,

    #[arg(long, default_value = "baseline")]
    healthcare_scenario: String,

    #[arg(long, default_value = "baseline")]
    discretionary_scenario: String,

    #[arg(long, default_value = "baseline")]
    interest_scenario: String,

    /// Base random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Run iterations on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Policy mechanics record (JSON)
    #[arg(short, long)]
    mechanics: Option<PathBuf>,

    /// Assumption overrides (CSV with parameter,value columns)
    #[arg(short, long)]
    assumptions: Option<PathBuf>,

    /// Target debt-to-GDP ratio for the fiscal gap
    #[arg(long, default_value = "0.99")]
    target_debt_ratio: f64,

    /// Discount rate for the fiscal gap
    #[arg(long, default_value = "0.03")]
    discount_rate: f64,

    /// Print the budget, summary and solvency report as JSON
    #[arg(long)]
    json: bool,

    /// Write the unified budget table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let request = BudgetRequest::parse(
        cli.years,
        cli.iterations,
        &cli.revenue_scenario,
        &cli.social_security_scenario,
        &cli.healthcare_scenario,
        &cli.discretionary_scenario,
        &cli.interest_scenario,
    )?;

    let assumptions = match &cli.assumptions {
        Some(path) => Assumptions::from_csv_path(path)
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::default_baseline(),
    };

    let mut config = ModelConfig::default().with_seed(cli.seed);
    config.parallel = !cli.sequential;
    let mut model = FiscalModel::with_assumptions(config, assumptions);

    if let Some(path) = &cli.mechanics {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading policy mechanics from {}", path.display()))?;
        let mechanics = PolicyMechanics::from_json(&json)?;
        model.apply_policy_mechanics(Some(mechanics))?;
    }

    let budget = model.project_unified_budget(&request)?;
    let summary = model.fiscal_summary(&budget);
    let gap = model.fiscal_gap(&budget, cli.target_debt_ratio, cli.discount_rate);
    let solvency = model.trust_fund_solvency(cli.years, cli.iterations, request.social_security)?;

    if let Some(path) = &cli.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        budget.write_csv(file)?;
    }

    if cli.json {
        let out = serde_json::json!({
            "budget": budget,
            "summary": summary,
            "fiscal_gap": gap,
            "solvency": solvency,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Fiscal Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("========================\n");
    println!(
        "{} years x {} iterations, seed {}",
        request.years(),
        request.iterations(),
        cli.seed
    );
    println!();

    println!(
        "{:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Year", "Revenue", "SocSec", "Health", "Discr", "Interest", "Spending", "Deficit", "Def%GDP"
    );
    println!("{}", "-".repeat(96));
    for row in &budget.rows {
        println!(
            "{:>6} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>9.2}%",
            row.year,
            row.total_revenue,
            row.social_security_spending,
            row.healthcare_spending,
            row.discretionary_spending,
            row.interest_spending,
            row.total_spending,
            row.deficit_surplus,
            row.deficit_share_of_gdp() * 100.0,
        );
    }

    println!("\nSummary:");
    println!("  Total Revenue:       ${:.1}B", summary.total_revenue);
    println!("  Total Spending:      ${:.1}B", summary.total_spending);
    println!("  Cumulative Deficit:  ${:.1}B", summary.cumulative_deficit);
    println!("  Avg Deficit % GDP:   {:.2}%", summary.average_deficit_share * 100.0);
    println!("  Final Debt % GDP:    {:.1}%", summary.final_debt_to_gdp * 100.0);
    println!(
        "  Fiscal Gap:          {:.2}% of GDP (target debt {:.0}%)",
        gap * 100.0,
        cli.target_debt_ratio * 100.0
    );

    println!("\nTrust Fund Solvency ({} scenario):", solvency.scenario);
    for fund in TrustFund::ALL {
        if let Some(est) = solvency.fund(fund) {
            match (est.depletion_year_median, est.depletion_year_p10, est.depletion_year_p90) {
                (Some(median), Some(p10), Some(p90)) => println!(
                    "  {:<6} depletion {:.0} (p10 {:.0}, p90 {:.0}), P(depleted) {:.1}%",
                    fund.name(),
                    median,
                    p10,
                    p90,
                    est.probability_depleted * 100.0
                ),
                _ => println!(
                    "  {:<6} solvent through {} in every iteration",
                    fund.name(),
                    solvency.start_year + solvency.horizon_years.saturating_sub(1)
                ),
            }
        }
    }

    if let Some(path) = &cli.csv {
        println!("\nBudget table written to: {}", path.display());
    }

    Ok(())
}
