//! Terminal rendering of results.

use lp_il_analysis::pipeline::{PoolComparison, PoolSummary};
use lp_il_analysis::report::{EstimateReport, PoolInfo, PositionReport};
use lp_il_domain::metrics::{FeeAprResult, ILResult, IlScenario, TierApr};
use prettytable::{Table, row};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn pool_table(info: &PoolInfo) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Pool", info.pool_address]);
    table.add_row(row!["Type", info.pool_type]);
    table.add_row(row!["Pair", format!("{}/{}", info.token0, info.token1)]);
    table.add_row(row!["Fee tier", format!("{:.2}%", info.fee_tier_percent)]);
    table.add_row(row!["TVL", format!("${:.2}", info.tvl_usd)]);
    table.add_row(row![
        "Weights",
        info.weights
            .iter()
            .map(|w| format!("{w:.0}"))
            .collect::<Vec<_>>()
            .join("/")
    ]);
    table
}

pub fn print_estimate(report: &EstimateReport) {
    println!("📊 Pool");
    pool_table(&report.pool_info).printstd();

    println!("\n💹 Price changes over {}h", report.window_hours);
    let mut prices = Table::new();
    prices.add_row(row!["Token", "Ratio"]);
    for (symbol, ratio) in report.price_changes.iter() {
        prices.add_row(row![symbol, format!("{ratio:.4}x")]);
    }
    prices.printstd();

    println!("\n📈 Results");
    let mut results = Table::new();
    results.add_row(row!["Impermanent loss", format!("{:.4}%", report.il_percent)]);
    results.add_row(row!["Fee APR (est.)", format!("{:.2}%", report.fee_apr_est)]);
    results.add_row(row!["Volume (window)", format!("${:.2}", report.volume_window)]);
    results.add_row(row!["Data quality", report.data_quality]);
    results.printstd();

    for note in &report.notes {
        println!("• {note}");
    }
}

pub fn print_position(report: &PositionReport) {
    println!("📊 Pool");
    pool_table(&report.pool_info).printstd();

    let earnings = &report.earnings;
    println!("\n💰 Position earnings");
    let mut table = Table::new();
    table.add_row(row!["Position size", format!("${:.2}", earnings.position_size_usd)]);
    table.add_row(row!["Pool share", format!("{:.6}%", earnings.pool_share_percent)]);
    table.add_row(row![
        format!("Earnings ({}h)", report.window_hours),
        format!("${:.2}", earnings.earnings_window)
    ]);
    table.add_row(row!["Earnings (daily)", format!("${:.2}", earnings.earnings_daily)]);
    table.add_row(row!["Earnings (annual)", format!("${:.2}", earnings.earnings_annual)]);
    table.add_row(row!["APR", format!("{:.2}%", earnings.apr_percent)]);
    table.add_row(row!["Impermanent loss", format!("{:.4}%", report.il_percent)]);
    table.add_row(row!["Data quality", report.data_quality]);
    table.printstd();
}

pub fn print_summary(pool: &str, summary: &PoolSummary) {
    let mut table = Table::new();
    table.add_row(row!["Pool", pool]);
    table.add_row(row!["Type", summary.pool_type]);
    table.add_row(row!["Pair", format!("{}/{}", summary.token0, summary.token1)]);
    table.add_row(row!["Fee tier", format!("{:.2}%", summary.fee_tier_percent)]);
    table.add_row(row!["TVL", format!("${:.2}", summary.tvl_usd)]);
    table.printstd();
}

pub fn print_comparison(comparison: &PoolComparison) {
    let mut table = Table::new();
    table.add_row(row!["Pool", "Type", "Pair", "Fee tier", "TVL"]);
    for pool in &comparison.pools {
        match (&pool.summary, &pool.error) {
            (Some(s), _) => {
                table.add_row(row![
                    pool.pool_address,
                    s.pool_type,
                    format!("{}/{}", s.token0, s.token1),
                    format!("{:.2}%", s.fee_tier_percent),
                    format!("${:.2}", s.tvl_usd)
                ]);
            }
            (None, error) => {
                table.add_row(row![
                    pool.pool_address,
                    "error",
                    error.as_deref().unwrap_or("unknown"),
                    "-",
                    "-"
                ]);
            }
        }
    }
    table.printstd();
}

pub fn print_il(result: &ILResult) {
    let mut table = Table::new();
    table.add_row(row!["Impermanent loss", format!("{:.4}%", result.il_percent)]);
    table.add_row(row!["Pool", result.pool_type_label]);
    if let Some(guard) = result.guard {
        table.add_row(row!["Guard", format!("{guard:?}")]);
    }
    table.printstd();
}

pub fn print_apr(result: &FeeAprResult, velocity: f64) {
    let mut table = Table::new();
    table.add_row(row!["Fee APR", format!("{:.2}%", result.fee_apr_est)]);
    table.add_row(row!["Fees earned", format!("${:.2}", result.fees_earned)]);
    table.add_row(row!["Fee velocity", format!("{velocity:.2}x / year")]);
    if !result.annualized {
        table.add_row(row!["Note", "TVL or window is zero; APR not annualized"]);
    }
    table.printstd();
}

pub fn print_tiers(tiers: &[TierApr]) {
    let mut table = Table::new();
    table.add_row(row!["Tier", "APR"]);
    for tier in tiers {
        table.add_row(row![tier.label, format!("{:.2}%", tier.apr)]);
    }
    table.printstd();
}

pub fn print_scenarios(weights: &[f64], scenarios: &[IlScenario]) {
    let label = weights
        .iter()
        .map(|w| format!("{w}"))
        .collect::<Vec<_>>()
        .join("/");
    println!("📉 IL scenarios for a {label} pool");
    let mut table = Table::new();
    table.add_row(row!["Scenario", "Price ratio", "IL"]);
    for scenario in scenarios {
        table.add_row(row![
            scenario.label,
            format!("{:.2}x", scenario.price_ratio),
            format!("{:.4}%", scenario.il_percent)
        ]);
    }
    table.printstd();
}
