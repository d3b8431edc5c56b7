//! Command Line Interface for the LP Impermanent Loss Estimator.
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use lp_il_analysis::{AnalyzeOptions, PoolAnalyzer};
use lp_il_api::AppConfig;
use lp_il_data::providers::CoinGeckoOracle;
use lp_il_domain::metrics::fees::{
    calculate_breakeven_volume, calculate_fee_velocity, compare_fee_tiers, estimate_apr,
};
use lp_il_domain::metrics::impermanent_loss::{il_from_price_change, il_scenarios};
use lp_il_domain::{Chain, PoolType};
use lp_il_protocols::rpc::EvmRpcClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lp-il")]
#[command(about = "Impermanent loss and fee APR estimator for AMM liquidity pools", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that read a pool from chain.
#[derive(Args, Debug)]
struct PoolArgs {
    /// Pool contract address
    #[arg(short, long)]
    pool: String,

    /// Chain name or id (e.g. ethereum, 8453)
    #[arg(short, long, default_value = "ethereum")]
    chain: Chain,

    /// RPC endpoint; overrides the chain's *_RPC_URL variable
    #[arg(long)]
    rpc_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate IL and fee APR of a pool
    Estimate {
        #[command(flatten)]
        pool: PoolArgs,

        /// Lookback window in hours
        #[arg(short, long, default_value_t = 24)]
        window_hours: u32,

        /// Token weights, e.g. 80,20
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        /// Pool type, skipping on-chain detection (e.g. balancer)
        #[arg(long)]
        pool_type: Option<PoolType>,
    },
    /// Estimate fee earnings of a position
    Position {
        #[command(flatten)]
        pool: PoolArgs,

        /// Position size in USD
        #[arg(short, long)]
        size: f64,

        /// Lookback window in hours
        #[arg(short, long, default_value_t = 24)]
        window_hours: u32,

        /// Token weights, e.g. 80,20
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        /// Pool type, skipping on-chain detection
        #[arg(long)]
        pool_type: Option<PoolType>,
    },
    /// Show pool type, tokens, fee tier and TVL
    Summary {
        #[command(flatten)]
        pool: PoolArgs,
    },
    /// Summarize several pools side by side
    Compare {
        /// Pool addresses, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        pools: Vec<String>,

        /// Chain name or id
        #[arg(short, long, default_value = "ethereum")]
        chain: Chain,

        /// RPC endpoint; overrides the chain's *_RPC_URL variable
        #[arg(long)]
        rpc_url: Option<String>,

        /// Lookback window in hours
        #[arg(short, long, default_value_t = 24)]
        window_hours: u32,
    },
    /// IL for a price move of the second token
    Il {
        /// Price when the position was opened
        #[arg(long)]
        initial_price: f64,

        /// Price now
        #[arg(long)]
        current_price: f64,

        /// Token weights, e.g. 80,20
        #[arg(long, value_delimiter = ',', default_values_t = [50.0, 50.0])]
        weights: Vec<f64>,
    },
    /// Fee APR from volume, TVL and fee tier
    Apr {
        /// Volume in the window (USD)
        #[arg(long)]
        volume: f64,

        /// Average TVL (USD)
        #[arg(long)]
        tvl: f64,

        /// Fee fraction (0.003 for 0.3%)
        #[arg(long, default_value_t = 0.003)]
        fee_tier: f64,

        /// Window length in hours
        #[arg(short, long, default_value_t = 24)]
        window_hours: u32,
    },
    /// Fee APR at each standard fee tier
    Tiers {
        /// Volume in the window (USD)
        #[arg(long)]
        volume: f64,

        /// Average TVL (USD)
        #[arg(long)]
        tvl: f64,

        /// Window length in hours
        #[arg(short, long, default_value_t = 24)]
        window_hours: u32,
    },
    /// Volume needed to reach a target APR
    Breakeven {
        /// Average TVL (USD)
        #[arg(long)]
        tvl: f64,

        /// Fee fraction (0.003 for 0.3%)
        #[arg(long, default_value_t = 0.003)]
        fee_tier: f64,

        /// Target APR in percent
        #[arg(long)]
        target_apr: f64,

        /// Window length in hours
        #[arg(short, long, default_value_t = 24)]
        window_hours: u32,
    },
    /// IL table for standard price moves
    Scenarios {
        /// Token weights, e.g. 80,20
        #[arg(long, value_delimiter = ',', default_values_t = [50.0, 50.0])]
        weights: Vec<f64>,
    },
}

fn build_analyzer(chain: Chain, rpc_url: Option<String>) -> Result<PoolAnalyzer> {
    let config = AppConfig::from_env().context("loading configuration")?;
    let url = rpc_url
        .or_else(|| config.rpc_urls.get(&chain).cloned())
        .unwrap_or_else(|| chain.default_rpc_url().to_string());

    let contract = EvmRpcClient::new(url, config.http_timeout)?;
    let oracle = CoinGeckoOracle::new(config.coingecko, chain)?;
    Ok(PoolAnalyzer::new(chain, Arc::new(contract), Arc::new(oracle)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Commands::Estimate {
            pool,
            window_hours,
            weights,
            pool_type,
        } => {
            let analyzer = build_analyzer(pool.chain, pool.rpc_url)?;
            let options = AnalyzeOptions { weights, pool_type };
            let report = analyzer
                .estimate(&pool.pool, window_hours, &options)
                .await?;
            if json {
                output::print_json(&report)?;
            } else {
                output::print_estimate(&report);
            }
        }
        Commands::Position {
            pool,
            size,
            window_hours,
            weights,
            pool_type,
        } => {
            anyhow::ensure!(
                size.is_finite() && size >= 0.0,
                "position size must be a non-negative number"
            );
            let analyzer = build_analyzer(pool.chain, pool.rpc_url)?;
            let options = AnalyzeOptions { weights, pool_type };
            let report = analyzer
                .position(&pool.pool, window_hours, size, &options)
                .await?;
            if json {
                output::print_json(&report)?;
            } else {
                output::print_position(&report);
            }
        }
        Commands::Summary { pool } => {
            let analyzer = build_analyzer(pool.chain, pool.rpc_url)?;
            let summary = analyzer.summary(&pool.pool).await?;
            if json {
                output::print_json(&summary)?;
            } else {
                output::print_summary(&pool.pool, &summary);
            }
        }
        Commands::Compare {
            pools,
            chain,
            rpc_url,
            window_hours,
        } => {
            let analyzer = build_analyzer(chain, rpc_url)?;
            let comparison = analyzer.compare_pools(&pools, window_hours).await;
            if json {
                output::print_json(&comparison)?;
            } else {
                output::print_comparison(&comparison);
            }
        }
        Commands::Il {
            initial_price,
            current_price,
            weights,
        } => {
            let result = il_from_price_change(initial_price, current_price, &weights)?;
            if json {
                output::print_json(&result)?;
            } else {
                output::print_il(&result);
            }
        }
        Commands::Apr {
            volume,
            tvl,
            fee_tier,
            window_hours,
        } => {
            let result = estimate_apr(volume, tvl, fee_tier, window_hours);
            if json {
                output::print_json(&result)?;
            } else {
                let velocity = calculate_fee_velocity(volume, tvl, window_hours);
                output::print_apr(&result, velocity);
            }
        }
        Commands::Tiers {
            volume,
            tvl,
            window_hours,
        } => {
            let tiers = compare_fee_tiers(volume, tvl, window_hours);
            if json {
                output::print_json(&tiers)?;
            } else {
                output::print_tiers(&tiers);
            }
        }
        Commands::Breakeven {
            tvl,
            fee_tier,
            target_apr,
            window_hours,
        } => {
            let volume = calculate_breakeven_volume(tvl, fee_tier, target_apr, window_hours);
            if json {
                output::print_json(&serde_json::json!({ "volume_window": volume }))?;
            } else {
                println!(
                    "🎯 {target_apr:.2}% APR needs ${volume:.2} of volume every {window_hours}h"
                );
            }
        }
        Commands::Scenarios { weights } => {
            let scenarios = il_scenarios(&weights)?;
            if json {
                output::print_json(&scenarios)?;
            } else {
                output::print_scenarios(&weights, &scenarios);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate() {
        let cli = Cli::try_parse_from([
            "lp-il",
            "estimate",
            "--pool",
            "0xabc",
            "--chain",
            "base",
            "--weights",
            "80,20",
            "--pool-type",
            "balancer",
        ])
        .unwrap();
        let Commands::Estimate {
            pool,
            window_hours,
            weights,
            pool_type,
        } = cli.command
        else {
            panic!("expected estimate");
        };
        assert_eq!(pool.chain, Chain::Base);
        assert_eq!(window_hours, 24);
        assert_eq!(weights, Some(vec![80.0, 20.0]));
        assert_eq!(pool_type, Some(PoolType::Balancer));
    }

    #[test]
    fn test_parse_scenarios_defaults_to_balanced() {
        let cli = Cli::try_parse_from(["lp-il", "--json", "scenarios"]).unwrap();
        assert!(cli.json);
        let Commands::Scenarios { weights } = cli.command else {
            panic!("expected scenarios");
        };
        assert_eq!(weights, vec![50.0, 50.0]);
    }

    #[test]
    fn test_rejects_unknown_chain() {
        let result =
            Cli::try_parse_from(["lp-il", "summary", "--pool", "0xabc", "--chain", "solana"]);
        assert!(result.is_err());
    }
}
