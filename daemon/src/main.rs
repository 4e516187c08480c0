//! `lsd`: command-line entry point for the staking accounting core.

mod scenario;

use anyhow::Context;
use clap::Parser;
use lsd_ledger::LedgerConfig;
use lsd_utils::LogFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lsd", about = "Liquid staking accounting core")]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when absent.
    #[arg(long, env = "LSD_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the configuration file.
    #[arg(long, env = "LSD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the configuration file.
    #[arg(long, env = "LSD_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the effective configuration as TOML.
    #[command(name = "default-config")]
    DefaultConfig,

    /// Replay a JSON scenario against a fresh ledger and print one JSON
    /// record per step, followed by a summary.
    Replay {
        scenario: PathBuf,

        /// Stop at the first failing step.
        #[arg(long)]
        fail_fast: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LedgerConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => LedgerConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    lsd_utils::init_logging(config.log_format, &config.log_level);

    let repricing = &config.params.repricing;
    tracing::debug!(
        treasury_fee = %lsd_utils::format_pct(repricing.treasury_reward_pct),
        operator_fee = %lsd_utils::format_pct(repricing.operator_reward_pct),
        max_rate_diff = %lsd_utils::format_pct(repricing.max_rate_diff_pct),
        max_supply_diff = %lsd_utils::format_pct(repricing.max_supply_diff_pct),
        max_reference_diff = %lsd_utils::format_pct(config.params.oracle.max_reference_diff_pct),
        "ledger parameters"
    );

    match cli.command {
        Command::DefaultConfig => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Replay {
            scenario: path,
            fail_fast,
        } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading scenario {}", path.display()))?;
            let scenario: scenario::Scenario =
                serde_json::from_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))?;
            tracing::info!(steps = scenario.steps.len(), path = %path.display(), "replaying scenario");

            let (records, summary) = scenario::run(&config, &scenario, fail_fast)?;
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
            println!("{}", serde_json::to_string(&summary)?);

            let failed = records.iter().filter(|r| !r.ok).count();
            tracing::info!(
                steps = records.len(),
                failed,
                rate = %lsd_utils::format_wad(summary.rate),
                halted = summary.pause.is_halted(),
                "scenario finished"
            );
        }
    }

    Ok(())
}
