mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cmas_core::{BatteryReport, TestId};
use cmas_pose::{run_tests, BatteryRun, FrameSource, HttpFrameSource, ReplaySource};
use cmas_rubric::scoring::ScoreEntry;
use cmas_rubric::{battery_total, collect_entries};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, stamped, CmasConfig};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::List => list_tests(),
        Commands::Config => {
            let config = load_config(cli.config.as_deref())?;
            print_json(&stamped(&config))
        }
        Commands::Run {
            test,
            url,
            no_lead_in,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(url) = url {
                config.source.url = url;
            }
            if no_lead_in {
                config.battery = config.battery.without_lead_in();
            }
            let mut source = HttpFrameSource::new(&config.source);
            tracing::info!(url = source.url(), "using live landmark service");
            run_and_report(&test, &mut source, &config).await
        }
        Commands::Replay { file, test } => {
            let mut config = load_config(cli.config.as_deref())?;
            config.battery = config.battery.without_lead_in();
            let mut source = ReplaySource::from_file(&file).await?;
            run_and_report(&test, &mut source, &config).await
        }
        Commands::Total { scores } => total_scores(&scores),
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout carries the report.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// `all`, a battery number, or a test id.
fn parse_selection(selection: &str) -> Result<Vec<TestId>> {
    if selection.eq_ignore_ascii_case("all") {
        return Ok(TestId::ALL.to_vec());
    }
    Ok(vec![selection.parse()?])
}

async fn run_and_report<S: FrameSource>(
    selection: &str,
    source: &mut S,
    config: &CmasConfig,
) -> Result<()> {
    let tests = parse_selection(selection)?;
    let run = run_tests(&tests, source, &config.battery).await?;
    print_json(&build_report(&run))
}

fn build_report(run: &BatteryRun) -> BatteryReport {
    BatteryReport {
        id: uuid::Uuid::new_v4(),
        administered_at: jiff::Timestamp::now(),
        entries: run.scored.iter().map(|s| s.report_entry()).collect(),
        total: battery_total(&run.result),
    }
}

fn list_tests() -> Result<()> {
    for test in TestId::ALL {
        println!("{test}  [{}] 0-{}", test.id(), test.max_score());
        println!("    {}", test.instructions());
    }
    let max: u32 = TestId::ALL.iter().map(|t| u32::from(t.max_score())).sum();
    println!("\nBattery maximum: {max}");
    Ok(())
}

/// Score a battery from hand-entered `test=value` pairs.
fn total_scores(pairs: &[String]) -> Result<()> {
    let entries = pairs
        .iter()
        .map(|pair| parse_entry(pair))
        .collect::<Result<Vec<_>>>()?;

    let result = collect_entries(&entries)?;
    if !result.is_complete() {
        let missing: Vec<_> = result.missing().iter().map(|t| t.id()).collect();
        tracing::warn!(?missing, "battery incomplete, no total");
    }

    print_json(&serde_json::json!({
        "scores": result,
        "partial_sum": result.partial_sum(),
        "total": battery_total(&result),
    }))
}

fn parse_entry(pair: &str) -> Result<ScoreEntry> {
    let (test, value) = pair
        .split_once('=')
        .ok_or_else(|| eyre::eyre!("expected TEST=SCORE, got {pair:?}"))?;
    Ok(ScoreEntry {
        test: test.parse()?,
        value: value
            .trim()
            .parse()
            .map_err(|e| eyre::eyre!("invalid score in {pair:?}: {e}"))?,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "CMAS movement assessment from a landmark stream", long_about = None)]
struct Cli {
    /// Config file. Defaults to <config dir>/cmas/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long = "json", global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the fourteen tests with their score ranges and instructions.
    List,
    /// Print the effective configuration.
    Config,
    /// Run one test, or `all`, against the live landmark service.
    Run {
        /// Test number (1-14), test id, or `all`.
        test: String,
        /// Landmark service URL, overriding the config file.
        #[arg(long)]
        url: Option<String>,
        /// Skip the get-ready pause before head elevation.
        #[arg(long)]
        no_lead_in: bool,
    },
    /// Run a test against a recorded JSON-lines frame file, one frame per sample.
    Replay {
        file: PathBuf,
        /// Test number (1-14), test id, or `all`.
        test: String,
    },
    /// Validate and total hand-entered scores, e.g. `1=5 2=2 sit_ups=6`.
    Total {
        #[arg(required = true)]
        scores: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_accepts_all_numbers_and_ids() {
        assert_eq!(parse_selection("all").unwrap().len(), 14);
        assert_eq!(parse_selection("7").unwrap(), vec![TestId::ArmRaise]);
        assert_eq!(parse_selection("sit_ups").unwrap(), vec![TestId::SitUps]);
        assert!(parse_selection("15").is_err());
    }

    #[test]
    fn entry_parsing() {
        let entry = parse_entry("5=4").unwrap();
        assert_eq!(entry.test, TestId::SitUps);
        assert_eq!(entry.value, 4);

        assert!(parse_entry("5").is_err());
        assert!(parse_entry("5=x").is_err());
        assert!(parse_entry("bogus=1").is_err());
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from(["cmas", "--json", "replay", "rec.jsonl", "3"]).unwrap();
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Replay { ref test, .. } if test == "3"));
    }
}
