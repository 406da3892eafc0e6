//! CLI command implementations.

use clap::{Parser, Subcommand, ValueEnum};
use powerdex_engine::{
    resolve_threshold, ConcentrationMetrics, EngineError, PowerIndexEngine, Strategy,
};
use powerdex_types::{PowerIndexReport, Quorum, Weight, WeightedVotingGame};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::input::InputDocument;
use crate::output::*;

/// Main CLI.
#[derive(Parser, Debug)]
#[command(name = "powerdex")]
#[command(about = "Shapley-Shubik voting power for weighted governance bodies")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true, value_name = "FILE", env = "POWERDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (overrides the config file)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute power indices for every game in an input document
    Compute(ComputeArgs),

    /// Resolve an absolute threshold from a quorum percentage
    Threshold {
        /// Quorum percentage: "51", "66.5" or "200/3"
        #[arg(short, long)]
        quorum: String,

        /// Total weight basis (plain digits or scientific notation)
        #[arg(short, long)]
        total: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "powerdex.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for `compute`.
#[derive(clap::Args, Debug)]
pub struct ComputeArgs {
    /// Input JSON document
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Force a computation path
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Monte Carlo sample count
    #[arg(long)]
    pub samples: Option<u64>,

    /// Monte Carlo RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Largest member count computed exactly in auto mode
    #[arg(long)]
    pub exact_max: Option<usize>,

    /// Fractional digits in rendered indices
    #[arg(long)]
    pub precision: Option<usize>,

    /// Abort each game after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Run games and their inner work sequentially
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Auto,
    Exact,
    MonteCarlo,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => Strategy::Auto,
            StrategyArg::Exact => Strategy::Exact,
            StrategyArg::MonteCarlo => Strategy::MonteCarlo,
        }
    }
}

impl ComputeArgs {
    /// Apply flag overrides on top of the file configuration.
    pub fn apply(&self, config: &mut CliConfig) {
        let engine = &mut config.engine;
        if let Some(strategy) = self.strategy {
            engine.strategy = strategy.into();
        }
        if let Some(samples) = self.samples {
            engine.samples = samples;
        }
        if self.seed.is_some() {
            engine.seed = self.seed;
        }
        if let Some(exact_max) = self.exact_max {
            engine.exact_max_members = exact_max;
        }
        if let Some(precision) = self.precision {
            engine.precision = precision;
        }
        if self.timeout_ms.is_some() {
            engine.timeout_ms = self.timeout_ms;
        }
        if self.sequential {
            engine.parallel = false;
        }
    }
}

/// Load the configuration named on the command line, or the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CliConfig> {
    match path {
        Some(path) => {
            let config = CliConfig::from_file(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(CliConfig::default()),
    }
}

/// Execute a command.
pub fn execute(cmd: Commands, config: CliConfig) -> anyhow::Result<()> {
    match cmd {
        Commands::Compute(args) => execute_compute(args, config),
        Commands::Threshold { quorum, total } => execute_threshold(&quorum, &total),
        Commands::InitConfig { path, force } => execute_init_config(&path, force),
    }
}

fn execute_compute(args: ComputeArgs, mut config: CliConfig) -> anyhow::Result<()> {
    args.apply(&mut config);
    let engine = PowerIndexEngine::new(config.engine)?;
    let doc = InputDocument::from_file(&args.input)?;
    debug!("Read {} games from {}", doc.games.len(), args.input.display());

    let outputs = run_games(&engine, &doc);
    let failed = outputs.iter().filter(|g| g.is_error()).count();

    match args.format {
        OutputFormat::Table => outputs.iter().for_each(print_game_table),
        OutputFormat::Json => print_json(&outputs)?,
    }

    if failed > 0 {
        anyhow::bail!("{} of {} games failed", failed, outputs.len());
    }
    Ok(())
}

/// Build and compute every game, keeping input order. Games that fail to
/// build are reported alongside the computed ones.
pub fn run_games(engine: &PowerIndexEngine, doc: &InputDocument) -> Vec<GameOutput> {
    let mut results: Vec<Option<Result<PowerIndexReport, EngineError>>> =
        vec![None; doc.games.len()];
    let mut games: Vec<(usize, WeightedVotingGame)> = Vec::with_capacity(doc.games.len());
    for (i, input) in doc.games.iter().enumerate() {
        match input.to_game() {
            Ok(game) => games.push((i, game)),
            Err(e) => results[i] = Some(Err(e)),
        }
    }

    let mut metrics: Vec<Option<ConcentrationMetrics>> = vec![None; doc.games.len()];
    for (i, game) in &games {
        metrics[*i] = engine.concentration(game).ok();
    }
    for (i, result) in engine.compute_batch(&games) {
        results[i] = Some(result);
    }

    doc.games
        .iter()
        .zip(results)
        .zip(metrics)
        .filter_map(|((input, result), metrics)| {
            result.map(|r| GameOutput::new(input.id.clone(), &r).with_concentration(metrics))
        })
        .collect()
}

fn execute_threshold(quorum: &str, total: &str) -> anyhow::Result<()> {
    let quorum: Quorum = quorum.parse()?;
    let total: Weight = total.parse()?;
    let threshold = resolve_threshold(&quorum, total.as_biguint())?;
    println!("{}", threshold);
    Ok(())
}

fn execute_init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    CliConfig::default().to_file(path)?;
    print_success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("powerdex").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_compute() {
        let cli = parse(&[
            "compute", "--input", "games.json", "--format", "json", "--seed", "7",
            "--strategy", "monte-carlo",
        ]);
        let Commands::Compute(args) = cli.command else {
            panic!("expected compute");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.strategy, Some(StrategyArg::MonteCarlo));
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let cli = parse(&[
            "compute", "-i", "g.json", "--samples", "123", "--exact-max", "10",
            "--precision", "6", "--timeout-ms", "50", "--sequential",
        ]);
        let Commands::Compute(args) = cli.command else {
            panic!("expected compute");
        };
        let mut config = CliConfig::default();
        config.engine.seed = Some(1);
        args.apply(&mut config);
        assert_eq!(config.engine.samples, 123);
        assert_eq!(config.engine.exact_max_members, 10);
        assert_eq!(config.engine.precision, 6);
        assert_eq!(config.engine.timeout_ms, Some(50));
        assert_eq!(config.engine.seed, Some(1));
        assert!(!config.engine.parallel);
    }

    #[test]
    fn test_run_games_keeps_order_and_isolates_errors() {
        let doc = InputDocument::from_json(
            r#"{ "games": [
                { "id": "ok", "quorum": "51", "total_weight": "4",
                  "members": [ {"id":"a","weight":"1"}, {"id":"b","weight":"1"},
                               {"id":"c","weight":"1"}, {"id":"d","weight":"1"} ] },
                { "id": "negative", "quorum": "51", "total_weight": "4",
                  "members": [ {"id":"a","weight":"-1"} ] },
                { "id": "dup", "quorum": "51", "total_weight": "2",
                  "members": [ {"id":"a","weight":"1"}, {"id":"a","weight":"1"} ] }
            ] }"#,
        )
        .unwrap();
        let engine = PowerIndexEngine::new(Default::default()).unwrap();
        let outputs = run_games(&engine, &doc);

        let ids: Vec<_> = outputs.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "negative", "dup"]);
        assert!(outputs[0].results.iter().all(|r| r.index == "0.25"));
        assert!(outputs[1].error.as_deref().unwrap_or("").contains("member a"));
        assert!(outputs[2].is_error());
    }

    #[test]
    fn test_run_games_bad_quorum_and_good_game_both_return() {
        let doc = InputDocument::from_json(
            r#"{ "games": [
                { "id": "overquorum", "quorum": "150", "total_weight": "100",
                  "members": [ {"id":"a","weight":60}, {"id":"b","weight":40} ] },
                { "id": "council", "quorum": 51, "total_weight": 100,
                  "members": [ {"id":"a","weight":60}, {"id":"b","weight":30},
                               {"id":"c","weight":10} ] }
            ] }"#,
        )
        .unwrap();
        let engine = PowerIndexEngine::new(Default::default()).unwrap();
        let outputs = run_games(&engine, &doc);

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].id, "overquorum");
        assert!(outputs[0].error.as_deref().unwrap_or("").contains("exceeds 100%"));
        assert!(outputs[0].concentration.is_none());

        assert_eq!(outputs[1].id, "council");
        assert!(!outputs[1].is_error());
        let indices: Vec<_> = outputs[1].results.iter().map(|r| r.index.as_str()).collect();
        assert_eq!(indices, vec!["1", "0", "0"]);
        let metrics = outputs[1].concentration.as_ref().unwrap();
        assert_eq!(metrics.nakamoto, 1);
        assert_eq!(metrics.hhi, "4600");
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("powerdex.toml");
        execute_init_config(&path, false).unwrap();
        assert!(CliConfig::from_file(&path).is_ok());
        assert!(execute_init_config(&path, false).is_err());
        assert!(execute_init_config(&path, true).is_ok());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nseed = 42").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(load_config(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_threshold_command_inputs() {
        assert!(execute_threshold("51", "100").is_ok());
        assert!(execute_threshold("101", "100").is_err());
        assert!(execute_threshold("51", "-5").is_err());
    }
}
