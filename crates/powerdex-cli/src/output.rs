//! Output formatting utilities.
//!
//! Table output for people, JSON output for pipelines.

use colored::Colorize;
use powerdex_engine::{ConcentrationMetrics, EngineError};
use powerdex_types::{ComputeStatus, IndexValue, PowerIndexReport};
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for `compute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Result of one game, flattened for printing.
#[derive(Debug, Clone, Serialize)]
pub struct GameOutput {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
    pub results: Vec<MemberOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<ConcentrationMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One member's index.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct MemberOutput {
    pub member: String,
    pub index: String,
    /// `numerator/n!` on the exact path, `hits/samples` when sampled
    pub fraction: String,
    pub exact: bool,
}

impl GameOutput {
    pub fn new(id: impl Into<String>, result: &Result<PowerIndexReport, EngineError>) -> Self {
        let id = id.into();
        match result {
            Ok(report) => Self {
                id,
                method: Some(report.method.to_string()),
                threshold: Some(report.threshold.to_string()),
                status: Some(format_status(&report.status)),
                advisories: report.advisories.iter().map(|a| a.to_string()).collect(),
                results: report
                    .results
                    .iter()
                    .map(|r| MemberOutput {
                        member: r.member_id.to_string(),
                        index: r.index.decimal().to_string(),
                        fraction: format_fraction(&r.index),
                        exact: r.index.is_exact(),
                    })
                    .collect(),
                concentration: None,
                error: None,
            },
            Err(e) => Self {
                id,
                method: None,
                threshold: None,
                status: None,
                advisories: Vec::new(),
                results: Vec::new(),
                concentration: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Attach weight concentration. Ignored for failed games.
    pub fn with_concentration(mut self, metrics: Option<ConcentrationMetrics>) -> Self {
        if !self.is_error() {
            self.concentration = metrics;
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Format a report status.
pub fn format_status(status: &ComputeStatus) -> String {
    match status {
        ComputeStatus::Complete => "complete".to_string(),
        ComputeStatus::Aborted { completed, planned } => {
            format!("aborted ({}/{})", completed, planned)
        }
    }
}

/// Format an index as the fraction it was rendered from.
pub fn format_fraction(index: &IndexValue) -> String {
    match index {
        IndexValue::Exact { numerator, denominator, .. } => format!("{}/{}", numerator, denominator),
        IndexValue::Sampled { hits, samples, .. } => format!("{}/{}", hits, samples),
    }
}

/// Print success message.
pub fn print_success(msg: &str) {
    println!("{}", format!("✓ {}", msg).green());
}

/// Print error message.
pub fn print_error(msg: &str) {
    eprintln!("{}", format!("✗ {}", msg).red());
}

/// Print warning message.
pub fn print_warning(msg: &str) {
    println!("{}", format!("⚠ {}", msg).yellow());
}

/// Print one game as a table.
pub fn print_game_table(game: &GameOutput) {
    println!("{}", game.id.bold());
    if let Some(error) = &game.error {
        print_error(error);
        println!();
        return;
    }
    println!(
        "method: {}  threshold: {}  status: {}",
        game.method.as_deref().unwrap_or("-").bright_cyan(),
        game.threshold.as_deref().unwrap_or("-"),
        game.status.as_deref().unwrap_or("-"),
    );
    if let Some(c) = &game.concentration {
        println!(
            "nakamoto: {} ({})  top share: {}  gini: {}  hhi: {}  entropy: {:.4} bits",
            c.nakamoto, c.fractional_nakamoto, c.top_share, c.gini, c.hhi, c.entropy_bits,
        );
    }
    for advisory in &game.advisories {
        print_warning(advisory);
    }
    if !game.results.is_empty() {
        println!("{}", Table::new(&game.results));
    }
    println!();
}

/// Print all games as one JSON document.
pub fn print_json(games: &[GameOutput]) -> anyhow::Result<()> {
    let doc = serde_json::json!({ "games": games });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
