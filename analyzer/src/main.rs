// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Review analyzer CLI
//!
//! Usage:
//!   review-analyzer predict "AMAZING!!! Best product ever!!!"
//!   review-analyzer analyze --explain-only "Great product!"
//!   review-analyzer --config analyzer.json health

use anyhow::Result;
use clap::{Parser, Subcommand};
use review_analyzer::explainability::format_explanation_text;
use review_analyzer::{AnalyzerConfig, HybridAnalyzer, ReviewAnalyzer, RuleBasedExplainer};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "review-analyzer")]
#[command(about = "Detect fake product reviews with an explained verdict")]
#[command(version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true, env = "REVIEW_ANALYZER_CONFIG")]
    config: Option<PathBuf>,

    /// Hub checkpoint to load instead of the configured one
    #[arg(long, global = true)]
    checkpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the JSON analysis response for a review
    Predict { text: String },
    /// Print the full hybrid analysis report for a review
    Analyze {
        text: String,
        /// Only run the rule-based explanation layer (no model download)
        #[arg(long)]
        explain_only: bool,
    },
    /// Print model metadata
    Info,
    /// Run a health check
    Health,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = AnalyzerConfig::load(args.config.as_deref())?;
    if let Some(checkpoint) = args.checkpoint {
        config.checkpoint = checkpoint;
    }
    config.validate()?;

    if let Command::Analyze {
        text,
        explain_only: true,
    } = &args.command
    {
        let explainer = RuleBasedExplainer::new(config.thresholds.clone(), config.feature_tier);
        println!("{}", format_explanation_text(&explainer.explain(text)));
        return Ok(());
    }

    tracing::info!("Loading checkpoint {}", config.checkpoint);
    let analyzer = ReviewAnalyzer::from_config(&config)?;

    match args.command {
        Command::Predict { text } => print_json(&analyzer.predict(&text))?,
        Command::Analyze { text, .. } => {
            let analysis = analyzer.try_predict(&text)?;
            println!("{}", HybridAnalyzer::format_result(&analysis));
        }
        Command::Info => print_json(&analyzer.get_model_info())?,
        Command::Health => print_json(&analyzer.health_check())?,
    }

    Ok(())
}
