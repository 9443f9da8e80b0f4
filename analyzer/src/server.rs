// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! HTTP server for the review analyzer
//!
//! Usage:
//!   review-server --addr 0.0.0.0:8000
//!   curl -X POST localhost:8000/predict -H 'content-type: application/json' \
//!        -d '{"review": "Great product!"}'

use anyhow::{Context, Result};
use clap::Parser;
use review_analyzer::http::{self, ApiState};
use review_analyzer::{AnalyzerConfig, ReviewAnalyzer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "review-server")]
#[command(about = "Serve fake review analysis over HTTP")]
#[command(version)]
struct Args {
    /// Bind address (overrides the configured one)
    #[arg(short, long)]
    addr: Option<String>,

    /// JSON configuration file
    #[arg(short, long, env = "REVIEW_ANALYZER_CONFIG")]
    config: Option<PathBuf>,

    /// Hub checkpoint to load instead of the configured one
    #[arg(long)]
    checkpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();

    let mut config = AnalyzerConfig::load(args.config.as_deref())?;
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }
    if let Some(checkpoint) = args.checkpoint {
        config.checkpoint = checkpoint;
    }
    config.validate()?;

    tracing::info!("Loading checkpoint {}", config.checkpoint);
    let model_config = config.clone();
    let analyzer = tokio::task::spawn_blocking(move || ReviewAnalyzer::from_config(&model_config))
        .await
        .context("model loading task failed")??;

    http::serve(&config.bind_addr, ApiState::new(analyzer)).await
}
