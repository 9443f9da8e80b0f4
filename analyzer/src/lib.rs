// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Fake review detection
//!
//! This crate provides:
//! - A DistilBERT sequence classifier (candle) for the primary FAKE/REAL verdict
//! - Linguistic feature extraction (sentiment, part of speech, spam language)
//! - A rule-based explanation layer with human-readable reasons
//! - Hybrid reconciliation of both verdicts into an agreement flag
//! - A JSON response contract, a CLI and an HTTP server on top

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod explainability;
pub mod features;
pub mod http;
pub mod hybrid;
pub mod labels;
pub mod pos;
pub mod sentiment;

pub use api::{AnalysisResponse, HealthReport, HealthStatus, ModelInfo, ResponseDetails, ReviewAnalyzer};
pub use backend::{DistilBertBackend, ModelBackend, ModelPrediction, StaticBackend};
pub use config::{AnalyzerConfig, DevicePreference, FeatureTier, Thresholds};
pub use error::AnalysisError;
pub use explainability::{Explainer, Reason, RuleBasedExplainer, XaiAnalysis, XaiVerdict};
pub use features::{FeatureExtractor, FeatureSet};
pub use hybrid::{HybridAnalysis, HybridAnalyzer};
pub use labels::{CheckpointLabel, Verdict};
