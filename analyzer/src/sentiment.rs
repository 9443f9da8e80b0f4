// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! VADER sentiment scoring
//!
//! Wraps the full VADER lexicon and rules (boosters, negation, ALL CAPS
//! emphasis, "but" shifts, punctuation amplifiers). Only the normalized
//! compound score in [-1.0, 1.0] is used downstream.

use vader_sentiment::SentimentIntensityAnalyzer;

const COMPOUND: &str = "compound";

/// Compound sentiment scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compound sentiment in [-1.0, 1.0]
    pub fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        // The lexicon is parsed once and shared; the analyzer only borrows it
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        scores
            .get(COMPOUND)
            .copied()
            .filter(|score| score.is_finite())
            .map_or(0.0, |score| score.clamp(-1.0, 1.0))
    }
}
