// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Linguistic feature extraction for fake review detection
//!
//! Tier 1 (essential): sentiment, word count, adjective/noun ratio,
//! first-person pronoun usage.
//!
//! Tier 2 (important): spam keywords, ALL CAPS words, repeated
//! punctuation, vocabulary redundancy.

use crate::config::FeatureTier;
use crate::pos::Tagger;
use crate::sentiment::SentimentAnalyzer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const FIRST_PERSON: &[&str] = &[
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves",
];

/// Category of a spam keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpamCategory {
    ExtremePositive,
    ExtremeNegative,
    Promotional,
}

const SPAM_KEYWORDS: &[(SpamCategory, &[&str])] = &[
    (
        SpamCategory::ExtremePositive,
        &["amazing", "perfect", "best ever", "incredible", "outstanding", "flawless"],
    ),
    (
        SpamCategory::ExtremeNegative,
        &["worst", "terrible", "horrible", "awful", "disgusting", "pathetic"],
    ),
    (
        SpamCategory::Promotional,
        &["buy now", "must have", "life changing", "miracle", "highly recommend"],
    ),
];

/// A spam keyword found in a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamMatch {
    pub keyword: String,
    pub category: SpamCategory,
}

/// Repeated punctuation runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunctuationRuns {
    /// Runs of two or more `!`
    pub exclamations: usize,
    /// Runs of two or more `?`
    pub questions: usize,
    /// Runs of three or more `.`
    pub ellipses: usize,
}

impl PunctuationRuns {
    pub fn total(&self) -> usize {
        self.exclamations + self.questions + self.ellipses
    }
}

/// Features extracted from one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub sentiment: f64,
    pub word_count: usize,
    pub adj_noun_ratio: f64,
    pub adjective_count: usize,
    pub noun_count: usize,
    pub first_person_ratio: f64,
    pub first_person_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_keyword_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caps_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excessive_punct_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniqueness_ratio: Option<f64>,
}

/// Extracts [`FeatureSet`]s; holds the sentiment lexicon and tagger
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    sentiment: SentimentAnalyzer,
    tagger: Tagger,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&self, text: &str, tier: FeatureTier) -> FeatureSet {
        let tags = self.tagger.count(text);
        let (first_person_ratio, first_person_count) = first_person_usage(text);

        let mut features = FeatureSet {
            sentiment: self.sentiment.polarity(text),
            word_count: word_count(text),
            adj_noun_ratio: tags.adjectives as f64 / tags.nouns.max(1) as f64,
            adjective_count: tags.adjectives,
            noun_count: tags.nouns,
            first_person_ratio,
            first_person_count,
            spam_keyword_count: None,
            caps_ratio: None,
            excessive_punct_count: None,
            uniqueness_ratio: None,
        };

        if tier >= FeatureTier::Important {
            features.spam_keyword_count = Some(spam_keywords(text).len());
            features.caps_ratio = Some(caps_words(text).0);
            features.excessive_punct_count = Some(punctuation_runs(text).total());
            features.uniqueness_ratio = Some(uniqueness_ratio(text));
        }

        features
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Share of whitespace words that are first-person pronouns, and their count
pub fn first_person_usage(text: &str) -> (f64, usize) {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    let count = words
        .iter()
        .filter(|word| FIRST_PERSON.contains(&word.as_str()))
        .count();
    (count as f64 / words.len().max(1) as f64, count)
}

/// Substring matches against the spam keyword lists, in list order
pub fn spam_keywords(text: &str) -> Vec<SpamMatch> {
    let lower = text.to_lowercase();
    SPAM_KEYWORDS
        .iter()
        .flat_map(|(category, keywords)| {
            keywords.iter().map(move |keyword| (*category, *keyword))
        })
        .filter(|(_, keyword)| lower.contains(*keyword))
        .map(|(category, keyword)| SpamMatch {
            keyword: keyword.to_string(),
            category,
        })
        .collect()
}

/// Ratio of ALL CAPS words among purely alphabetic words, and those words
pub fn caps_words(text: &str) -> (f64, Vec<&str>) {
    let alphabetic: Vec<&str> = text
        .split_whitespace()
        .filter(|word| word.chars().all(char::is_alphabetic))
        .collect();
    let caps: Vec<&str> = alphabetic
        .iter()
        .copied()
        .filter(|word| word.chars().count() > 1 && word.chars().all(char::is_uppercase))
        .collect();
    (caps.len() as f64 / alphabetic.len().max(1) as f64, caps)
}

pub fn punctuation_runs(text: &str) -> PunctuationRuns {
    let mut runs = PunctuationRuns::default();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let mut length = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            length += 1;
        }
        match c {
            '!' if length >= 2 => runs.exclamations += 1,
            '?' if length >= 2 => runs.questions += 1,
            '.' if length >= 3 => runs.ellipses += 1,
            _ => {}
        }
    }
    runs
}

/// Unique lowercased whitespace words over all words
pub fn uniqueness_ratio(text: &str) -> f64 {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    let unique: HashSet<&String> = words.iter().collect();
    unique.len() as f64 / words.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const HYPE: &str = "This is AMAZING!!! Best EVER!!! I love it! Perfect!!!";
    const GENUINE: &str = "Bought this laptop 3 weeks ago for school. Battery lasts about 6 hours. \
                           Keyboard is comfortable but trackpad could be better. Good value overall.";

    #[test]
    fn test_spam_keywords() {
        let found = spam_keywords("Amazing best perfect");
        let keywords: Vec<&str> = found.iter().map(|m| m.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["amazing", "perfect"]);
        assert!(found.iter().all(|m| m.category == SpamCategory::ExtremePositive));

        let found = spam_keywords("A miracle, buy now! Worst competitor.");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_punctuation_runs() {
        let runs = punctuation_runs("Great!!! Really???");
        assert_eq!(runs, PunctuationRuns { exclamations: 1, questions: 1, ellipses: 0 });
        assert_eq!(runs.total(), 2);

        let runs = punctuation_runs("Well... okay.. fine!");
        assert_eq!(runs.ellipses, 1);
        assert_eq!(runs.total(), 1);
    }

    #[test]
    fn test_caps_words_only_counts_alphabetic() {
        let (ratio, words) = caps_words("This is AMAZING!!! Best EVER!!! I love it! Perfect!!!");
        // "This", "is", "Best", "I", "love"
        assert!(words.is_empty());
        assert_eq!(ratio, 0.0);

        let (ratio, words) = caps_words("THIS IS great");
        assert_eq!(words, vec!["THIS", "IS"]);
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_person_and_uniqueness() {
        let (ratio, count) = first_person_usage("I love my phone and I use it daily");
        assert_eq!(count, 3);
        assert!((ratio - 3.0 / 9.0).abs() < 1e-9);

        assert_eq!(uniqueness_ratio("good good good good"), 0.25);
        assert_eq!(uniqueness_ratio(""), 0.0);
    }

    #[test]
    fn test_extract_tiers() {
        let extractor = FeatureExtractor::new();

        let essential = extractor.extract(HYPE, FeatureTier::Essential);
        assert_eq!(essential.word_count, 9);
        assert!(essential.spam_keyword_count.is_none());
        assert!(essential.uniqueness_ratio.is_none());

        let full = extractor.extract(HYPE, FeatureTier::Important);
        assert_eq!(full.spam_keyword_count, Some(3));
        assert_eq!(full.excessive_punct_count, Some(3));
        assert!(full.sentiment > 0.85);
    }

    #[test]
    fn test_extract_genuine_review() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract(GENUINE, FeatureTier::Important);
        assert_eq!(features.word_count, 24);
        assert_eq!(features.spam_keyword_count, Some(0));
        assert_eq!(features.excessive_punct_count, Some(0));
        assert_eq!(features.caps_ratio, Some(0.0));
        assert!(features.adj_noun_ratio < 2.5);
    }
}
