// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Errors surfaced in failure responses
//!
//! The `Display` text of each variant is the exact `error` string callers
//! receive.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Review text cannot be empty")]
    Empty,

    #[error("Review text cannot be empty or whitespace only")]
    WhitespaceOnly,

    #[error("Review text must be a string")]
    NotAString,

    /// The model backend or the explanation layer failed
    #[error("Analysis failed: {0}")]
    Failed(String),
}

impl AnalysisError {
    /// Wrap a collaborator failure, keeping its context chain
    pub fn failed(err: &anyhow::Error) -> Self {
        AnalysisError::Failed(format!("{:#}", err))
    }

    pub fn is_validation(&self) -> bool {
        !matches!(self, AnalysisError::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_messages() {
        assert_eq!(AnalysisError::Empty.to_string(), "Review text cannot be empty");
        assert_eq!(AnalysisError::NotAString.to_string(), "Review text must be a string");
        assert!(AnalysisError::WhitespaceOnly.is_validation());
        assert!(!AnalysisError::Failed("x".to_string()).is_validation());
    }

    #[test]
    fn test_failed_keeps_context_chain() {
        let err = Err::<(), _>(anyhow::anyhow!("tensor shape mismatch"))
            .context("forward pass")
            .unwrap_err();
        assert_eq!(
            AnalysisError::failed(&err).to_string(),
            "Analysis failed: forward pass: tensor shape mismatch"
        );
    }
}
