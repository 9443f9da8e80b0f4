// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Verdict labels shared by the model backend and the explanation layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary verdict for a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Computer generated or otherwise fake review
    Fake,
    /// Original, genuine review
    Real,
}

impl Verdict {
    pub fn is_fake(&self) -> bool {
        matches!(self, Verdict::Fake)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fake => "FAKE",
            Verdict::Real => "REAL",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw class label emitted by the fine-tuned checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckpointLabel {
    /// Class id 0: computer generated
    Cg,
    /// Class id 1: original
    Or,
}

impl CheckpointLabel {
    /// Number of classes the classification head produces
    pub const NUM_CLASSES: usize = 2;

    /// Map a class id from the classification head
    pub fn from_class_id(id: usize) -> Option<Self> {
        match id {
            0 => Some(CheckpointLabel::Cg),
            1 => Some(CheckpointLabel::Or),
            _ => None,
        }
    }

    pub fn class_id(&self) -> usize {
        match self {
            CheckpointLabel::Cg => 0,
            CheckpointLabel::Or => 1,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            CheckpointLabel::Cg => Verdict::Fake,
            CheckpointLabel::Or => Verdict::Real,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointLabel::Cg => "CG",
            CheckpointLabel::Or => "OR",
        }
    }
}

impl fmt::Display for CheckpointLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_id_mapping() {
        assert_eq!(CheckpointLabel::from_class_id(0), Some(CheckpointLabel::Cg));
        assert_eq!(CheckpointLabel::from_class_id(1), Some(CheckpointLabel::Or));
        assert_eq!(CheckpointLabel::from_class_id(2), None);
        assert_eq!(CheckpointLabel::Cg.verdict(), Verdict::Fake);
        assert_eq!(CheckpointLabel::Or.verdict(), Verdict::Real);
    }

    #[test]
    fn test_verdict_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Verdict::Fake).unwrap(), "\"FAKE\"");
        assert_eq!(serde_json::to_string(&CheckpointLabel::Or).unwrap(), "\"OR\"");
        let parsed: Verdict = serde_json::from_str("\"REAL\"").unwrap();
        assert_eq!(parsed, Verdict::Real);
    }
}
