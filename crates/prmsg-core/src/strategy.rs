use std::fmt;

use serde::{Deserialize, Serialize};

pub const MERGE_STRATEGY_LABEL_SQUASH: &str = "Squash";
pub const MERGE_STRATEGY_LABEL_MERGE_COMMIT: &str = "Merge commit";
pub const MERGE_STRATEGY_LABEL_FAST_FORWARD: &str = "Fast forward";

/// Merge strategy currently selected in the host merge dialog.
///
/// Re-read from the page on every poll tick; it has no lifecycle of its own.
/// An unrecognized label parses to `None`, which callers treat as "no change
/// detected" rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    Squash,
    MergeCommit,
    FastForward,
}

impl MergeStrategy {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            MERGE_STRATEGY_LABEL_SQUASH => Some(Self::Squash),
            MERGE_STRATEGY_LABEL_MERGE_COMMIT => Some(Self::MergeCommit),
            MERGE_STRATEGY_LABEL_FAST_FORWARD => Some(Self::FastForward),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Squash => MERGE_STRATEGY_LABEL_SQUASH,
            Self::MergeCommit => MERGE_STRATEGY_LABEL_MERGE_COMMIT,
            Self::FastForward => MERGE_STRATEGY_LABEL_FAST_FORWARD,
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
