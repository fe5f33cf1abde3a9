use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MERGE_MONITOR_SNAPSHOT_SCHEMA_VERSION: u32 = 1;

pub const REASON_DIALOG_OPENED: &str = "merge_dialog_opened";
pub const REASON_DIALOG_CLOSED: &str = "merge_dialog_closed";
pub const REASON_DIALOG_WAIT_TIMEOUT: &str = "merge_dialog_wait_timeout";
pub const REASON_STRATEGY_CHANGED: &str = "merge_strategy_changed";
pub const REASON_TRIGGER_REBOUND: &str = "merge_trigger_rebound";
pub const REASON_MESSAGE_WRITTEN: &str = "commit_message_written";
pub const REASON_WRITE_SKIPPED_USER_EDIT: &str = "commit_message_write_skipped_user_edit";
pub const REASON_WRITE_FAILED: &str = "commit_message_write_failed";

/// How many recent reason codes the snapshot retains.
pub(crate) const REASON_CODE_CAP: usize = 16;

fn merge_monitor_snapshot_schema_version() -> u32 {
    MERGE_MONITOR_SNAPSHOT_SCHEMA_VERSION
}

/// Diagnostic view of the monitor, refreshed at every tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeMonitorSnapshot {
    #[serde(default = "merge_monitor_snapshot_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub state_ticks: u64,
    #[serde(default)]
    pub structural_ticks: u64,
    #[serde(default)]
    pub dialog_open: bool,
    #[serde(default)]
    pub commit_message_changed_by_user: bool,
    #[serde(default)]
    pub last_strategy: Option<String>,
    #[serde(default)]
    pub messages_written: u64,
    #[serde(default)]
    pub trigger_rebinds: u64,
    /// Most recent transition reason codes, oldest first, capped.
    #[serde(default)]
    pub reason_codes: Vec<String>,
}

impl Default for MergeMonitorSnapshot {
    fn default() -> Self {
        Self {
            schema_version: MERGE_MONITOR_SNAPSHOT_SCHEMA_VERSION,
            state_ticks: 0,
            structural_ticks: 0,
            dialog_open: false,
            commit_message_changed_by_user: false,
            last_strategy: None,
            messages_written: 0,
            trigger_rebinds: 0,
            reason_codes: Vec::new(),
        }
    }
}

impl MergeMonitorSnapshot {
    pub(crate) fn record_reason(&mut self, code: &str) {
        self.reason_codes.push(code.to_string());
        if self.reason_codes.len() > REASON_CODE_CAP {
            let excess = self.reason_codes.len() - REASON_CODE_CAP;
            self.reason_codes.drain(..excess);
        }
    }
}

/// Serialize the snapshot to a JSON file (harness summary output).
pub fn persist_monitor_snapshot(path: &Path, snapshot: &MergeMonitorSnapshot) -> Result<()> {
    let payload =
        serde_json::to_string_pretty(snapshot).context("serialize merge monitor snapshot")?;
    std::fs::write(path, payload)
        .with_context(|| format!("write merge monitor snapshot to {}", path.display()))
}
