use std::time::Duration;

use anyhow::Result;

/// Polling cadence and wait ceilings for the merge dialog monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeMonitorConfig {
    /// Fast tick: dialog open/close, strategy changes, edit-tracker attach.
    pub state_poll_interval: Duration,
    /// Slow tick: merge trigger DOM-replacement detection.
    pub structural_poll_interval: Duration,
    /// Ceiling on the wait for the dialog indicator after a trigger click.
    pub dialog_wait_timeout: Duration,
    /// Ceiling on the wait for the merge trigger at startup.
    pub trigger_wait_timeout: Duration,
}

impl Default for MergeMonitorConfig {
    fn default() -> Self {
        Self {
            state_poll_interval: Duration::from_millis(100),
            structural_poll_interval: Duration::from_secs(1),
            dialog_wait_timeout: Duration::from_secs(10),
            trigger_wait_timeout: Duration::from_secs(10),
        }
    }
}

impl MergeMonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.state_poll_interval.is_zero() {
            anyhow::bail!("merge monitor state poll interval must be greater than zero");
        }
        if self.structural_poll_interval.is_zero() {
            anyhow::bail!("merge monitor structural poll interval must be greater than zero");
        }
        Ok(())
    }

    /// Number of state ticks the dialog-appearance wait may span.
    pub(crate) fn dialog_wait_tick_budget(&self) -> u64 {
        let poll_ms = self.state_poll_interval.as_millis().max(1);
        let timeout_ms = self.dialog_wait_timeout.as_millis();
        u64::try_from(timeout_ms.div_ceil(poll_ms)).unwrap_or(u64::MAX)
    }
}
