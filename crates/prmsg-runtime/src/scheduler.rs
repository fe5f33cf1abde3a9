use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use prmsg_core::{lock_or_recover, SessionState, SharedSessionState};
use prmsg_page::{MergeUiLocators, PageDocument};

use crate::config::MergeMonitorConfig;
use crate::monitor::MergeDialogMonitor;
use crate::snapshot::MergeMonitorSnapshot;

/// Running monitor: shared state/snapshot views plus shutdown control.
pub struct MergeMonitorHandle {
    state: SharedSessionState,
    snapshot: Arc<Mutex<MergeMonitorSnapshot>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MergeMonitorHandle {
    pub fn session_state(&self) -> SessionState {
        *lock_or_recover(&self.state)
    }

    pub fn snapshot(&self) -> MergeMonitorSnapshot {
        lock_or_recover(&self.snapshot).clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub async fn shutdown(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Validate config, bind the merge trigger (bounded wait), and spawn the
/// polling loop: fast state ticks and slow structural ticks multiplexed with
/// the shutdown signal on one task.
pub async fn start_merge_dialog_monitor(
    page: Arc<dyn PageDocument>,
    locators: MergeUiLocators,
    config: MergeMonitorConfig,
) -> Result<MergeMonitorHandle> {
    config.validate()?;

    let mut monitor = MergeDialogMonitor::new(page, locators, config.clone());
    monitor
        .bind_trigger_with_wait()
        .await
        .context("unable to initialize merge dialog monitor")?;

    let state = monitor.shared_session_state();
    let snapshot = monitor.snapshot_handle();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut state_interval = tokio::time::interval(config.state_poll_interval);
        state_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut structural_interval = tokio::time::interval(config.structural_poll_interval);
        structural_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = state_interval.tick() => monitor.tick_state(),
                _ = structural_interval.tick() => monitor.tick_structural(),
                _ = &mut shutdown_rx => {
                    debug!("merge dialog monitor shutting down");
                    break;
                }
            }
        }
    });

    Ok(MergeMonitorHandle {
        state,
        snapshot,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
