use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, error, warn};

use prmsg_core::{
    lock_or_recover, shared_session_state, EnhancerError, MergeStrategy, SessionState,
    SharedSessionState,
};
use prmsg_message::compose_commit_message;
use prmsg_page::{
    find_commit_message_field, find_merge_trigger, is_merge_dialog_showing, read_merge_strategy,
    read_pull_request_facts, ElementId, ListenerId, MergeUiLocators, PageDocument, SignalKind,
};

use crate::config::MergeMonitorConfig;
use crate::snapshot::{
    MergeMonitorSnapshot, REASON_DIALOG_CLOSED, REASON_DIALOG_OPENED, REASON_DIALOG_WAIT_TIMEOUT,
    REASON_MESSAGE_WRITTEN, REASON_STRATEGY_CHANGED, REASON_TRIGGER_REBOUND, REASON_WRITE_FAILED,
    REASON_WRITE_SKIPPED_USER_EDIT,
};
use crate::writer::write_commit_message;

/// Tick-driven state machine over the merge dialog.
///
/// `tick_state` runs at the fast cadence (dialog open/close, strategy change,
/// edit-tracker attachment); `tick_structural` at the slow cadence (trigger
/// DOM replacement). The Tokio scheduler calls them on their intervals; tests
/// call them directly for deterministic transition coverage.
pub struct MergeDialogMonitor {
    page: Arc<dyn PageDocument>,
    locators: MergeUiLocators,
    config: MergeMonitorConfig,
    state: SharedSessionState,
    trigger: Option<ElementId>,
    trigger_listener: Option<ListenerId>,
    trigger_activated: Arc<AtomicBool>,
    dialog_wait_ticks_left: Option<u64>,
    last_strategy: Option<MergeStrategy>,
    field_listener: Option<ListenerId>,
    snapshot: Arc<Mutex<MergeMonitorSnapshot>>,
}

impl MergeDialogMonitor {
    pub fn new(
        page: Arc<dyn PageDocument>,
        locators: MergeUiLocators,
        config: MergeMonitorConfig,
    ) -> Self {
        Self {
            page,
            locators,
            config,
            state: shared_session_state(),
            trigger: None,
            trigger_listener: None,
            trigger_activated: Arc::new(AtomicBool::new(false)),
            dialog_wait_ticks_left: None,
            last_strategy: None,
            field_listener: None,
            snapshot: Arc::new(Mutex::new(MergeMonitorSnapshot::default())),
        }
    }

    pub fn session_state(&self) -> SessionState {
        *lock_or_recover(&self.state)
    }

    pub fn shared_session_state(&self) -> SharedSessionState {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> MergeMonitorSnapshot {
        lock_or_recover(&self.snapshot).clone()
    }

    pub(crate) fn snapshot_handle(&self) -> Arc<Mutex<MergeMonitorSnapshot>> {
        Arc::clone(&self.snapshot)
    }

    /// Resolve the merge trigger and bind the open-detection listener to it.
    pub fn bind_trigger(&mut self) -> Result<(), EnhancerError> {
        match find_merge_trigger(self.page.as_ref(), &self.locators) {
            Some(element) => {
                self.bind_trigger_to(element);
                Ok(())
            }
            None => Err(EnhancerError::not_found("merge trigger")),
        }
    }

    /// Bounded startup wait for the trigger: the page renders it
    /// asynchronously, so resolution is retried at the fast cadence up to
    /// the configured ceiling.
    pub async fn bind_trigger_with_wait(&mut self) -> Result<(), EnhancerError> {
        let poll = self.config.state_poll_interval;
        let mut waited = Duration::ZERO;
        loop {
            if self.bind_trigger().is_ok() {
                return Ok(());
            }
            if waited >= self.config.trigger_wait_timeout {
                return Err(EnhancerError::timeout(
                    "merge trigger",
                    u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                ));
            }
            tokio::time::sleep(poll).await;
            waited += poll;
        }
    }

    fn bind_trigger_to(&mut self, element: ElementId) {
        if let Some(listener) = self.trigger_listener.take() {
            self.page.remove_signal_listener(listener);
        }
        let activated = Arc::clone(&self.trigger_activated);
        let listener = self.page.add_signal_listener(
            element,
            SignalKind::Click,
            Arc::new(move |_| {
                activated.store(true, Ordering::SeqCst);
            }),
        );
        self.trigger = Some(element);
        self.trigger_listener = Some(listener);
    }

    /// Fast tick: every dialog transition except trigger replacement.
    pub fn tick_state(&mut self) {
        if self.trigger_activated.swap(false, Ordering::SeqCst) {
            debug!("merge trigger clicked; waiting for dialog to appear");
            self.dialog_wait_ticks_left = Some(self.config.dialog_wait_tick_budget());
        }

        if let Some(remaining) = self.dialog_wait_ticks_left {
            if is_merge_dialog_showing(self.page.as_ref(), &self.locators) {
                self.dialog_wait_ticks_left = None;
                self.on_dialog_opened();
            } else if remaining == 0 {
                self.dialog_wait_ticks_left = None;
                error!(
                    timeout_ms = u64::try_from(self.config.dialog_wait_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                    "merge dialog did not appear after trigger click"
                );
                self.record_reason(REASON_DIALOG_WAIT_TIMEOUT);
            } else {
                self.dialog_wait_ticks_left = Some(remaining - 1);
            }
        }

        let dialog_open = lock_or_recover(&self.state).dialog_open;
        if dialog_open && !is_merge_dialog_showing(self.page.as_ref(), &self.locators) {
            lock_or_recover(&self.state).dialog_open = false;
            self.detach_edit_tracker();
            debug!("merge dialog closed");
            self.record_reason(REASON_DIALOG_CLOSED);
        }

        if lock_or_recover(&self.state).dialog_open {
            if let Some(strategy) = read_merge_strategy(self.page.as_ref(), &self.locators) {
                if self.last_strategy != Some(strategy) {
                    self.last_strategy = Some(strategy);
                    debug!(%strategy, "merge strategy changed");
                    self.record_reason(REASON_STRATEGY_CHANGED);
                    if let Err(err) = self.update_commit_message(Some(strategy)) {
                        warn!(error = %err, "unable to update commit message after strategy change");
                        self.record_reason(REASON_WRITE_FAILED);
                    }
                }
            }
            self.attach_edit_tracker_if_needed();
        }

        let mut snapshot = lock_or_recover(&self.snapshot);
        snapshot.state_ticks += 1;
        self.sync_snapshot(&mut snapshot);
    }

    /// Slow tick: re-resolve the trigger and rebind when the host re-render
    /// replaced the element.
    pub fn tick_structural(&mut self) {
        match find_merge_trigger(self.page.as_ref(), &self.locators) {
            Some(element) if self.trigger != Some(element) => {
                debug!("merge trigger replaced in the DOM; rebinding");
                self.bind_trigger_to(element);
                let mut snapshot = lock_or_recover(&self.snapshot);
                snapshot.trigger_rebinds += 1;
                snapshot.record_reason(REASON_TRIGGER_REBOUND);
            }
            Some(_) => {}
            None => {
                debug!("merge trigger not resolvable; retrying next structural tick");
            }
        }
        let mut snapshot = lock_or_recover(&self.snapshot);
        snapshot.structural_ticks += 1;
        self.sync_snapshot(&mut snapshot);
    }

    /// Reset session state, write the composed message, then mark the dialog
    /// open. The write happens before tracking begins so it cannot be
    /// misattributed as a user edit.
    fn on_dialog_opened(&mut self) {
        lock_or_recover(&self.state).reset();
        let strategy = read_merge_strategy(self.page.as_ref(), &self.locators);
        if let Err(err) = self.update_commit_message(strategy) {
            error!(error = %err, "unable to update commit message on dialog open");
            self.record_reason(REASON_WRITE_FAILED);
        }
        lock_or_recover(&self.state).dialog_open = true;
        self.last_strategy = strategy;
        debug!(strategy = strategy.map(|s| s.label()), "merge dialog opened");
        self.record_reason(REASON_DIALOG_OPENED);
    }

    fn update_commit_message(
        &mut self,
        strategy: Option<MergeStrategy>,
    ) -> Result<(), EnhancerError> {
        if lock_or_recover(&self.state).commit_message_changed_by_user {
            debug!("commit message was edited by the user; leaving it alone");
            self.record_reason(REASON_WRITE_SKIPPED_USER_EDIT);
            return Ok(());
        }

        let facts = read_pull_request_facts(self.page.as_ref(), &self.locators)?;
        let field = find_commit_message_field(self.page.as_ref(), &self.locators)
            .ok_or(EnhancerError::FieldNotFound)?;
        let default_message = self
            .page
            .field_value(field)
            .ok_or(EnhancerError::FieldNotFound)?;

        let message = compose_commit_message(strategy, &default_message, &facts);
        write_commit_message(self.page.as_ref(), field, &self.state, &message);

        let mut snapshot = lock_or_recover(&self.snapshot);
        snapshot.messages_written += 1;
        snapshot.record_reason(REASON_MESSAGE_WRITTEN);
        drop(snapshot);
        debug!(
            strategy = strategy.map(|s| s.label()),
            "commit message updated"
        );
        Ok(())
    }

    /// Attach the input listener once per dialog session; the field may not
    /// exist yet when the dialog opens, so this retries every fast tick.
    fn attach_edit_tracker_if_needed(&mut self) {
        if self.field_listener.is_some() {
            return;
        }
        let Some(field) = find_commit_message_field(self.page.as_ref(), &self.locators) else {
            return;
        };
        let state = Arc::clone(&self.state);
        let listener = self.page.add_signal_listener(
            field,
            SignalKind::Input,
            Arc::new(move |_| {
                let mut session = lock_or_recover(&state);
                if !session.suppress_change_tracking {
                    session.commit_message_changed_by_user = true;
                }
            }),
        );
        self.field_listener = Some(listener);
    }

    fn detach_edit_tracker(&mut self) {
        if let Some(listener) = self.field_listener.take() {
            self.page.remove_signal_listener(listener);
        }
    }

    fn record_reason(&self, code: &str) {
        lock_or_recover(&self.snapshot).record_reason(code);
    }

    fn sync_snapshot(&self, snapshot: &mut MergeMonitorSnapshot) {
        let session = *lock_or_recover(&self.state);
        snapshot.dialog_open = session.dialog_open;
        snapshot.commit_message_changed_by_user = session.commit_message_changed_by_user;
        snapshot.last_strategy = self.last_strategy.map(|s| s.label().to_string());
    }
}
