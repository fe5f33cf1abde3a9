use std::sync::{Arc, Mutex, MutexGuard};

/// Per-dialog session flags shared between the monitor ticks and the signal
/// listeners attached to the host page.
///
/// One instance is owned per monitored session; all fields return to `false`
/// on every dialog open via [`SessionState::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub dialog_open: bool,
    pub commit_message_changed_by_user: bool,
    pub suppress_change_tracking: bool,
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Session state handle shared with page signal listeners.
pub type SharedSessionState = Arc<Mutex<SessionState>>;

pub fn shared_session_state() -> SharedSessionState {
    Arc::new(Mutex::new(SessionState::default()))
}

pub fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// RAII guard that raises `suppress_change_tracking` for its lifetime.
///
/// The writer dispatches synthetic input/change signals under this guard so
/// the edit tracker does not misattribute them as user edits. The flag is
/// restored in `Drop`, so it clears even if a dispatch panics.
pub struct SuppressChangeTrackingGuard {
    state: SharedSessionState,
}

impl SuppressChangeTrackingGuard {
    pub fn new(state: &SharedSessionState) -> Self {
        lock_or_recover(state).suppress_change_tracking = true;
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for SuppressChangeTrackingGuard {
    fn drop(&mut self) {
        lock_or_recover(&self.state).suppress_change_tracking = false;
    }
}
