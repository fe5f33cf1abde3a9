//! Polling monitor for the merge dialog: observer state machine, edit
//! tracking, and commit-message injection.
//!
//! The host surface exposes no reliable change notifications, so the monitor
//! runs two periodic ticks — a fast state tick (dialog open/close, strategy
//! changes, edit-tracker attachment) and a slow structural tick (merge
//! trigger DOM replacement). Tick bodies are synchronous and every state
//! transition happens at a tick boundary; the Tokio scheduler in
//! [`scheduler`] just drives the ticks.

pub mod config;
pub mod monitor;
pub mod scheduler;
pub mod snapshot;
pub mod writer;

pub use config::MergeMonitorConfig;
pub use monitor::MergeDialogMonitor;
pub use scheduler::{start_merge_dialog_monitor, MergeMonitorHandle};
pub use snapshot::MergeMonitorSnapshot;
pub use writer::write_commit_message;
