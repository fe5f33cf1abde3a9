//! Foundational types shared across prmsg crates.
//!
//! Provides the per-dialog session state, merge strategy labels, extracted
//! pull-request facts, and the error taxonomy used by page extraction and the
//! monitor runtime.

pub mod error;
pub mod facts;
pub mod session;
pub mod strategy;

pub use error::EnhancerError;
pub use facts::PullRequestFacts;
pub use session::{
    lock_or_recover, shared_session_state, SessionState, SharedSessionState,
    SuppressChangeTrackingGuard,
};
pub use strategy::MergeStrategy;
