//! Injected page capability for the merge-dialog enhancer.
//!
//! Abstracts the host document behind the [`PageDocument`] trait (element
//! resolution, text and field access, synthetic signal dispatch, synchronous
//! signal listeners), carries the merge-UI locator data with Bitbucket
//! production defaults, and implements the page-side fact extraction. The
//! in-memory [`FakePage`] backs tests and the demo harness.

pub mod document;
pub mod extract;
pub mod fake_page;
pub mod locators;

pub use document::{
    ElementId, ListenerId, PageDocument, SignalKeyInfo, SignalKind, SignalListener,
    SyntheticSignal,
};
pub use extract::{
    find_commit_message_field, find_merge_trigger, is_merge_dialog_showing, pull_request_number,
    read_merge_strategy, read_pull_request_facts,
};
pub use fake_page::{FakePage, PageOperation};
pub use locators::{MergeUiLocators, TextLocator};
