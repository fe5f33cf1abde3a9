//! Pure string layer: default-message parsing and commit message composition.
//!
//! Everything here is deterministic over its inputs; page access stays in
//! `prmsg-page` and scheduling in `prmsg-runtime`.

pub mod compose;
pub mod lines;

pub use compose::compose_commit_message;
pub use lines::{approval_lines, default_message_lines, individual_commit_lines};
