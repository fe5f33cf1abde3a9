use prmsg_core::{MergeStrategy, PullRequestFacts};

use crate::lines::{approval_lines, default_message_lines, individual_commit_lines};

/// Build the replacement commit message for the selected strategy.
///
/// Deterministic: identical `(strategy, default_message, facts)` always
/// yields byte-identical output. An unresolved strategy (`None`) composes via
/// the merge-commit branch. Fast-forward merges disregard the message in the
/// host UI, so nothing is synthesized for them.
pub fn compose_commit_message(
    strategy: Option<MergeStrategy>,
    default_message: &str,
    facts: &PullRequestFacts,
) -> String {
    match strategy {
        Some(MergeStrategy::FastForward) => String::new(),
        Some(MergeStrategy::Squash) => compose_squash(default_message, facts),
        Some(MergeStrategy::MergeCommit) | None => compose_merge_commit(default_message, facts),
    }
}

fn compose_squash(default_message: &str, facts: &PullRequestFacts) -> String {
    let mut message = format!("{} (PR #{})", facts.title, facts.number);
    append_section(&mut message, facts.description.as_deref().unwrap_or(""));

    let lines = default_message_lines(default_message);
    append_section(
        &mut message,
        &individual_commit_lines(&lines, Some(facts.title.as_str())),
    );
    append_section(&mut message, &approval_lines(&lines));
    message
}

fn compose_merge_commit(default_message: &str, facts: &PullRequestFacts) -> String {
    let mut message = format!("Merge: {} (PR #{})", facts.title, facts.number);
    append_section(&mut message, facts.description.as_deref().unwrap_or(""));

    let lines = default_message_lines(default_message);
    append_section(&mut message, &approval_lines(&lines));
    message
}

fn append_section(message: &mut String, section: &str) {
    if !section.is_empty() {
        message.push_str("\n\n");
        message.push_str(section);
    }
}
