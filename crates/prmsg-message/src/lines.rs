use std::sync::OnceLock;

use regex::Regex;

/// Marker prefixing one constituent commit message in the default text.
pub const INDIVIDUAL_COMMIT_MARKER: &str = "* ";
/// Marker prefixing one approval annotation in the default text.
pub const APPROVAL_MARKER: &str = "Approved-by: ";

fn line_break_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\r\n]+").expect("line break pattern is valid"))
}

/// Split the host's default commit message into trimmed lines.
///
/// Runs of `\r` / `\n` collapse to a single break, so blank lines between
/// sections disappear before marker filtering.
pub fn default_message_lines(raw: &str) -> Vec<String> {
    line_break_runs()
        .replace_all(raw, "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

/// Lines carrying constituent commit messages, joined with `\n`.
///
/// A squash default message lists the PR title itself as a bullet; passing it
/// as `exclude_title` drops that duplicate. Empty output means the section is
/// omitted entirely.
pub fn individual_commit_lines(lines: &[String], exclude_title: Option<&str>) -> String {
    lines
        .iter()
        .filter(|line| line.starts_with(INDIVIDUAL_COMMIT_MARKER))
        .filter(|line| match exclude_title {
            Some(title) => line[INDIVIDUAL_COMMIT_MARKER.len()..].trim() != title,
            None => true,
        })
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Approval annotation lines, joined with `\n`.
pub fn approval_lines(lines: &[String]) -> String {
    lines
        .iter()
        .filter(|line| line.starts_with(APPROVAL_MARKER))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
