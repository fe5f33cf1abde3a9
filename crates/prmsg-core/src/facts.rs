/// Facts about the pull request extracted from the live page.
///
/// Never cached across dialog sessions; re-read at every composition so the
/// message reflects the current page state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestFacts {
    pub number: u64,
    pub title: String,
    pub description: Option<String>,
}
