use std::sync::OnceLock;

use regex::Regex;

use prmsg_core::{EnhancerError, MergeStrategy, PullRequestFacts};

use crate::document::{ElementId, PageDocument};
use crate::locators::{MergeUiLocators, TextLocator};

fn pull_request_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/pull-requests/([0-9]+)").expect("pull request number pattern is valid")
    })
}

/// Parse the pull request number out of the page location.
pub fn pull_request_number(location: &str) -> Result<u64, EnhancerError> {
    let captures = pull_request_number_pattern()
        .captures(location)
        .ok_or_else(|| EnhancerError::not_found("pull request number in page location"))?;
    captures[1]
        .parse::<u64>()
        .map_err(|_| EnhancerError::not_found("pull request number in page location"))
}

/// Trimmed text of the PR title heading.
pub fn pull_request_title(
    page: &dyn PageDocument,
    locators: &MergeUiLocators,
) -> Result<String, EnhancerError> {
    let heading = page
        .resolve_first(&locators.title_heading)
        .ok_or_else(|| EnhancerError::not_found("pull request title heading"))?;
    let text = page
        .text_content(heading)
        .ok_or_else(|| EnhancerError::not_found("pull request title heading"))?;
    Ok(text.trim().to_string())
}

/// Trimmed text of the optional description paragraph; absence is not an error.
pub fn pull_request_description(
    page: &dyn PageDocument,
    locators: &MergeUiLocators,
) -> Option<String> {
    let paragraph = page.resolve_first(&locators.description_paragraph)?;
    let text = page.text_content(paragraph)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read number, title, and description from the live page. Uncached: callers
/// re-extract for every composition.
pub fn read_pull_request_facts(
    page: &dyn PageDocument,
    locators: &MergeUiLocators,
) -> Result<PullRequestFacts, EnhancerError> {
    Ok(PullRequestFacts {
        number: pull_request_number(&page.location())?,
        title: pull_request_title(page, locators)?,
        description: pull_request_description(page, locators),
    })
}

/// Currently selected merge strategy: legacy interface first, then the
/// current one (strategy input's parent carries the visible label). `None`
/// when neither resolves.
pub fn read_merge_strategy(
    page: &dyn PageDocument,
    locators: &MergeUiLocators,
) -> Option<MergeStrategy> {
    if let Some(chosen) = page.resolve_first(&locators.strategy_legacy) {
        if let Some(text) = page.text_content(chosen) {
            if let Some(strategy) = MergeStrategy::from_label(&text) {
                return Some(strategy);
            }
        }
    }
    let input = page.resolve_first(&locators.strategy_current_input)?;
    let parent = page.parent(input)?;
    let text = page.text_content(parent)?;
    MergeStrategy::from_label(&text)
}

/// First element matching the locator's selector whose trimmed text equals
/// the expected label (any match when no label is required).
pub fn resolve_text_locator(page: &dyn PageDocument, locator: &TextLocator) -> Option<ElementId> {
    page.resolve_all(&locator.selector)
        .into_iter()
        .find(|candidate| match &locator.text {
            Some(expected) => page
                .text_content(*candidate)
                .is_some_and(|text| text.trim() == expected),
            None => true,
        })
}

/// The merge trigger element, when present.
pub fn find_merge_trigger(
    page: &dyn PageDocument,
    locators: &MergeUiLocators,
) -> Option<ElementId> {
    resolve_text_locator(page, &locators.merge_trigger)
}

/// Whether the merge dialog's presence indicator is currently visible.
pub fn is_merge_dialog_showing(page: &dyn PageDocument, locators: &MergeUiLocators) -> bool {
    locators
        .dialog_indicators
        .iter()
        .any(|indicator| resolve_text_locator(page, indicator).is_some())
}

/// The commit message field, trying the legacy id before the current one.
pub fn find_commit_message_field(
    page: &dyn PageDocument,
    locators: &MergeUiLocators,
) -> Option<ElementId> {
    locators
        .message_field_ids
        .iter()
        .find_map(|selector| page.resolve_first(selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_page::FakePage;

    fn locators() -> MergeUiLocators {
        MergeUiLocators::default()
    }

    #[test]
    fn pull_request_number_parses_path_segment() {
        let location = "https://bitbucket.example/projects/X/repos/y/pull-requests/417/overview";
        assert_eq!(pull_request_number(location), Ok(417));
    }

    #[test]
    fn pull_request_number_fails_without_segment() {
        assert_eq!(
            pull_request_number("https://bitbucket.example/projects/X/repos/y/browse"),
            Err(EnhancerError::not_found(
                "pull request number in page location"
            ))
        );
    }

    #[test]
    fn title_is_trimmed_and_missing_title_is_an_error() {
        let page = FakePage::new();
        assert!(pull_request_title(&page, &locators()).is_err());

        page.insert_element(&["header h1"], "  Improve parser recovery  ");
        assert_eq!(
            pull_request_title(&page, &locators()).expect("title"),
            "Improve parser recovery"
        );
    }

    #[test]
    fn missing_description_is_none_not_an_error() {
        let page = FakePage::new();
        assert_eq!(pull_request_description(&page, &locators()), None);

        page.insert_element(&["#pull-request-description-panel p"], "  Adds recovery. ");
        assert_eq!(
            pull_request_description(&page, &locators()).as_deref(),
            Some("Adds recovery.")
        );
    }

    #[test]
    fn strategy_prefers_legacy_interface_then_falls_back() {
        let page = FakePage::new();
        assert_eq!(read_merge_strategy(&page, &locators()), None);

        let wrapper = page.insert_element(&["div"], " Squash ");
        page.insert_child_element(wrapper, &["#merge-strategy"], "");
        assert_eq!(
            read_merge_strategy(&page, &locators()),
            Some(MergeStrategy::Squash)
        );

        page.insert_element(
            &["#id_merge_strategy_group .select2-chosen"],
            "Merge commit",
        );
        assert_eq!(
            read_merge_strategy(&page, &locators()),
            Some(MergeStrategy::MergeCommit)
        );
    }

    #[test]
    fn unrecognized_strategy_label_reads_as_none() {
        let page = FakePage::new();
        page.insert_element(&["#id_merge_strategy_group .select2-chosen"], "Rebase");
        assert_eq!(read_merge_strategy(&page, &locators()), None);
    }

    #[test]
    fn merge_trigger_matches_on_trimmed_text() {
        let page = FakePage::new();
        page.insert_element(&["header button"], "Cancel");
        let trigger = page.insert_element(&["header button"], "  Merge ");
        assert_eq!(find_merge_trigger(&page, &locators()), Some(trigger));
    }

    #[test]
    fn dialog_showing_accepts_any_indicator_variant() {
        let page = FakePage::new();
        assert!(!is_merge_dialog_showing(&page, &locators()));

        page.insert_element(&["[role='dialog'] h1"], "Merge pull request");
        assert!(is_merge_dialog_showing(&page, &locators()));
    }

    #[test]
    fn dialog_indicator_requires_exact_heading_text() {
        let page = FakePage::new();
        page.insert_element(&["[role='dialog'] h1"], "Decline pull request");
        assert!(!is_merge_dialog_showing(&page, &locators()));
    }

    #[test]
    fn message_field_tries_legacy_id_first() {
        let page = FakePage::new();
        let current = page.insert_field(&["#merge-dialog-commit-message-textfield"], "");
        assert_eq!(find_commit_message_field(&page, &locators()), Some(current));

        let legacy = page.insert_field(&["#id_commit_message"], "");
        assert_eq!(find_commit_message_field(&page, &locators()), Some(legacy));
    }
}
