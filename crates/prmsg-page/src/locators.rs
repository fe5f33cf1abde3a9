use serde::{Deserialize, Serialize};

/// Descriptor plus an optional exact trimmed-text requirement.
///
/// The trigger and dialog-indicator locators both match on text because the
/// host page reuses generic markup for those nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLocator {
    pub selector: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl TextLocator {
    pub fn new(selector: &str, text: Option<&str>) -> Self {
        Self {
            selector: selector.to_string(),
            text: text.map(str::to_string),
        }
    }
}

/// Selector data for the merge UI, injected at startup.
///
/// Defaults are the Bitbucket production values, covering both the legacy and
/// the current PR interface where they diverge (strategy selector, message
/// field id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeUiLocators {
    pub merge_trigger: TextLocator,
    pub dialog_indicators: Vec<TextLocator>,
    pub title_heading: String,
    pub description_paragraph: String,
    pub strategy_legacy: String,
    pub strategy_current_input: String,
    pub message_field_ids: Vec<String>,
}

impl Default for MergeUiLocators {
    fn default() -> Self {
        Self {
            merge_trigger: TextLocator::new("header button", Some("Merge")),
            dialog_indicators: vec![
                TextLocator::new("#bb-fulfill-pullrequest-dialog h2", Some("Merge pull request")),
                TextLocator::new("[role='dialog'] header h4", Some("Merge pull request")),
                TextLocator::new("[role='dialog'] h1", Some("Merge pull request")),
            ],
            title_heading: "header h1".to_string(),
            description_paragraph: "#pull-request-description-panel p".to_string(),
            strategy_legacy: "#id_merge_strategy_group .select2-chosen".to_string(),
            strategy_current_input: "#merge-strategy".to_string(),
            message_field_ids: vec![
                "#id_commit_message".to_string(),
                "#merge-dialog-commit-message-textfield".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_legacy_and_current_message_fields() {
        let locators = MergeUiLocators::default();
        assert_eq!(locators.message_field_ids.len(), 2);
        assert_eq!(locators.dialog_indicators.len(), 3);
        assert_eq!(locators.merge_trigger.text.as_deref(), Some("Merge"));
    }

    #[test]
    fn locators_deserialize_with_partial_overrides() {
        let overridden: MergeUiLocators =
            serde_json::from_str(r#"{"title_heading": "main h1"}"#).expect("parse");
        assert_eq!(overridden.title_heading, "main h1");
        assert_eq!(
            overridden.strategy_current_input,
            MergeUiLocators::default().strategy_current_input
        );
    }
}
