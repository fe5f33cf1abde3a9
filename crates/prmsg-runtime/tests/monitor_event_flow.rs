//! End-to-end transition coverage for the merge dialog monitor, driven
//! tick-by-tick against a fake page for determinism.

use std::sync::Arc;
use std::time::Duration;

use prmsg_page::{ElementId, FakePage, MergeUiLocators, PageDocument, PageOperation};
use prmsg_runtime::snapshot::{
    REASON_DIALOG_CLOSED, REASON_DIALOG_WAIT_TIMEOUT, REASON_TRIGGER_REBOUND,
    REASON_WRITE_SKIPPED_USER_EDIT,
};
use prmsg_runtime::{start_merge_dialog_monitor, MergeDialogMonitor, MergeMonitorConfig};

const DEFAULT_SQUASH_MESSAGE: &str = "Merged in feature/parser (pull request #42)\n\
                                      \n\
                                      * Improve parser\n\
                                      * fix bug\n\
                                      \n\
                                      Approved-by: Alice Example";

struct PageFixture {
    page: Arc<FakePage>,
    trigger: ElementId,
    strategy_wrapper: ElementId,
}

/// A PR page as the monitor first sees it: trigger and strategy present, no
/// dialog yet.
fn pull_request_page(strategy_label: &str) -> PageFixture {
    let page = Arc::new(FakePage::new());
    page.set_location("https://bitbucket.example/projects/X/repos/parser/pull-requests/42/overview");
    page.insert_element(&["header h1"], " Improve parser ");
    page.insert_element(&["#pull-request-description-panel p"], "Adds recovery.");
    let strategy_wrapper = page.insert_element(&["div"], strategy_label);
    page.insert_child_element(strategy_wrapper, &["#merge-strategy"], "");
    let trigger = page.insert_element(&["header button"], "Merge");
    PageFixture {
        page,
        trigger,
        strategy_wrapper,
    }
}

fn open_dialog(page: &FakePage, default_message: &str) -> (ElementId, ElementId) {
    let dialog = page.insert_element(&["[role='dialog'] h1"], "Merge pull request");
    let field = page.insert_field(&["#merge-dialog-commit-message-textfield"], default_message);
    (dialog, field)
}

fn monitor_for(fixture: &PageFixture, config: MergeMonitorConfig) -> MergeDialogMonitor {
    let mut monitor = MergeDialogMonitor::new(
        Arc::clone(&fixture.page) as Arc<dyn PageDocument>,
        MergeUiLocators::default(),
        config,
    );
    monitor.bind_trigger().expect("trigger binds");
    monitor
}

#[test]
fn dialog_open_writes_composed_message_and_user_edit_blocks_overwrites() {
    let fixture = pull_request_page("Squash");
    let mut monitor = monitor_for(&fixture, MergeMonitorConfig::default());

    fixture.page.click(fixture.trigger);
    monitor.tick_state();
    assert!(!monitor.session_state().dialog_open, "dialog not up yet");

    let (_dialog, field) = open_dialog(&fixture.page, DEFAULT_SQUASH_MESSAGE);
    monitor.tick_state();

    assert!(monitor.session_state().dialog_open);
    assert_eq!(
        fixture.page.field_value(field).as_deref(),
        Some(
            "Improve parser (PR #42)\n\
             \n\
             Adds recovery.\n\
             \n\
             * fix bug\n\
             \n\
             Approved-by: Alice Example"
        )
    );
    assert_eq!(monitor.snapshot().messages_written, 1);
    assert!(
        !monitor.session_state().commit_message_changed_by_user,
        "synthetic write signals must not count as a user edit"
    );

    fixture.page.type_text(field, "\nhand-tuned detail");
    assert!(monitor.session_state().commit_message_changed_by_user);

    fixture.page.set_text(fixture.strategy_wrapper, "Merge commit");
    monitor.tick_state();

    let value = fixture.page.field_value(field).expect("field still there");
    assert!(
        value.ends_with("hand-tuned detail"),
        "user-edited message must survive a strategy change"
    );
    assert_eq!(monitor.snapshot().messages_written, 1);
    assert!(monitor
        .snapshot()
        .reason_codes
        .iter()
        .any(|code| code == REASON_WRITE_SKIPPED_USER_EDIT));
}

#[test]
fn write_contract_focuses_before_assigning() {
    let fixture = pull_request_page("Squash");
    let mut monitor = monitor_for(&fixture, MergeMonitorConfig::default());

    fixture.page.click(fixture.trigger);
    let (_dialog, field) = open_dialog(&fixture.page, DEFAULT_SQUASH_MESSAGE);
    monitor.tick_state();

    let operations = fixture.page.operations();
    let focus_at = operations
        .iter()
        .position(|op| *op == PageOperation::Focus(field))
        .expect("focus recorded");
    let assign_at = operations
        .iter()
        .position(|op| matches!(op, PageOperation::SetValue(id, _) if *id == field))
        .expect("assignment recorded");
    assert!(focus_at < assign_at);
    assert_eq!(fixture.page.selection_of(field), Some((0, 0)));
}

#[test]
fn dialog_never_appearing_times_out_and_leaves_the_field_alone() {
    let fixture = pull_request_page("Squash");
    let config = MergeMonitorConfig {
        dialog_wait_timeout: Duration::from_millis(250),
        ..MergeMonitorConfig::default()
    };
    let mut monitor = monitor_for(&fixture, config);

    fixture.page.click(fixture.trigger);
    for _ in 0..6 {
        monitor.tick_state();
    }

    assert!(!monitor.session_state().dialog_open);
    assert!(monitor
        .snapshot()
        .reason_codes
        .iter()
        .any(|code| code == REASON_DIALOG_WAIT_TIMEOUT));
    assert!(
        !fixture
            .page
            .operations()
            .iter()
            .any(|op| matches!(op, PageOperation::SetValue(_, _) | PageOperation::Focus(_))),
        "no write may happen when the dialog never appeared"
    );
}

#[test]
fn replaced_trigger_is_rebound_and_still_opens_the_dialog() {
    let fixture = pull_request_page("Squash");
    let mut monitor = monitor_for(&fixture, MergeMonitorConfig::default());

    fixture.page.remove_element(fixture.trigger);
    let replacement = fixture.page.insert_element(&["header button"], "Merge");
    monitor.tick_structural();
    assert_eq!(monitor.snapshot().trigger_rebinds, 1);
    assert!(monitor
        .snapshot()
        .reason_codes
        .iter()
        .any(|code| code == REASON_TRIGGER_REBOUND));

    fixture.page.click(replacement);
    let (_dialog, field) = open_dialog(&fixture.page, DEFAULT_SQUASH_MESSAGE);
    monitor.tick_state();
    assert!(monitor.session_state().dialog_open);
    assert!(fixture
        .page
        .field_value(field)
        .is_some_and(|value| value.starts_with("Improve parser (PR #42)")));
}

#[test]
fn close_detaches_tracking_and_reopen_starts_a_fresh_session() {
    let fixture = pull_request_page("Squash");
    let mut monitor = monitor_for(&fixture, MergeMonitorConfig::default());

    fixture.page.click(fixture.trigger);
    let (dialog, field) = open_dialog(&fixture.page, DEFAULT_SQUASH_MESSAGE);
    monitor.tick_state();
    assert!(monitor.session_state().dialog_open);

    fixture.page.remove_element(dialog);
    monitor.tick_state();
    assert!(!monitor.session_state().dialog_open);
    assert!(monitor
        .snapshot()
        .reason_codes
        .iter()
        .any(|code| code == REASON_DIALOG_CLOSED));

    // Tracker is detached: typing after close is not a session edit.
    fixture.page.type_text(field, "stale input");
    assert!(!monitor.session_state().commit_message_changed_by_user);

    fixture.page.click(fixture.trigger);
    fixture
        .page
        .insert_element(&["[role='dialog'] h1"], "Merge pull request");
    monitor.tick_state();
    assert!(monitor.session_state().dialog_open);
    assert!(!monitor.session_state().commit_message_changed_by_user);
    assert_eq!(monitor.snapshot().messages_written, 2);
}

#[test]
fn strategy_resolving_after_open_counts_as_the_first_change() {
    // No strategy markup at all: the open-time read is unresolved and the
    // message composes via the merge-commit branch.
    let page = Arc::new(FakePage::new());
    page.set_location("https://bitbucket.example/projects/X/repos/parser/pull-requests/42/overview");
    page.insert_element(&["header h1"], "Improve parser");
    let trigger = page.insert_element(&["header button"], "Merge");

    let mut monitor = MergeDialogMonitor::new(
        Arc::clone(&page) as Arc<dyn PageDocument>,
        MergeUiLocators::default(),
        MergeMonitorConfig::default(),
    );
    monitor.bind_trigger().expect("trigger binds");

    page.click(trigger);
    page.insert_element(&["[role='dialog'] h1"], "Merge pull request");
    let field = page.insert_field(&["#merge-dialog-commit-message-textfield"], "* fix bug");
    monitor.tick_state();
    assert!(page
        .field_value(field)
        .is_some_and(|value| value.starts_with("Merge: Improve parser (PR #42)")));

    // Strategy becomes readable mid-session: first resolved read fires.
    page.insert_element(&["#id_merge_strategy_group .select2-chosen"], "Squash");
    monitor.tick_state();
    assert!(page
        .field_value(field)
        .is_some_and(|value| value.starts_with("Improve parser (PR #42)")));
    assert_eq!(monitor.snapshot().last_strategy.as_deref(), Some("Squash"));
}

#[tokio::test(start_paused = true)]
async fn scheduler_drives_the_monitor_on_its_intervals() {
    let fixture = pull_request_page("Squash");
    let page = Arc::clone(&fixture.page) as Arc<dyn PageDocument>;

    let mut handle = start_merge_dialog_monitor(
        page,
        MergeUiLocators::default(),
        MergeMonitorConfig::default(),
    )
    .await
    .expect("monitor starts");

    fixture.page.click(fixture.trigger);
    open_dialog(&fixture.page, DEFAULT_SQUASH_MESSAGE);
    tokio::time::sleep(Duration::from_millis(350)).await;

    assert!(handle.session_state().dialog_open);
    assert!(handle.snapshot().messages_written >= 1);
    assert!(handle.is_running());

    handle.shutdown().await;
    assert!(!handle.is_running());
}

#[tokio::test(start_paused = true)]
async fn startup_fails_observably_when_the_trigger_never_renders() {
    let page = Arc::new(FakePage::new());
    page.set_location("https://bitbucket.example/projects/X/repos/parser/pull-requests/42/overview");

    let config = MergeMonitorConfig {
        trigger_wait_timeout: Duration::from_millis(300),
        ..MergeMonitorConfig::default()
    };
    let started = start_merge_dialog_monitor(
        Arc::clone(&page) as Arc<dyn PageDocument>,
        MergeUiLocators::default(),
        config,
    )
    .await;
    let error = started.err().expect("startup must time out");
    assert!(error.to_string().contains("merge dialog monitor"));
}
