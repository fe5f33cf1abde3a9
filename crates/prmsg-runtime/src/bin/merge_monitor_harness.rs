//! Demo harness: drives the merge dialog monitor against an in-memory fake
//! page and prints the resulting snapshot. Useful for eyeballing the
//! transition flow and the composed message without a browser host.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use prmsg_page::{FakePage, MergeUiLocators, PageDocument};
use prmsg_runtime::snapshot::persist_monitor_snapshot;
use prmsg_runtime::{start_merge_dialog_monitor, MergeMonitorConfig};

#[derive(Debug, Clone)]
struct HarnessCli {
    summary_json_out: Option<PathBuf>,
    state_poll_ms: u64,
    simulate_user_edit: bool,
}

impl HarnessCli {
    fn parse() -> Result<Self> {
        let mut summary_json_out: Option<PathBuf> = None;
        let mut state_poll_ms: u64 = 20;
        let mut simulate_user_edit = false;

        let mut args = std::env::args().skip(1);
        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--summary-json-out" => {
                    summary_json_out = Some(PathBuf::from(require_arg_value(&mut args, &flag)?));
                }
                "--state-poll-ms" => {
                    let raw = require_arg_value(&mut args, &flag)?;
                    state_poll_ms = raw
                        .parse::<u64>()
                        .with_context(|| format!("{flag} expects a positive integer"))?;
                }
                "--simulate-user-edit" => simulate_user_edit = true,
                other => anyhow::bail!("unknown flag '{other}'"),
            }
        }

        Ok(Self {
            summary_json_out,
            state_poll_ms,
            simulate_user_edit,
        })
    }
}

fn require_arg_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("flag '{flag}' expects a value"))
}

fn print_usage() {
    println!("merge-monitor-harness");
    println!("  --summary-json-out <path>  write the final monitor snapshot as JSON");
    println!("  --state-poll-ms <ms>       fast tick cadence (default 20)");
    println!("  --simulate-user-edit       type into the field before a strategy change");
}

const DEFAULT_SQUASH_MESSAGE: &str = "Merged in feature/parser (pull request #42)\n\
                                      \n\
                                      * Improve parser\n\
                                      * fix bug\n\
                                      \n\
                                      Approved-by: Alice Example";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = HarnessCli::parse()?;
    let poll = Duration::from_millis(cli.state_poll_ms.max(1));
    let config = MergeMonitorConfig {
        state_poll_interval: poll,
        structural_poll_interval: poll * 10,
        dialog_wait_timeout: poll * 100,
        trigger_wait_timeout: poll * 100,
    };

    let page = Arc::new(FakePage::new());
    page.set_location(
        "https://bitbucket.example/projects/X/repos/parser/pull-requests/42/overview",
    );
    page.insert_element(&["header h1"], "Improve parser");
    page.insert_element(&["#pull-request-description-panel p"], "Adds recovery.");
    let strategy = page.insert_element(&["div"], "Squash");
    page.insert_child_element(strategy, &["#merge-strategy"], "");
    let trigger = page.insert_element(&["header button"], "Merge");

    let mut handle = start_merge_dialog_monitor(
        Arc::clone(&page) as Arc<dyn PageDocument>,
        MergeUiLocators::default(),
        config,
    )
    .await?;

    // The user clicks Merge; the dialog renders a beat later.
    page.click(trigger);
    tokio::time::sleep(poll * 2).await;
    page.insert_element(&["[role='dialog'] h1"], "Merge pull request");
    let field = page.insert_field(
        &["#merge-dialog-commit-message-textfield"],
        DEFAULT_SQUASH_MESSAGE,
    );
    tokio::time::sleep(poll * 3).await;

    if cli.simulate_user_edit {
        page.type_text(field, "\nhand-tuned detail");
    }
    page.set_text(strategy, "Merge commit");
    tokio::time::sleep(poll * 3).await;

    handle.shutdown().await;

    let snapshot = handle.snapshot();
    println!("--- final commit message field ---");
    println!("{}", page.field_value(field).unwrap_or_default());
    println!("--- monitor snapshot ---");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let Some(path) = cli.summary_json_out {
        persist_monitor_snapshot(&path, &snapshot)
            .context("unable to persist harness summary")?;
    }
    Ok(())
}
