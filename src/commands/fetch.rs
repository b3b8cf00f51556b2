use super::common::{Common, CommonArgs};
use chrono::Utc;
use clap::Parser;
use owo_colors::OwoColorize;
use pkg_pulse::Result;
use pkg_pulse::fetch::{FetchOutcome, ItemOutcome};
use pkg_pulse::store::{AppendResult, Store};

const LOG_TARGET: &str = "     fetch";

#[derive(Parser, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Tally of what one fetch run changed in the store.
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub inserted: u64,
    pub updated: u64,
    pub unchanged: u64,
    /// (display name, reason) for each item whose fetch produced nothing.
    pub failed: Vec<(String, String)>,
}

pub async fn fetch_metrics(args: &FetchArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let _ = fetch_and_store(&common).await?;
    Ok(())
}

/// Fetch all tracked items and record their readings.
///
/// Per-item failures are non-fatal: they are logged, reported in the summary,
/// and the rest of the run proceeds. Store failures abort the run.
pub async fn fetch_and_store(common: &Common) -> Result<FetchSummary> {
    let today = Utc::now().date_naive();
    let outcomes = common.collector.collect(common.config.items.clone(), today).await;

    // All writes happen here, after collection, on one thread.
    let mut store = Store::open(&common.config.data_file).await?;

    let mut summary = FetchSummary::default();
    for ItemOutcome { item, outcome } in outcomes {
        match outcome {
            FetchOutcome::Found(readings) => {
                for reading in &readings {
                    match store.append(reading) {
                        AppendResult::Inserted => summary.inserted += 1,
                        AppendResult::Updated => summary.updated += 1,
                        AppendResult::Unchanged => summary.unchanged += 1,
                    }
                }
            }
            FetchOutcome::NotFound => {
                log::warn!(target: LOG_TARGET, "'{}' not found on {}", item.name, item.source);
                summary.failed.push((item.display_name().to_string(), format!("not found on {}", item.source)));
            }
            FetchOutcome::Error(e) => {
                log::warn!(target: LOG_TARGET, "Fetch failed for '{}': {e:#}", item.name);
                summary.failed.push((item.display_name().to_string(), format!("{e:#}")));
            }
        }
    }

    store.commit()?;

    print_summary(&summary, common.use_colors);
    Ok(summary)
}

fn print_summary(summary: &FetchSummary, use_colors: bool) {
    let counts = format!(
        "{} new readings, {} updated, {} unchanged",
        summary.inserted, summary.updated, summary.unchanged
    );

    if use_colors {
        println!("{} {counts}", "Recorded:".green());
        for (name, reason) in &summary.failed {
            println!("{} {name}: {reason}", "Failed:".red());
        }
    } else {
        println!("Recorded: {counts}");
        for (name, reason) in &summary.failed {
            println!("Failed: {name}: {reason}");
        }
    }
}
