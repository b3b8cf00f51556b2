use super::common::{Common, CommonArgs};
use chrono::Utc;
use clap::Parser;
use ohno::IntoAppError;
use pkg_pulse::Result;
use pkg_pulse::report::{PlotRef, SummaryRow, generate};
use pkg_pulse::store::{Store, Window};
use std::fs;
use strum::IntoEnumIterator;

#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn render_metrics(args: &RenderArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    render_report(&common).await
}

/// Regenerate the Markdown dashboard from the store.
///
/// Reads only; never fetches and never mutates the store.
pub async fn render_report(common: &Common) -> Result<()> {
    let store = Store::open(&common.config.data_file).await?;
    let today = Utc::now().date_naive();

    let rows: Vec<SummaryRow> = store
        .series()
        .into_iter()
        .filter_map(|series| {
            store.latest(&series.item, series.source, &series.metric).map(|reading| SummaryRow {
                item: reading.item,
                source: reading.source,
                metric: reading.metric,
                value: reading.value,
                date: reading.date,
            })
        })
        .collect();

    // Only reference plots the external plotting tool has actually produced.
    let plots: Vec<PlotRef> = Window::iter()
        .filter_map(|window| {
            let path = common.config.plots_dir.join(format!("trend_{}.png", window.label()));
            path.as_std_path().exists().then(|| PlotRef {
                window,
                path: path.to_string(),
            })
        })
        .collect();

    let mut output = String::new();
    generate(&rows, &plots, today, &mut output)?;

    fs::write(common.config.report_file.as_std_path(), output)
        .into_app_err_with(|| format!("unable to write report file '{}'", common.config.report_file))?;

    println!("Generated report: {}", common.config.report_file);
    Ok(())
}
