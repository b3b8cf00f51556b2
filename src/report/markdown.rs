use crate::Result;
use crate::fetch::Source;
use crate::store::Window;
use chrono::NaiveDate;
use core::fmt::Write;
use ohno::bail;
use std::borrow::Cow;

/// One line of the report's summary table: the latest reading of one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub item: String,
    pub source: Source,
    pub metric: String,
    pub value: u64,
    pub date: NaiveDate,
}

/// A pre-rendered trend image to reference from the report.
///
/// `path` is relative to the report file; the plots themselves are produced
/// by an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotRef {
    pub window: Window,
    pub path: String,
}

/// Render the dashboard document.
///
/// Output is a pure function of the inputs: the summary table is sorted by
/// item name then metric name, and trend sections appear in the order given.
/// Rendering never touches the store or the network.
pub fn generate<W: Write>(rows: &[SummaryRow], plots: &[PlotRef], today: NaiveDate, writer: &mut W) -> Result<()> {
    let mut rows: Vec<&SummaryRow> = rows.iter().collect();
    for row in &rows {
        if row.item.is_empty() || row.metric.is_empty() {
            bail!("malformed summary row: empty item or metric name");
        }
    }
    rows.sort_by(|a, b| (&a.item, &a.metric, a.source).cmp(&(&b.item, &b.metric, b.source)));

    writeln!(writer, "# Package & Repository Metrics")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Automated daily tracking of package downloads and repository traction across PyPI, npm, GitHub, and Discord."
    )?;
    writeln!(writer)?;
    writeln!(writer, "**Last updated:** {}", today.format("%Y-%m-%d"))?;
    writeln!(writer)?;

    writeln!(writer, "## Tracked Metrics")?;
    writeln!(writer)?;
    writeln!(writer, "| Item | Source | Metric | Value | Date |")?;
    writeln!(writer, "|------|--------|--------|-------|------|")?;
    for row in &rows {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} |",
            escape_cell(&row.item),
            row.source,
            escape_cell(&row.metric),
            format_count(row.value),
            row.date.format("%Y-%m-%d"),
        )?;
    }
    writeln!(writer)?;

    if !plots.is_empty() {
        writeln!(writer, "## Trends")?;
        for plot in plots {
            writeln!(writer)?;
            writeln!(writer, "### {}", plot.window.title())?;
            writeln!(writer)?;
            writeln!(writer, "![Trends — {}]({})", plot.window.title(), plot.path)?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "---")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "*Regenerated daily by an external scheduler. Edit the configuration file to add or remove tracked items.*"
    )?;

    Ok(())
}

/// Escape a value for use inside a Markdown table cell.
fn escape_cell(s: &str) -> Cow<'_, str> {
    if s.contains('|') {
        Cow::Owned(s.replace('|', "\\|"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Format an integer with comma thousands separators.
fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}
