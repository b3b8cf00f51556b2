use super::common::{Common, CommonArgs};
use clap::Parser;
use pkg_pulse::Result;

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// The daily batch: fetch everything, then regenerate the report.
///
/// The store lock is released between the two steps; fetch failures do not
/// stop the render, but a store failure does.
pub async fn run_batch(args: &RunArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let _ = super::fetch::fetch_and_store(&common).await?;
    super::render::render_report(&common).await
}
