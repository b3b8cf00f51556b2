use camino::Utf8PathBuf;
use clap::Parser;
use pkg_pulse::Result;
use pkg_pulse::config::Config;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file [default: one of pulse.[yml|yaml|toml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config(args: &ValidateArgs) -> Result<()> {
    let (config, warnings) = Config::load(args.config.as_deref())?;

    if warnings.is_empty() {
        println!("Configuration is valid: {} tracked item(s)", config.items.len());
    } else {
        println!("Configuration is usable, with warnings:");
        for warning in &warnings {
            println!("  ⚠️  {warning}");
        }
    }

    Ok(())
}
