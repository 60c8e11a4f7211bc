//! Config command - Write the default experiment configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::app::ExperimentConfig;

#[derive(Parser, Debug)]
#[command(about = "Write the default experiment configuration as JSON")]
pub struct ConfigArgs {
    /// Destination file; printed to stdout when omitted
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let config = ExperimentConfig::default();
    match &args.output {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Configuration written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
