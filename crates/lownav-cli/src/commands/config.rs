//! The `config` command: show or initialise the configuration file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::ProcessorConfig;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Write the default configuration, replacing any existing file
    #[arg(long)]
    pub init: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Display the path to the configuration file, and its contents when present.
pub fn run_config<W: Write>(args: &ConfigArgs, output: &mut W) -> Result<()> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => ProcessorConfig::default_file()?,
    };
    writeln!(output, "Configuration file: {}", path.display())?;

    if args.init {
        ProcessorConfig::default().save(&path)?;
        writeln!(output, "Configuration saved to {}", path.display())?;
    } else if path.exists() {
        let config = ProcessorConfig::load(&path)?;
        writeln!(output)?;
        write!(output, "{}", toml::to_string_pretty(&config)?)?;
    }
    Ok(())
}
