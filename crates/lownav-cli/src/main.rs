//! lownav - low-level navigation plan annotator

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lownav_cli::commands::{run_config, run_convert, ConfigArgs, ConvertArgs};

/// Annotate flight plans with TOC/TOD, transit levels and low-level timing
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a plan and write `<name> [processed].<ext>` next to it
    Convert(ConvertArgs),
    /// Display the path to the configuration file
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Command::Convert(args) if args.verbose);
    let default_level = if verbose { "lownav=debug" } else { "lownav=info" };

    // Logs go to stderr so that --json output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    match &cli.command {
        Command::Convert(args) => {
            run_convert(args, &mut stdin.lock(), &mut stdout.lock())?;
        }
        Command::Config(args) => run_config(args, &mut stdout.lock())?,
    }

    Ok(())
}
