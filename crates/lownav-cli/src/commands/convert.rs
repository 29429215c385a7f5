//! The `convert` command: annotate a plan and save it next to the input.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lownav_core::{annotate_route, BoundarySet};
use lownav_lnm::{output_path, read_plan, write_plan};

use crate::config::ProcessorConfig;
use crate::prompt::{parse_low_level_pair, prompt_low_level_pair};
use crate::report::{processed_report, waypoint_table};

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// The filepath of the plan to convert
    pub file: PathBuf,

    /// Transit airspeed in knots
    #[arg(long)]
    pub transit_airspeed_kts: Option<f64>,

    /// Low level airspeed in knots
    #[arg(long)]
    pub route_airspeed_kts: Option<f64>,

    /// Low-level segment as 1-based waypoint numbers, may be repeated
    #[arg(long = "low-level", value_name = "ENTRY:EXIT", value_parser = parse_low_level_pair)]
    pub low_level: Vec<(usize, usize)>,

    /// Configuration file (default: platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the processed waypoints
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the annotated waypoints as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the conversion, prompting on `input` when no segment was given.
///
/// Returns the path of the written plan. Nothing is written when any
/// stage fails.
pub fn run_convert<R: BufRead, W: Write>(
    args: &ConvertArgs,
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => ProcessorConfig::default_file()?,
    };
    let config = ProcessorConfig::load_or_create(&config_path)?
        .with_overrides(args.transit_airspeed_kts, args.route_airspeed_kts);
    let profile = config.profile()?;

    if !args.json {
        writeln!(output, "\nConverting {}", args.file.display())?;
    }
    let plan = read_plan(&args.file).context("Error reading file")?;

    let pairs = if args.low_level.is_empty() {
        writeln!(output, "\nWaypoints in the plan:")?;
        write!(output, "{}", waypoint_table(plan.waypoints()))?;
        writeln!(output)?;
        vec![prompt_low_level_pair(input, output, plan.waypoints().len())?]
    } else {
        args.low_level.clone()
    };
    let boundaries = BoundarySet::from_one_based(&pairs)?;

    let annotated = annotate_route(plan.route(), &profile, &boundaries, &config.label_options())
        .with_context(|| format!("cannot process {}", args.file.display()))?;

    let out = output_path(&args.file);
    write_plan(&plan, &annotated, &out).context("Error writing file")?;

    if args.json {
        writeln!(output, "{}", serde_json::to_string_pretty(&annotated)?)?;
    } else {
        if args.verbose {
            writeln!(output)?;
            write!(output, "{}", processed_report(&annotated))?;
        }
        writeln!(output, "File written to {}", out.display())?;
    }
    Ok(out)
}
