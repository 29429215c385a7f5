//! lownav CLI - annotate Little Navmap plans for low-level sorties.
//!
//! Commands:
//! - convert: segment, time and label a plan, saving `<name> [processed].lnmpln`
//! - config: show or initialise the processor configuration

pub mod commands;
pub mod config;
pub mod prompt;
pub mod report;

pub use config::ProcessorConfig;
