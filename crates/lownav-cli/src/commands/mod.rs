pub mod config;
pub mod convert;

pub use config::{run_config, ConfigArgs};
pub use convert::{run_convert, ConvertArgs};
