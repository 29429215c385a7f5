//! Little Navmap (`.lnmpln`) flight plan reading and writing.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::LnmError;
pub use reader::{parse_plan, read_plan, LnmPlan, LnmWaypoint};
pub use writer::{output_path, render_plan, waypoint_comment, write_plan, ORIGIN_COMMENT};
