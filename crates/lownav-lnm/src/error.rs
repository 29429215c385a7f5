use std::path::PathBuf;

use lownav_core::PlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LnmError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("generated plan is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("waypoint {waypoint}: missing <{field}>")]
    MissingField {
        waypoint: usize,
        field: &'static str,
    },

    #[error("waypoint {waypoint}: invalid value '{value}' for {field}")]
    InvalidField {
        waypoint: usize,
        field: &'static str,
        value: String,
    },

    #[error("flight plan has no <Waypoints>")]
    NoWaypoints,

    #[error(transparent)]
    Route(#[from] PlanError),
}

impl From<quick_xml::events::attributes::AttrError> for LnmError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(e.into())
    }
}

pub type Result<T> = std::result::Result<T, LnmError>;
