//! Core data models for routes and annotated routes.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::spatial::{haversine_distance_nm, POSITION_EPSILON_NM};

/// A route point as authored by the pilot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default)]
    pub name: Option<String>,
    pub ident: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
    /// Free text carried into the label, e.g. a radio frequency
    #[serde(default)]
    pub remarks: Option<String>,
}

impl Waypoint {
    pub fn new(ident: impl Into<String>, latitude: f64, longitude: f64, altitude_ft: f64) -> Self {
        Self {
            name: None,
            ident: ident.into(),
            latitude,
            longitude,
            altitude_ft,
            remarks: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Great-circle distance to `other` in nautical miles.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        haversine_distance_nm(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// An ordered, validated sequence of at least two waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Validate and wrap a waypoint sequence.
    ///
    /// Fails on fewer than two waypoints, on coordinates outside the globe and
    /// on legs whose ends coincide.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, PlanError> {
        if waypoints.len() < 2 {
            return Err(PlanError::InvalidRoute(format!(
                "a route needs an origin and a destination, got {} waypoint(s)",
                waypoints.len()
            )));
        }

        for (idx, wp) in waypoints.iter().enumerate() {
            if !wp.latitude.is_finite()
                || !wp.longitude.is_finite()
                || !wp.altitude_ft.is_finite()
                || !(-90.0..=90.0).contains(&wp.latitude)
                || !(-180.0..=180.0).contains(&wp.longitude)
            {
                return Err(PlanError::InvalidRoute(format!(
                    "waypoint {idx} ({}) has an invalid position",
                    wp.ident
                )));
            }
        }

        for (idx, pair) in waypoints.windows(2).enumerate() {
            if pair[0].distance_to(&pair[1]) < POSITION_EPSILON_NM {
                return Err(PlanError::DegenerateLeg {
                    from: idx,
                    to: idx + 1,
                });
            }
        }

        Ok(Self { waypoints })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false: a route holds at least two waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Length of the leg from waypoint `idx` to waypoint `idx + 1`.
    pub fn leg_distance_nm(&self, idx: usize) -> f64 {
        self.waypoints[idx].distance_to(&self.waypoints[idx + 1])
    }

    /// Sum of the leg lengths between two waypoint indices.
    pub fn distance_between_nm(&self, from: usize, to: usize) -> f64 {
        (from..to).map(|idx| self.leg_distance_nm(idx)).sum()
    }
}

/// One low-level segment, as 0-based indices into the original route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowLevelLeg {
    pub entry: usize,
    pub exit: usize,
}

/// Ordered, non-overlapping low-level segments of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundarySet {
    legs: Vec<LowLevelLeg>,
}

impl BoundarySet {
    pub fn new(legs: Vec<LowLevelLeg>) -> Self {
        Self { legs }
    }

    /// Build from the 1-based waypoint numbers shown to the user.
    pub fn from_one_based(pairs: &[(usize, usize)]) -> Result<Self, PlanError> {
        let mut legs = Vec::with_capacity(pairs.len());
        for &(entry, exit) in pairs {
            if entry == 0 || exit == 0 {
                return Err(PlanError::InvalidBoundarySet(
                    "waypoint numbers start at 1".to_string(),
                ));
            }
            legs.push(LowLevelLeg {
                entry: entry - 1,
                exit: exit - 1,
            });
        }
        Ok(Self { legs })
    }

    pub fn legs(&self) -> &[LowLevelLeg] {
        &self.legs
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Check the pairs against a route of `route_len` waypoints.
    pub fn validate(&self, route_len: usize) -> Result<(), PlanError> {
        let mut previous_exit: Option<usize> = None;
        for (idx, leg) in self.legs.iter().enumerate() {
            if leg.exit >= route_len {
                return Err(PlanError::InvalidBoundarySet(format!(
                    "segment {}: exit waypoint {} is beyond the last waypoint {}",
                    idx + 1,
                    leg.exit + 1,
                    route_len
                )));
            }
            if leg.entry >= leg.exit {
                return Err(PlanError::InvalidBoundarySet(format!(
                    "segment {}: entry waypoint {} must come before exit waypoint {}",
                    idx + 1,
                    leg.entry + 1,
                    leg.exit + 1
                )));
            }
            if let Some(prev) = previous_exit {
                if leg.entry <= prev {
                    return Err(PlanError::InvalidBoundarySet(format!(
                        "segment {}: entry waypoint {} overlaps the previous segment ending at {}",
                        idx + 1,
                        leg.entry + 1,
                        prev + 1
                    )));
                }
            }
            previous_exit = Some(leg.exit);
        }
        Ok(())
    }
}

/// Flight phase of an annotated waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Climb,
    TransitCruise,
    Descent,
    /// Inside a low-level segment, up to and including its exit waypoint
    LowLevel,
    /// Top of climb
    Toc,
    /// Top of descent
    Tod,
    /// Low-level entry point
    Llep,
}

impl Phase {
    /// Token printed in the label for phase boundary markers.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Phase::Toc => Some("TOC"),
            Phase::Tod => Some("TOD"),
            Phase::Llep => Some("LLEP"),
            _ => None,
        }
    }

    /// True for waypoints flown inside a low-level segment.
    pub fn is_low_level(self) -> bool {
        matches!(self, Phase::Llep | Phase::LowLevel)
    }
}

/// A waypoint of the augmented route with its computed navigation data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedWaypoint {
    pub waypoint: Waypoint,
    pub phase: Phase,
    /// Index in the original route, `None` for inserted TOC/TOD points
    pub source_index: Option<usize>,
    pub elapsed_time_from_origin: f64,
    /// Seconds since the most recent low-level entry, `None` before the first one
    pub elapsed_time_from_llep: Option<f64>,
    /// Bearing to the next waypoint, `None` on the last one
    pub outbound_bearing: Option<u16>,
    pub display_altitude_ft: f64,
    /// Transit flight level of the block, for climb, cruise and descent points
    pub flight_level: Option<u16>,
    pub label: String,
}

impl AnnotatedWaypoint {
    pub fn is_synthetic(&self) -> bool {
        self.source_index.is_none()
    }
}
