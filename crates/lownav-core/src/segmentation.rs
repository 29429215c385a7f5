//! Splits a route into climb, cruise, descent and low-level segments.
//!
//! The augmented sequence is built append-only by walking the original legs
//! with a cursor. TOC and TOD either become new points between two original
//! waypoints or re-tag the original waypoint they land on.

use serde::Serialize;

use crate::error::PlanError;
use crate::models::{AnnotatedWaypoint, BoundarySet, Phase, Route, Waypoint};
use crate::performance::PerformanceProfile;
use crate::spatial::{
    intermediate_point, rounded_bearing_deg, travel_time_secs, POSITION_EPSILON_NM,
};

/// Highest transit flight level the rule of thumb may produce.
pub const MAX_TRANSIT_FL: i64 = 450;

/// Shortest level cruise accepted between TOC and TOD.
const MIN_CRUISE_NM: f64 = 2.0 * POSITION_EPSILON_NM;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentKind {
    Climb,
    TransitCruise,
    Descent,
    LowLevel,
}

/// A contiguous run of the augmented sequence flown at one target altitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Index of the first waypoint in the augmented sequence
    pub start: usize,
    /// Index of the last waypoint in the augmented sequence
    pub end: usize,
    pub altitude_ft: f64,
    pub airspeed_kts: f64,
}

/// Result of segmenting a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub waypoints: Vec<AnnotatedWaypoint>,
    pub segments: Vec<Segment>,
}

/// Vertical profile of one transit block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitProfile {
    pub flight_level: u16,
    pub distance_nm: f64,
    pub climb_nm: f64,
    pub descent_nm: f64,
}

impl TransitProfile {
    pub fn cruise_altitude_ft(&self) -> f64 {
        f64::from(self.flight_level) * 100.0
    }

    /// Distance from the block start at which the descent begins.
    pub fn tod_nm(&self) -> f64 {
        self.distance_nm - self.descent_nm
    }
}

/// Route span flown at cruise level between two low-level segments, or
/// between one and the origin or destination.
#[derive(Debug, Clone, Copy)]
struct TransitBlock {
    /// 1-based, as reported in errors
    number: usize,
    start: usize,
    end: usize,
    start_altitude_ft: f64,
    end_altitude_ft: f64,
    ends_at_llep: bool,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Transit(TransitBlock),
    LowLevel { entry: usize, exit: usize },
}

struct Draft {
    waypoint: Waypoint,
    phase: Phase,
    source_index: Option<usize>,
    display_altitude_ft: f64,
    flight_level: Option<u16>,
}

/// Work out the transit flight level and climb/descent distances for a block.
///
/// The level is twice the block length in nautical miles, taken down to a
/// multiple of ten.
pub fn plan_transit_profile(
    distance_nm: f64,
    start_altitude_ft: f64,
    end_altitude_ft: f64,
    profile: &PerformanceProfile,
    block: usize,
) -> Result<TransitProfile, PlanError> {
    let raw_fl = (2.0 * distance_nm / 10.0).floor() * 10.0;
    if !raw_fl.is_finite() {
        return Err(PlanError::InvalidFlightLevel {
            block,
            flight_level: 0,
            reason: format!("block length {distance_nm} nm is not a number"),
        });
    }

    let mut flight_level = raw_fl as i64;
    if flight_level > MAX_TRANSIT_FL {
        tracing::debug!(block, flight_level, "clamping transit level to FL{MAX_TRANSIT_FL}");
        flight_level = MAX_TRANSIT_FL;
    }

    let cruise_ft = flight_level as f64 * 100.0;
    let floor_ft = start_altitude_ft
        .max(end_altitude_ft)
        .max(profile.route_altitude_ft);
    if cruise_ft <= floor_ft {
        return Err(PlanError::InvalidFlightLevel {
            block,
            flight_level,
            reason: format!("{cruise_ft:.0} ft is not above the block floor of {floor_ft:.0} ft"),
        });
    }

    let climb_nm = (cruise_ft - start_altitude_ft) / profile.climb_gradient_ft_per_nm();
    let descent_nm = (cruise_ft - end_altitude_ft) / profile.descent_gradient_ft_per_nm();
    let required_nm = climb_nm + descent_nm + MIN_CRUISE_NM;

    if climb_nm <= POSITION_EPSILON_NM
        || descent_nm <= POSITION_EPSILON_NM
        || required_nm > distance_nm
    {
        return Err(PlanError::ProfileDoesNotFit {
            block,
            available_nm: distance_nm,
            required_nm,
        });
    }

    Ok(TransitProfile {
        flight_level: flight_level as u16,
        distance_nm,
        climb_nm,
        descent_nm,
    })
}

/// Segment `route` and compute times, bearings and altitudes for every point.
///
/// Labels are left empty; see [`crate::label`].
pub fn segment_route(
    route: &Route,
    profile: &PerformanceProfile,
    boundaries: &BoundarySet,
) -> Result<Plan, PlanError> {
    profile.validate()?;
    boundaries.validate(route.len())?;

    let (drafts, segments) = if boundaries.is_empty() {
        annotate_as_flown(route, profile)
    } else {
        build_sequence(route, profile, boundaries)?
    };

    let times = integrate_times(&drafts, &segments);
    let bearings = outbound_bearings(&drafts)?;

    let mut llep_time: Option<f64> = None;
    let waypoints = drafts
        .into_iter()
        .zip(times)
        .zip(bearings)
        .map(|((draft, elapsed), bearing)| {
            if draft.phase == Phase::Llep {
                llep_time = Some(elapsed);
            }
            AnnotatedWaypoint {
                waypoint: draft.waypoint,
                phase: draft.phase,
                source_index: draft.source_index,
                elapsed_time_from_origin: elapsed,
                elapsed_time_from_llep: llep_time.map(|start| elapsed - start),
                outbound_bearing: bearing,
                display_altitude_ft: draft.display_altitude_ft,
                flight_level: draft.flight_level,
                label: String::new(),
            }
        })
        .collect();

    Ok(Plan {
        waypoints,
        segments,
    })
}

/// No low-level segments: keep the route as planned and only time it.
fn annotate_as_flown(route: &Route, profile: &PerformanceProfile) -> (Vec<Draft>, Vec<Segment>) {
    let drafts: Vec<Draft> = route
        .waypoints()
        .iter()
        .enumerate()
        .map(|(idx, wp)| Draft {
            waypoint: wp.clone(),
            phase: Phase::TransitCruise,
            source_index: Some(idx),
            display_altitude_ft: wp.altitude_ft,
            flight_level: None,
        })
        .collect();

    let segment = Segment {
        kind: SegmentKind::TransitCruise,
        start: 0,
        end: drafts.len() - 1,
        altitude_ft: route.waypoints()[0].altitude_ft,
        airspeed_kts: profile.transit_airspeed_kts,
    };
    (drafts, vec![segment])
}

fn build_stages(
    route: &Route,
    profile: &PerformanceProfile,
    boundaries: &BoundarySet,
) -> Vec<Stage> {
    let last = route.len() - 1;
    let waypoints = route.waypoints();
    let mut stages = Vec::new();
    let mut blocks = 0;
    let mut cursor = 0;

    for leg in boundaries.legs() {
        if leg.entry > cursor {
            blocks += 1;
            stages.push(Stage::Transit(TransitBlock {
                number: blocks,
                start: cursor,
                end: leg.entry,
                start_altitude_ft: if cursor == 0 {
                    waypoints[0].altitude_ft
                } else {
                    profile.route_altitude_ft
                },
                end_altitude_ft: profile.route_altitude_ft,
                ends_at_llep: true,
            }));
        }
        stages.push(Stage::LowLevel {
            entry: leg.entry,
            exit: leg.exit,
        });
        cursor = leg.exit;
    }

    if cursor < last {
        stages.push(Stage::Transit(TransitBlock {
            number: blocks + 1,
            start: cursor,
            end: last,
            start_altitude_ft: profile.route_altitude_ft,
            end_altitude_ft: waypoints[last].altitude_ft,
            ends_at_llep: false,
        }));
    }

    stages
}

fn build_sequence(
    route: &Route,
    profile: &PerformanceProfile,
    boundaries: &BoundarySet,
) -> Result<(Vec<Draft>, Vec<Segment>), PlanError> {
    let stages = build_stages(route, profile, boundaries);
    let origin = &route.waypoints()[0];

    let mut drafts = Vec::with_capacity(route.len() + 2 * stages.len());
    let mut segments = Vec::with_capacity(2 * stages.len());

    // The origin opens the first stage; every stage then emits its points
    // after its start waypoint.
    match stages.first() {
        Some(Stage::LowLevel { .. }) => drafts.push(Draft {
            waypoint: origin.clone(),
            phase: Phase::Llep,
            source_index: Some(0),
            display_altitude_ft: profile.route_altitude_ft,
            flight_level: None,
        }),
        _ => drafts.push(Draft {
            waypoint: origin.clone(),
            phase: Phase::Climb,
            source_index: Some(0),
            display_altitude_ft: origin.altitude_ft,
            flight_level: None,
        }),
    }

    for stage in &stages {
        match *stage {
            Stage::Transit(block) => {
                emit_transit_block(route, profile, block, &mut drafts, &mut segments)?
            }
            Stage::LowLevel { entry, exit } => {
                emit_low_level(route, profile, entry, exit, &mut drafts, &mut segments)
            }
        }
    }

    Ok((drafts, segments))
}

fn emit_low_level(
    route: &Route,
    profile: &PerformanceProfile,
    entry: usize,
    exit: usize,
    drafts: &mut Vec<Draft>,
    segments: &mut Vec<Segment>,
) {
    let start = drafts.len() - 1;
    for idx in entry + 1..=exit {
        drafts.push(Draft {
            waypoint: route.waypoints()[idx].clone(),
            phase: Phase::LowLevel,
            source_index: Some(idx),
            display_altitude_ft: profile.route_altitude_ft,
            flight_level: None,
        });
    }
    segments.push(Segment {
        kind: SegmentKind::LowLevel,
        start,
        end: drafts.len() - 1,
        altitude_ft: profile.route_altitude_ft,
        airspeed_kts: profile.route_airspeed_kts,
    });
}

fn emit_transit_block(
    route: &Route,
    profile: &PerformanceProfile,
    block: TransitBlock,
    drafts: &mut Vec<Draft>,
    segments: &mut Vec<Segment>,
) -> Result<(), PlanError> {
    let waypoints = route.waypoints();
    let distance_nm = route.distance_between_nm(block.start, block.end);
    let vertical = plan_transit_profile(
        distance_nm,
        block.start_altitude_ft,
        block.end_altitude_ft,
        profile,
        block.number,
    )?;

    tracing::debug!(
        block = block.number,
        distance_nm,
        flight_level = vertical.flight_level,
        climb_nm = vertical.climb_nm,
        descent_nm = vertical.descent_nm,
        "planned transit block"
    );

    let cruise_ft = vertical.cruise_altitude_ft();
    let fl = Some(vertical.flight_level);
    let climb_start = drafts.len() - 1;
    let mut toc_at: Option<usize> = None;
    let mut tod_at: Option<usize> = None;
    let mut travelled = 0.0;

    for idx in block.start..block.end {
        let from = &waypoints[idx];
        let to = &waypoints[idx + 1];
        let leg_end = travelled + route.leg_distance_nm(idx);

        if toc_at.is_none() && vertical.climb_nm < leg_end - POSITION_EPSILON_NM {
            let along = vertical.climb_nm - travelled;
            drafts.push(synthetic(from, to, along, "TOC", Phase::Toc, cruise_ft, fl));
            toc_at = Some(drafts.len() - 1);
            tracing::trace!(block = block.number, leg = idx, "inserted TOC");
        }
        if toc_at.is_some()
            && tod_at.is_none()
            && vertical.tod_nm() < leg_end - POSITION_EPSILON_NM
        {
            let along = vertical.tod_nm() - travelled;
            drafts.push(synthetic(from, to, along, "TOD", Phase::Tod, cruise_ft, fl));
            tod_at = Some(drafts.len() - 1);
            tracing::trace!(block = block.number, leg = idx, "inserted TOD");
        }

        if idx + 1 < block.end {
            let phase = if toc_at.is_none() {
                if (leg_end - vertical.climb_nm).abs() <= POSITION_EPSILON_NM {
                    Phase::Toc
                } else {
                    Phase::Climb
                }
            } else if tod_at.is_none() {
                if (leg_end - vertical.tod_nm()).abs() <= POSITION_EPSILON_NM {
                    Phase::Tod
                } else {
                    Phase::TransitCruise
                }
            } else {
                Phase::Descent
            };

            drafts.push(Draft {
                waypoint: to.clone(),
                phase,
                source_index: Some(idx + 1),
                display_altitude_ft: cruise_ft,
                flight_level: fl,
            });
            match phase {
                Phase::Toc => toc_at = Some(drafts.len() - 1),
                Phase::Tod => tod_at = Some(drafts.len() - 1),
                _ => {}
            }
        }

        travelled = leg_end;
    }

    let (end_phase, end_altitude_ft, end_fl) = if block.ends_at_llep {
        (Phase::Llep, profile.route_altitude_ft, None)
    } else {
        (Phase::Descent, waypoints[block.end].altitude_ft, fl)
    };
    drafts.push(Draft {
        waypoint: waypoints[block.end].clone(),
        phase: end_phase,
        source_index: Some(block.end),
        display_altitude_ft: end_altitude_ft,
        flight_level: end_fl,
    });

    // The fit check guarantees both markers fall strictly inside the block.
    let (Some(toc), Some(tod)) = (toc_at, tod_at) else {
        return Err(PlanError::ProfileDoesNotFit {
            block: block.number,
            available_nm: distance_nm,
            required_nm: vertical.climb_nm + vertical.descent_nm,
        });
    };

    // The block start keeps its own phase; the origin reads as climb.
    if let Some(first) = drafts.get_mut(climb_start) {
        if first.phase == Phase::Climb {
            first.flight_level = fl;
        }
    }

    let transit_kts = profile.transit_airspeed_kts;
    segments.push(Segment {
        kind: SegmentKind::Climb,
        start: climb_start,
        end: toc,
        altitude_ft: cruise_ft,
        airspeed_kts: transit_kts,
    });
    segments.push(Segment {
        kind: SegmentKind::TransitCruise,
        start: toc,
        end: tod,
        altitude_ft: cruise_ft,
        airspeed_kts: transit_kts,
    });
    segments.push(Segment {
        kind: SegmentKind::Descent,
        start: tod,
        end: drafts.len() - 1,
        altitude_ft: cruise_ft,
        airspeed_kts: transit_kts,
    });

    Ok(())
}

fn synthetic(
    from: &Waypoint,
    to: &Waypoint,
    along_nm: f64,
    ident: &str,
    phase: Phase,
    cruise_ft: f64,
    flight_level: Option<u16>,
) -> Draft {
    let (lat, lon) =
        intermediate_point(from.latitude, from.longitude, to.latitude, to.longitude, along_nm);
    Draft {
        waypoint: Waypoint::new(ident, lat, lon, cruise_ft).with_name(ident),
        phase,
        source_index: None,
        display_altitude_ft: cruise_ft,
        flight_level,
    }
}

/// Elapsed seconds from the origin at every point of the sequence.
fn integrate_times(drafts: &[Draft], segments: &[Segment]) -> Vec<f64> {
    let mut times = vec![0.0; drafts.len()];
    for segment in segments {
        for idx in segment.start..segment.end {
            let leg_nm = drafts[idx].waypoint.distance_to(&drafts[idx + 1].waypoint);
            times[idx + 1] = times[idx] + travel_time_secs(leg_nm, segment.airspeed_kts);
        }
    }
    times
}

fn outbound_bearings(drafts: &[Draft]) -> Result<Vec<Option<u16>>, PlanError> {
    let mut bearings = Vec::with_capacity(drafts.len());
    for (idx, pair) in drafts.windows(2).enumerate() {
        let (a, b) = (&pair[0].waypoint, &pair[1].waypoint);
        let bearing = rounded_bearing_deg(a.latitude, a.longitude, b.latitude, b.longitude)
            .ok_or(PlanError::DegenerateLeg {
                from: idx,
                to: idx + 1,
            })?;
        bearings.push(Some(bearing));
    }
    bearings.push(None);
    Ok(bearings)
}
