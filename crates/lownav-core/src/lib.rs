pub mod error;
pub mod label;
pub mod models;
pub mod performance;
pub mod segmentation;
pub mod spatial;

pub use error::PlanError;
pub use label::{apply_labels, format_altitude, format_elapsed, format_label, LabelOptions};
pub use models::{AnnotatedWaypoint, BoundarySet, LowLevelLeg, Phase, Route, Waypoint};
pub use performance::PerformanceProfile;
pub use segmentation::{
    plan_transit_profile, segment_route, Plan, Segment, SegmentKind, TransitProfile,
    MAX_TRANSIT_FL,
};
pub use spatial::{haversine_distance_nm, rounded_bearing_deg, POSITION_EPSILON_NM};

/// Segment, time and label a route in one pass.
///
/// This is the entry point used by the plan processor: the result is the
/// augmented waypoint sequence, origin first, with every label filled in.
pub fn annotate_route(
    route: &Route,
    profile: &PerformanceProfile,
    boundaries: &BoundarySet,
    options: &LabelOptions,
) -> Result<Vec<AnnotatedWaypoint>, PlanError> {
    let mut plan = segment_route(route, profile, boundaries)?;
    apply_labels(&mut plan.waypoints, options);

    tracing::info!(
        waypoints = plan.waypoints.len(),
        segments = plan.segments.len(),
        low_level_segments = boundaries.legs().len(),
        "annotated route"
    );
    Ok(plan.waypoints)
}
