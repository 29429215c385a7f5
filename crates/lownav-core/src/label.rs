//! Map label rendering for annotated waypoints.
//!
//! A label reads `time/bearing/FLnnn/MARKER/remarks`, with components left
//! out when they do not apply, e.g. `13:58/350/FL200/TOD` or `2:11/338/VHF 121.5`.

use serde::{Deserialize, Serialize};

use crate::models::{AnnotatedWaypoint, Phase};

/// Label rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOptions {
    /// Longest remarks text kept in a label, in characters
    pub max_remarks_chars: usize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            max_remarks_chars: 20,
        }
    }
}

/// Render the label for one annotated waypoint.
///
/// An LLEP shows its arrival time since origin. Use [`apply_labels`] on a
/// full sequence so that later entries continue the low-level clock instead.
pub fn format_label(wp: &AnnotatedWaypoint, options: &LabelOptions) -> String {
    let secs = match wp.elapsed_time_from_llep {
        Some(since_llep) if wp.phase != Phase::Llep => since_llep,
        _ => wp.elapsed_time_from_origin,
    };
    render_label(wp, secs, options)
}

fn render_label(wp: &AnnotatedWaypoint, secs: f64, options: &LabelOptions) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(5);
    parts.push(format_elapsed(secs));

    if let Some(bearing) = wp.outbound_bearing {
        parts.push(format!("{bearing:03}"));
    }

    if let Some(fl) = wp.flight_level {
        parts.push(format!("FL{fl:03}"));
    }

    if let Some(marker) = wp.phase.marker() {
        parts.push(marker.to_string());
    }

    if let Some(remarks) = wp.waypoint.remarks.as_deref() {
        let remarks = truncate_chars(remarks.trim(), options.max_remarks_chars);
        if !remarks.is_empty() {
            parts.push(remarks);
        }
    }

    parts.join("/")
}

/// Fill in `label` on every waypoint of the sequence.
///
/// The first LLEP shows the time since origin. Each later LLEP shows the
/// time since the previous one, matching the transit points before it.
pub fn apply_labels(waypoints: &mut [AnnotatedWaypoint], options: &LabelOptions) {
    let mut previous_llep: Option<f64> = None;
    for wp in waypoints.iter_mut() {
        wp.label = match (wp.phase, previous_llep) {
            (Phase::Llep, Some(previous)) => {
                render_label(wp, wp.elapsed_time_from_origin - previous, options)
            }
            _ => format_label(wp, options),
        };
        if wp.phase == Phase::Llep {
            previous_llep = Some(wp.elapsed_time_from_origin);
        }
    }
}

/// Float noise tolerated below a whole second before truncating.
const ELAPSED_SLACK_SECS: f64 = 1e-6;

/// `m:ss` below one hour, `h:mm` from one hour on. Seconds are truncated.
pub fn format_elapsed(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        (secs + ELAPSED_SLACK_SECS) as u64
    } else {
        0
    };
    if total < 3600 {
        format!("{}:{:02}", total / 60, total % 60)
    } else {
        format!("{}:{:02}", total / 3600, (total % 3600) / 60)
    }
}

/// Five-digit, zero-padded altitude in feet.
pub fn format_altitude(altitude_ft: f64) -> String {
    format!("{:05}", altitude_ft.round().max(0.0) as i64)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Waypoint;

    fn annotated(phase: Phase) -> AnnotatedWaypoint {
        AnnotatedWaypoint {
            waypoint: Waypoint::new("WP", 56.0, -3.0, 500.0),
            phase,
            source_index: Some(3),
            elapsed_time_from_origin: 1038.4,
            elapsed_time_from_llep: None,
            outbound_bearing: Some(7),
            display_altitude_ft: 500.0,
            flight_level: None,
            label: String::new(),
        }
    }

    #[test]
    fn elapsed_time_formats() {
        assert_eq!(format_elapsed(0.0), "0:00");
        assert_eq!(format_elapsed(45.0), "0:45");
        assert_eq!(format_elapsed(123.987), "2:03");
        assert_eq!(format_elapsed(1038.4), "17:18");
        assert_eq!(format_elapsed(3599.9), "59:59");
        assert_eq!(format_elapsed(3900.0), "1:05");
        assert_eq!(format_elapsed(-3.0), "0:00");
        // 20 nm at 360 kts through the 1000 ft/nm climb gradient
        assert_eq!(format_elapsed(199.99999999999997), "3:20");
    }

    #[test]
    fn altitude_is_five_digits() {
        assert_eq!(format_altitude(500.0), "00500");
        assert_eq!(format_altitude(20000.0), "20000");
        assert_eq!(format_altitude(266.4), "00266");
    }

    #[test]
    fn toc_label_carries_level_and_marker() {
        let mut wp = annotated(Phase::Toc);
        wp.elapsed_time_from_origin = 200.0;
        wp.outbound_bearing = Some(342);
        wp.flight_level = Some(200);
        assert_eq!(format_label(&wp, &LabelOptions::default()), "3:20/342/FL200/TOC");
    }

    #[test]
    fn llep_shows_arrival_time_not_low_level_clock() {
        let mut wp = annotated(Phase::Llep);
        wp.elapsed_time_from_llep = Some(0.0);
        assert_eq!(format_label(&wp, &LabelOptions::default()), "17:18/007/LLEP");
    }

    #[test]
    fn later_llep_continues_the_low_level_clock() {
        let mut first = annotated(Phase::Llep);
        first.elapsed_time_from_llep = Some(0.0);

        let mut tod = annotated(Phase::Tod);
        tod.elapsed_time_from_origin = 2225.0;
        tod.elapsed_time_from_llep = Some(2225.0 - 1038.4);
        tod.flight_level = Some(190);

        let mut second = annotated(Phase::Llep);
        second.elapsed_time_from_origin = 2492.0;
        second.elapsed_time_from_llep = Some(0.0);

        let mut after = annotated(Phase::LowLevel);
        after.elapsed_time_from_origin = 2552.0;
        after.elapsed_time_from_llep = Some(60.0);

        let mut waypoints = vec![first, tod, second, after];
        apply_labels(&mut waypoints, &LabelOptions::default());
        let labels: Vec<&str> = waypoints.iter().map(|wp| wp.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["17:18/007/LLEP", "19:46/007/FL190/TOD", "24:13/007/LLEP", "1:00/007"]
        );
    }

    #[test]
    fn low_level_waypoint_uses_time_since_entry() {
        let mut wp = annotated(Phase::LowLevel);
        wp.elapsed_time_from_llep = Some(131.0);
        wp.outbound_bearing = Some(338);
        wp.waypoint.remarks = Some("VHF 121.5".to_string());
        assert_eq!(format_label(&wp, &LabelOptions::default()), "2:11/338/VHF 121.5");
    }

    #[test]
    fn terminal_waypoint_has_no_bearing() {
        let mut wp = annotated(Phase::LowLevel);
        wp.elapsed_time_from_llep = Some(1242.0);
        wp.outbound_bearing = None;
        wp.waypoint.remarks = Some("ILS108.5/RW05".to_string());
        assert_eq!(format_label(&wp, &LabelOptions::default()), "20:42/ILS108.5/RW05");
    }

    #[test]
    fn remarks_are_truncated() {
        let mut wp = annotated(Phase::Climb);
        wp.elapsed_time_from_origin = 0.0;
        wp.flight_level = Some(200);
        wp.waypoint.remarks = Some("  TWR 118.7 then APP 124.375  ".to_string());
        let options = LabelOptions {
            max_remarks_chars: 10,
        };
        assert_eq!(format_label(&wp, &options), "0:00/007/FL200/TWR 118.7");
    }

    #[test]
    fn blank_remarks_are_dropped() {
        let mut wp = annotated(Phase::TransitCruise);
        wp.waypoint.remarks = Some("   ".to_string());
        assert_eq!(format_label(&wp, &LabelOptions::default()), "17:18/007");
    }
}
