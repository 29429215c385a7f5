//! Plain-text tables printed by the `convert` command.

use std::fmt::Write;

use lownav_core::{format_altitude, AnnotatedWaypoint};
use lownav_lnm::{waypoint_comment, LnmWaypoint};

/// Numbered table of the source waypoints, used to pick the low-level segment.
pub fn waypoint_table(waypoints: &[LnmWaypoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} | {:<14} | {:<15} | {:<5} | {:<21}",
        "Index", "Name", "Ident", "Alt", "Comment"
    );
    let _ = writeln!(out, "{}", "-".repeat(70));
    for (idx, wp) in waypoints.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<6} : {:<14} : {:<15} : {} : {}",
            idx + 1,
            wp.name.as_deref().unwrap_or("None"),
            wp.ident,
            format_altitude(wp.alt),
            wp.comment.as_deref().unwrap_or("")
        );
    }
    out
}

/// Name, label, altitude and comment of every processed waypoint.
pub fn processed_report(annotated: &[AnnotatedWaypoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} | {:<24} | {:<5} | {:<21}",
        "Name", "Ident", "Alt", "Comment"
    );
    let _ = writeln!(out, "{}", "-".repeat(72));
    for wp in annotated {
        let _ = writeln!(
            out,
            "{:<14} : {:<24} : {} : {}",
            wp.waypoint.name.as_deref().unwrap_or("None"),
            wp.label,
            format_altitude(wp.display_altitude_ft),
            waypoint_comment(wp)
        );
    }
    out
}
