use std::path::{Path, PathBuf};

use lownav_core::AnnotatedWaypoint;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{LnmError, Result};
use crate::reader::LnmPlan;

/// Comment written on the origin in place of its ident.
pub const ORIGIN_COMMENT: &str = "START";

const INDENT_STEP: &str = "  ";

/// File name the processed plan is saved under, next to the input.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem} [processed].{}", ext.to_string_lossy()),
        None => format!("{stem} [processed]"),
    };
    input.with_file_name(name)
}

/// `Comment` written for an annotated waypoint: the source ident, `START` on
/// the origin, `TOC`/`TOD` on inserted points.
pub fn waypoint_comment(wp: &AnnotatedWaypoint) -> &str {
    match wp.source_index {
        Some(0) => ORIGIN_COMMENT,
        _ => wp.waypoint.ident.as_str(),
    }
}

/// Render `plan` with its waypoint list replaced by `annotated`.
///
/// Everything outside `<Waypoints>` is copied event by event, so headers,
/// aircraft performance and any unknown elements survive untouched.
pub fn render_plan(plan: &LnmPlan, annotated: &[AnnotatedWaypoint]) -> Result<String> {
    let mut reader = Reader::from_str(plan.source());
    let mut writer = Writer::new(Vec::with_capacity(plan.source().len() * 2));
    let mut indent = String::from("\n");

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"Waypoints" => {
                let end = e.to_end().into_owned();
                writer.write_event(Event::Start(e))?;
                write_waypoints(&mut writer, plan, annotated, &indent)?;
                reader.read_to_end(end.name())?;
                writer.write_event(Event::Text(BytesText::from_escaped(indent.as_str())))?;
                writer.write_event(Event::End(end))?;
            }
            Event::Text(e) => {
                if let Ok(text) = std::str::from_utf8(e.as_ref()) {
                    if !text.is_empty() && text.trim().is_empty() {
                        indent = text.to_string();
                    }
                }
                writer.write_event(Event::Text(e))?;
            }
            Event::Eof => break,
            e => writer.write_event(e)?,
        }
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

/// Render and save the processed plan.
pub fn write_plan(plan: &LnmPlan, annotated: &[AnnotatedWaypoint], path: &Path) -> Result<()> {
    let xml = render_plan(plan, annotated)?;
    std::fs::write(path, xml).map_err(|source| LnmError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), waypoints = annotated.len(), "wrote processed plan");
    Ok(())
}

fn write_waypoints(
    writer: &mut Writer<Vec<u8>>,
    plan: &LnmPlan,
    annotated: &[AnnotatedWaypoint],
    base_indent: &str,
) -> Result<()> {
    let outer = format!("{base_indent}{INDENT_STEP}");
    let inner = format!("{outer}{INDENT_STEP}");

    for wp in annotated {
        let region = wp
            .source_index
            .and_then(|idx| plan.waypoints().get(idx))
            .and_then(|src| src.region.as_deref());
        let comment = waypoint_comment(wp);

        writer.write_event(Event::Text(BytesText::from_escaped(outer.as_str())))?;
        writer.write_event(Event::Start(BytesStart::new("Waypoint")))?;

        if let Some(name) = wp.waypoint.name.as_deref() {
            write_field(writer, &inner, "Name", name)?;
        }
        write_field(writer, &inner, "Ident", &wp.label)?;
        write_field(writer, &inner, "Type", "WAYPOINT")?;
        if let Some(region) = region {
            write_field(writer, &inner, "Region", region)?;
        }
        write_field(writer, &inner, "Comment", comment)?;

        let lon = format!("{:.6}", wp.waypoint.longitude);
        let lat = format!("{:.6}", wp.waypoint.latitude);
        let alt = format!("{:.2}", wp.display_altitude_ft);
        writer.write_event(Event::Text(BytesText::from_escaped(inner.as_str())))?;
        writer.write_event(Event::Empty(BytesStart::new("Pos").with_attributes([
            ("Lon", lon.as_str()),
            ("Lat", lat.as_str()),
            ("Alt", alt.as_str()),
        ])))?;

        writer.write_event(Event::Text(BytesText::from_escaped(outer.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new("Waypoint")))?;
    }

    Ok(())
}

fn write_field(writer: &mut Writer<Vec<u8>>, indent: &str, tag: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Text(BytesText::from_escaped(indent)))?;
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
