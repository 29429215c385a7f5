use std::path::Path;

use lownav_core::{Route, Waypoint};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{LnmError, Result};

/// One `<Waypoint>` of a Little Navmap plan, as written in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct LnmWaypoint {
    pub name: Option<String>,
    pub ident: String,
    pub kind: Option<String>,
    pub region: Option<String>,
    pub comment: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub alt: f64,
}

impl LnmWaypoint {
    pub fn to_waypoint(&self) -> Waypoint {
        let mut wp = Waypoint::new(self.ident.clone(), self.lat, self.lon, self.alt);
        wp.name = self.name.clone();
        wp.remarks = self
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        wp
    }
}

/// A parsed plan file: the untouched source document plus its route.
#[derive(Debug, Clone)]
pub struct LnmPlan {
    source: String,
    waypoints: Vec<LnmWaypoint>,
    route: Route,
}

impl LnmPlan {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn waypoints(&self) -> &[LnmWaypoint] {
        &self.waypoints
    }

    pub fn route(&self) -> &Route {
        &self.route
    }
}

/// Read and parse a `.lnmpln` file.
pub fn read_plan(path: &Path) -> Result<LnmPlan> {
    let xml = std::fs::read_to_string(path).map_err(|source| LnmError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let plan = parse_plan(xml)?;
    tracing::info!(
        path = %path.display(),
        waypoints = plan.waypoints.len(),
        "loaded flight plan"
    );
    Ok(plan)
}

/// Parse a Little Navmap flight plan document.
pub fn parse_plan(xml: String) -> Result<LnmPlan> {
    let waypoints = parse_waypoints(&xml)?;
    if waypoints.is_empty() {
        return Err(LnmError::NoWaypoints);
    }
    let route = Route::new(waypoints.iter().map(LnmWaypoint::to_waypoint).collect())?;
    Ok(LnmPlan {
        source: xml,
        waypoints,
        route,
    })
}

fn parse_waypoints(xml: &str) -> Result<Vec<LnmWaypoint>> {
    let mut reader = Reader::from_str(xml);
    let mut waypoints = Vec::new();
    let mut in_waypoints = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Waypoints" => in_waypoints = true,
                b"Waypoint" if in_waypoints => {
                    let wp = parse_waypoint(&e, &mut reader, waypoints.len())?;
                    waypoints.push(wp);
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"Waypoints" => in_waypoints = false,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(waypoints)
}

/// Parse the children of a `<Waypoint>`. Called after its start tag.
fn parse_waypoint<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
    index: usize,
) -> Result<LnmWaypoint> {
    let end_name = start.name().0.to_vec();
    let mut name = None;
    let mut ident = None;
    let mut kind = None;
    let mut region = None;
    let mut comment = None;
    let mut pos = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Name" => name = non_empty(read_text_owned(reader, &e)?),
                b"Ident" => ident = non_empty(read_text_owned(reader, &e)?),
                b"Type" => kind = non_empty(read_text_owned(reader, &e)?),
                b"Region" => region = non_empty(read_text_owned(reader, &e)?),
                b"Comment" => comment = non_empty(read_text_owned(reader, &e)?),
                b"Pos" => {
                    pos = Some(parse_pos(&e, index)?);
                    reader.read_to_end(e.name())?;
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if e.local_name().as_ref() == b"Pos" => {
                pos = Some(parse_pos(&e, index)?);
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    let ident = ident.ok_or(LnmError::MissingField {
        waypoint: index,
        field: "Ident",
    })?;
    let (lon, lat, alt) = pos.ok_or(LnmError::MissingField {
        waypoint: index,
        field: "Pos",
    })?;

    Ok(LnmWaypoint {
        name,
        ident,
        kind,
        region,
        comment,
        lon,
        lat,
        alt,
    })
}

/// Read `Lon`, `Lat` and `Alt` from a `<Pos>` tag. A missing altitude reads as 0 ft.
fn parse_pos(e: &BytesStart<'_>, index: usize) -> Result<(f64, f64, f64)> {
    let mut lon = None;
    let mut lat = None;
    let mut alt = None;

    for attr in e.attributes() {
        let attr = attr?;
        let field = match attr.key.local_name().as_ref() {
            b"Lon" => "Lon",
            b"Lat" => "Lat",
            b"Alt" => "Alt",
            _ => continue,
        };
        let raw = std::str::from_utf8(&attr.value).unwrap_or_default();
        let value = raw.trim().parse::<f64>().map_err(|_| LnmError::InvalidField {
            waypoint: index,
            field,
            value: raw.to_string(),
        })?;
        match field {
            "Lon" => lon = Some(value),
            "Lat" => lat = Some(value),
            _ => alt = Some(value),
        }
    }

    let lon = lon.ok_or(LnmError::MissingField {
        waypoint: index,
        field: "Pos Lon",
    })?;
    let lat = lat.ok_or(LnmError::MissingField {
        waypoint: index,
        field: "Pos Lat",
    })?;
    Ok((lon, lat, alt.unwrap_or(0.0)))
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collect the text content of an element up to its end tag, resolving
/// character and predefined entity references.
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Event::CData(e) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Event::GeneralRef(e) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Event::End(e) if e.name().0 == end_name.as_slice() => break,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
