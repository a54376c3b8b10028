use crate::map::Marker;
use crate::types::Coords;
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::fs;
use std::io::{BufReader, Cursor, Write};
use std::path::Path;

/// Every `<trkpt>` with usable `lat`/`lon` attributes, in file order.
pub fn parse_gpx_points(path: &Path) -> Result<Vec<Coords>> {
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(Cursor::new(bytes));
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut out: Vec<Coords> = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"trkpt" => {
                if let (Some(lat), Some(lng)) = parse_trkpt_lat_lon(&e) {
                    let c = Coords::new(lat, lng);
                    if c.in_range() {
                        out.push(c);
                    } else {
                        tracing::warn!(lat, lng, "skipping out-of-range trkpt");
                    }
                }
            }
            Err(e) => anyhow::bail!("GPX XML parse error: {e}"),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// First point of the track, used as the picked location.
pub fn track_start(path: &Path) -> Result<Coords> {
    let points = parse_gpx_points(path)
        .with_context(|| format!("Parsing GPX points: {}", path.display()))?;
    points
        .first()
        .copied()
        .with_context(|| format!("GPX file has no track points: {}", path.display()))
}

fn parse_trkpt_lat_lon(e: &BytesStart<'_>) -> (Option<f64>, Option<f64>) {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for a in e.attributes().with_checks(false).flatten() {
        let key = a.key.as_ref();
        if key == b"lat"
            && let Ok(v) = a.unescape_value()
        {
            lat = v.parse::<f64>().ok();
        } else if key == b"lon"
            && let Ok(v) = a.unescape_value()
        {
            lon = v.parse::<f64>().ok();
        }
    }

    (lat, lon)
}

/// Write markers as GPX 1.1 waypoints: popup text as `<name>`, activity as
/// `<type>`, workout id as `<desc>`.
pub fn write_markers<W: Write>(out: W, markers: &[Marker]) -> Result<()> {
    let mut xml = Writer::new_with_indent(out, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    xml.write_event(Event::Start(BytesStart::new("gpx").with_attributes([
        ("version", "1.1"),
        ("creator", "waymark"),
        ("xmlns", "http://www.topografix.com/GPX/1/1"),
    ])))?;

    for m in markers {
        let lat = m.coords.lat.to_string();
        let lon = m.coords.lng.to_string();
        let kind = m.class_name.trim_end_matches("-popup");

        xml.write_event(Event::Start(
            BytesStart::new("wpt").with_attributes([("lat", lat.as_str()), ("lon", lon.as_str())]),
        ))?;
        write_text_element(&mut xml, "name", &m.popup)?;
        write_text_element(&mut xml, "desc", &m.workout_id)?;
        write_text_element(&mut xml, "type", kind)?;
        xml.write_event(Event::End(BytesEnd::new("wpt")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("gpx")))?;
    xml.get_mut().write_all(b"\n")?;
    Ok(())
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(tag)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <trk><trkseg>
    <trkpt lat="47.2184" lon="-1.5536"><ele>12.0</ele><time>2026-04-14T08:00:00Z</time></trkpt>
    <trkpt lat="47.2190" lon="-1.5540"/>
    <trkpt lat="bogus" lon="-1.5"/>
  </trkseg></trk>
</gpx>"#;

    #[test]
    fn reads_track_points_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.gpx");
        fs::write(&path, TRACK).unwrap();

        let pts = parse_gpx_points(&path).unwrap();
        assert_eq!(pts, vec![Coords::new(47.2184, -1.5536), Coords::new(47.2190, -1.5540)]);
        assert_eq!(track_start(&path).unwrap(), Coords::new(47.2184, -1.5536));
    }

    #[test]
    fn empty_file_has_no_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.gpx");
        fs::write(&path, "").unwrap();

        assert!(parse_gpx_points(&path).unwrap().is_empty());
        assert!(track_start(&path).is_err());
    }

    #[test]
    fn markers_become_waypoints() {
        let markers = vec![Marker {
            workout_id: "6168000123".to_string(),
            coords: Coords::new(47.2184, -1.5536),
            icon: "🏃‍♂️",
            popup: "🏃‍♂️ running".to_string(),
            class_name: "running-popup".to_string(),
        }];

        let mut out = Vec::new();
        write_markers(&mut out, &markers).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<wpt lat="47.2184" lon="-1.5536">"#));
        assert!(xml.contains("<name>🏃‍♂️ running</name>"));
        assert!(xml.contains("<type>running</type>"));
        assert!(xml.contains("<desc>6168000123</desc>"));
    }
}
