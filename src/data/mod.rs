use crate::map::MapRenderer;
use anyhow::{bail, Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

/// World-boundary files probed in order; the first one that parses wins.
const BOUNDARY_FILES: &[&str] = &[
    "world-boundaries.json",
    "countries-110m.json",
    "ne_110m_countries.json",
    "ne_110m_coastline.json",
    "natural-earth.json",
];

/// Load world-boundary geometry from `data_dir` into the renderer.
/// Failure here is terminal for the session: the caller shows a static
/// error panel in place of the map.
pub fn load_world(renderer: &mut MapRenderer, data_dir: &Path) -> Result<()> {
    for filename in BOUNDARY_FILES {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match load_boundaries(renderer, &path) {
            Ok(()) if renderer.has_data() => return Ok(()),
            Ok(()) => eprintln!("Warning: {} contained no line geometry", filename),
            Err(e) => eprintln!("Warning: failed to load {}: {}", filename, e),
        }
    }

    bail!(
        "no world boundary data found in {} (tried {})",
        data_dir.display(),
        BOUNDARY_FILES.join(", ")
    )
}

/// Parse one GeoJSON file and feed its line geometry to the renderer.
fn load_boundaries(renderer: &mut MapRenderer, path: &Path) -> Result<()> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    process_geojson_lines(&geojson, |line| renderer.add_land(line));
    Ok(())
}

/// Walk a GeoJSON document and extract every line feature.
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match &geometry.value {
        Value::LineString(coords) => {
            add_line(coords.iter().map(|c| (c[0], c[1])).collect());
        }
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(coords.iter().map(|c| (c[0], c[1])).collect());
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(exterior.iter().map(|c| (c[0], c[1])).collect());
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(exterior.iter().map(|c| (c[0], c[1])).collect());
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}
