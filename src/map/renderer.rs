use rayon::prelude::*;

use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_line, draw_marker};
use crate::map::projection::RotatedMercator;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Graticule spacing in degrees.
const GRATICULE_STEP: f64 = 10.0;
/// Sampling step along graticule lines, fine enough to stay smooth
/// under rotation.
const GRATICULE_SAMPLE: f64 = 2.5;
/// Graticule latitude extent; meridians stop short of the poles.
const GRATICULE_LAT_EXTENT: f64 = 80.0;

/// Rendered braille layers, colored independently by the UI.
pub struct MapLayers {
    pub graticule: BrailleCanvas,
    pub land: BrailleCanvas,
}

/// Renders world-boundary geometry and a grid of meridians/parallels
/// through the current projection.
pub struct MapRenderer {
    land: Vec<LineString>,
    graticule: Vec<LineString>,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            land: Vec::new(),
            graticule: generate_graticule(),
        }
    }

    /// Add a world-boundary line.
    pub fn add_land(&mut self, line: LineString) {
        if line.len() >= 2 {
            self.land.push(line);
        }
    }

    /// Check if any boundary geometry is loaded.
    pub fn has_data(&self) -> bool {
        !self.land.is_empty()
    }

    pub fn land_line_count(&self) -> usize {
        self.land.len()
    }

    /// Render all layers for the given character-cell dimensions. The
    /// projection's pixel dimensions are expected to match (2x4 dots per
    /// cell).
    pub fn render(&self, width: usize, height: usize, proj: &RotatedMercator) -> MapLayers {
        let mut layers = MapLayers {
            graticule: BrailleCanvas::new(width, height),
            land: BrailleCanvas::new(width, height),
        };

        rasterize_lines(&mut layers.graticule, &self.graticule, proj);
        rasterize_lines(&mut layers.land, &self.land, proj);

        // Center crosshair
        draw_marker(
            &mut layers.graticule,
            proj.width as i32 / 2,
            proj.height as i32 / 2,
            2,
        );

        layers
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Project all lines in parallel, then rasterize serially onto the canvas.
fn rasterize_lines(canvas: &mut BrailleCanvas, lines: &[LineString], proj: &RotatedMercator) {
    let projected: Vec<Vec<(i32, i32)>> = lines
        .par_iter()
        .map(|line| {
            line.iter()
                .map(|&(lon, lat)| proj.project(lon, lat))
                .collect()
        })
        .collect();

    for line in &projected {
        let mut prev: Option<(i32, i32)> = None;
        for &(px, py) in line {
            if let Some((prev_x, prev_y)) = prev {
                // Segments that leap across the canvas are seam artifacts
                // of the rotated projection, not real geometry.
                let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
                if dist < proj.width && proj.segment_might_be_visible((prev_x, prev_y), (px, py)) {
                    draw_line(canvas, prev_x, prev_y, px, py);
                }
            }
            prev = Some((px, py));
        }
    }
}

/// Build the 10° grid: parallels spanning the full longitude range and
/// meridians spanning ±80° latitude.
fn generate_graticule() -> Vec<LineString> {
    let mut lines = Vec::new();

    let mut lat = -GRATICULE_LAT_EXTENT;
    while lat <= GRATICULE_LAT_EXTENT {
        let mut line = Vec::new();
        let mut lon = -180.0;
        while lon <= 180.0 {
            line.push((lon, lat));
            lon += GRATICULE_SAMPLE;
        }
        lines.push(line);
        lat += GRATICULE_STEP;
    }

    let mut lon = -180.0;
    while lon < 180.0 {
        let mut line = Vec::new();
        let mut lat = -GRATICULE_LAT_EXTENT;
        while lat <= GRATICULE_LAT_EXTENT {
            line.push((lon, lat));
            lat += GRATICULE_SAMPLE;
        }
        lines.push(line);
        lon += GRATICULE_STEP;
    }

    lines
}
