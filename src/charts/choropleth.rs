//! Choropleth Module
//! Renders a state's district polygons colored by the selected variable,
//! with a vertical colorbar legend. Drawn with plotters into an RGB buffer
//! so the GUI can show it as a texture and the export path can reuse it.

use crate::config::RenderConfig;
use crate::geo::{self, ChoroplethRegion};
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

/// Fill for a boundary whose district has no dataset record.
pub const NO_DATA_FILL: (u8, u8, u8) = (200, 200, 200);

/// Width reserved for the colorbar legend.
const LEGEND_WIDTH: u32 = 130;

/// Viridis ramp stops, low to high.
const RAMP: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (72, 40, 120),
    (62, 74, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (109, 205, 89),
    (253, 231, 37),
];

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Drawing failed: {0}")]
    Draw(String),
}

/// Normalized position of `value` within [min, max]. A degenerate range
/// (single district, or all values equal) maps to the ramp midpoint.
pub fn value_to_t(value: f64, min: f64, max: f64) -> f64 {
    if !(max > min) {
        return 0.5;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Linear interpolation over the ramp stops.
pub fn ramp_color(t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (RAMP.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(RAMP.len() - 1);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = RAMP[lower];
    let (r1, g1, b1) = RAMP[upper];
    (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Render the choropleth into an RGBA image sized by `config`.
pub fn render_choropleth(
    regions: &[ChoroplethRegion],
    title: &str,
    config: &RenderConfig,
) -> Result<image::RgbaImage, ChartError> {
    let width = config.figure_width.max(200);
    let height = config.figure_height.max(200);
    let mut buf = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        draw_choropleth(&root, regions, title, config)?;
        root.present().map_err(|e| ChartError::Draw(e.to_string()))?;
    }
    let rgb = image::RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| ChartError::Draw("render buffer size mismatch".to_string()))?;
    Ok(image::DynamicImage::ImageRgb8(rgb).to_rgba8())
}

/// Draw map plus legend onto any plotters backend (in-memory or file).
pub(crate) fn draw_choropleth<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    regions: &[ChoroplethRegion],
    title: &str,
    config: &RenderConfig,
) -> Result<(), ChartError> {
    root.fill(&WHITE)
        .map_err(|e| ChartError::Draw(e.to_string()))?;

    // Unknown state: blank figure with the title, not an error.
    let Some(bbox) = geo::bounds(regions) else {
        let font = ("sans-serif", config.font_size as f64).into_font().color(&BLACK);
        root.draw(&Text::new(title.to_string(), (20, 20), font))
            .map_err(|e| ChartError::Draw(e.to_string()))?;
        return Ok(());
    };

    let (total_w, _) = root.dim_in_pixel();
    let (map_area, legend_area) =
        root.split_horizontally(total_w.saturating_sub(LEGEND_WIDTH) as i32);

    let ((min_x, min_y), (max_x, max_y)) = padded_ranges(bbox, &map_area);

    let mut chart = ChartBuilder::on(&map_area)
        .caption(title, ("sans-serif", config.font_size as f64).into_font())
        .margin(10)
        .build_cartesian_2d(min_x..max_x, min_y..max_y)
        .map_err(|e| ChartError::Draw(e.to_string()))?;

    let range = geo::value_range(regions);
    for region in regions {
        let fill = match (region.value, range) {
            (Some(value), Some((min, max))) => {
                let (r, g, b) = ramp_color(value_to_t(value, min, max));
                RGBColor(r, g, b)
            }
            _ => {
                let (r, g, b) = NO_DATA_FILL;
                RGBColor(r, g, b)
            }
        };

        for ring in &region.rings {
            let points: Vec<(f64, f64)> = ring.points.iter().map(|p| (p[0], p[1])).collect();
            let color = if ring.hole { WHITE } else { fill };
            chart
                .draw_series(std::iter::once(Polygon::new(points.clone(), color.filled())))
                .map_err(|e| ChartError::Draw(e.to_string()))?;
            chart
                .draw_series(std::iter::once(PathElement::new(points, BLACK.stroke_width(1))))
                .map_err(|e| ChartError::Draw(e.to_string()))?;
        }
    }

    if let Some((min, max)) = range {
        draw_colorbar(&legend_area, min, max, config)?;
    }
    Ok(())
}

/// Expand the bounding box so the map keeps its aspect ratio in the
/// drawing area, plus a small margin.
fn padded_ranges<DB: DrawingBackend>(
    bbox: ([f64; 2], [f64; 2]),
    area: &DrawingArea<DB, Shift>,
) -> ((f64, f64), (f64, f64)) {
    let ([min_x, min_y], [max_x, max_y]) = bbox;
    let pad_x = ((max_x - min_x) * 0.03).max(1e-9);
    let pad_y = ((max_y - min_y) * 0.03).max(1e-9);
    let (mut min_x, mut max_x) = (min_x - pad_x, max_x + pad_x);
    let (mut min_y, mut max_y) = (min_y - pad_y, max_y + pad_y);

    let (pw, ph) = area.dim_in_pixel();
    if pw > 0 && ph > 0 {
        let span_x = max_x - min_x;
        let span_y = max_y - min_y;
        let target = pw as f64 / ph as f64;
        if span_x / span_y > target {
            // Too wide: grow the y span around its center.
            let grow = (span_x / target - span_y) / 2.0;
            min_y -= grow;
            max_y += grow;
        } else {
            let grow = (span_y * target - span_x) / 2.0;
            min_x -= grow;
            max_x += grow;
        }
    }
    ((min_x, min_y), (max_x, max_y))
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    min: f64,
    max: f64,
    config: &RenderConfig,
) -> Result<(), ChartError> {
    let (_, lh) = area.dim_in_pixel();
    let (bar_x0, bar_x1) = (20i32, 48i32);
    let top = 40i32;
    let bottom = (lh as i32 - 40).max(top + 1);
    let steps = bottom - top;

    for i in 0..steps {
        let t = 1.0 - i as f64 / (steps - 1).max(1) as f64;
        let (r, g, b) = ramp_color(t);
        area.draw(&Rectangle::new(
            [(bar_x0, top + i), (bar_x1, top + i + 1)],
            RGBColor(r, g, b).filled(),
        ))
        .map_err(|e| ChartError::Draw(e.to_string()))?;
    }
    area.draw(&Rectangle::new(
        [(bar_x0, top), (bar_x1, bottom)],
        BLACK.stroke_width(1),
    ))
    .map_err(|e| ChartError::Draw(e.to_string()))?;

    let font = ("sans-serif", (config.font_size as f64 - 2.0).max(8.0))
        .into_font()
        .color(&BLACK);
    area.draw(&Text::new(format_value(max), (bar_x1 + 6, top - 6), font.clone()))
        .map_err(|e| ChartError::Draw(e.to_string()))?;
    area.draw(&Text::new(format_value(min), (bar_x1 + 6, bottom - 6), font))
        .map_err(|e| ChartError::Draw(e.to_string()))?;
    Ok(())
}

fn format_value(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_endpoints_hit_the_stops() {
        assert_eq!(ramp_color(0.0), RAMP[0]);
        assert_eq!(ramp_color(1.0), RAMP[RAMP.len() - 1]);
        assert_eq!(ramp_color(-2.0), RAMP[0]);
        assert_eq!(ramp_color(5.0), RAMP[RAMP.len() - 1]);
    }

    #[test]
    fn value_normalization_spans_the_range() {
        assert_eq!(value_to_t(41000.0, 41000.0, 61000.0), 0.0);
        assert_eq!(value_to_t(61000.0, 41000.0, 61000.0), 1.0);
        assert_eq!(value_to_t(51000.0, 41000.0, 61000.0), 0.5);
    }

    #[test]
    fn degenerate_range_maps_to_midpoint() {
        assert_eq!(value_to_t(47000.0, 47000.0, 47000.0), 0.5);
        assert_eq!(value_to_t(1.0, f64::NAN, f64::NAN), 0.5);
    }

    #[test]
    fn value_formatting_is_compact() {
        assert_eq!(format_value(41000.0), "41000");
        assert_eq!(format_value(62.35), "62.3");
    }
}
