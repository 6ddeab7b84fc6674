//! Static Export Module
//! Writes the current view to a PNG with plotters' bitmap backend.

use crate::charts::bars::variable_rgb;
use crate::charts::choropleth::{draw_choropleth, ChartError};
use crate::config::RenderConfig;
use crate::data::DemographicBars;
use crate::geo::ChoroplethRegion;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

/// Export the bar chart for one state. Same grouped/stacked layout as the
/// interactive view.
pub fn export_bar_chart(
    path: &Path,
    bars: &DemographicBars,
    stacked: bool,
    title: &str,
    config: &RenderConfig,
) -> Result<()> {
    render_bar_png(path, bars, stacked, title, config)
        .with_context(|| format!("failed to export {}", path.display()))?;
    tracing::info!(path = %path.display(), "bar chart exported");
    Ok(())
}

fn render_bar_png(
    path: &Path,
    bars: &DemographicBars,
    stacked: bool,
    title: &str,
    config: &RenderConfig,
) -> Result<(), ChartError> {
    let size = (config.figure_width.max(200), config.figure_height.max(200));
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| ChartError::Draw(e.to_string()))?;

    let n = bars.districts.len();
    let y_max = bar_y_max(bars, stacked);
    let district_labels: Vec<String> = bars.districts.iter().map(|d| d.to_string()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", config.font_size as f64).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5).max(0.5), 0.0f64..y_max)
        .map_err(|e| ChartError::Draw(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.max(1))
        .x_label_formatter(&|x| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < district_labels.len() {
                district_labels[idx as usize].clone()
            } else {
                String::new()
            }
        })
        .x_desc("District")
        .y_desc("Percentage")
        .label_style(("sans-serif", (config.font_size as f64 - 3.0).max(8.0)).into_font())
        .draw()
        .map_err(|e| ChartError::Draw(e.to_string()))?;

    let group_count = bars.series.len().max(1);
    let mut stack_base = vec![0.0f64; n];

    for (series_idx, series) in bars.series.iter().enumerate() {
        let (r, g, b) = variable_rgb(series.variable);
        let color = RGBColor(r, g, b);

        let rects: Vec<Rectangle<(f64, f64)>> = series
            .values
            .iter()
            .enumerate()
            .map(|(district_idx, &value)| {
                let (x0, x1, y0, y1) = if stacked {
                    let base = stack_base[district_idx];
                    stack_base[district_idx] += value;
                    let x = district_idx as f64;
                    (x - 0.3, x + 0.3, base, base + value)
                } else {
                    let width = 0.8 / group_count as f64;
                    let x0 = district_idx as f64 - 0.4 + series_idx as f64 * width;
                    (x0, x0 + width, 0.0, value)
                };
                Rectangle::new([(x0, y0), (x1, y1)], color.filled())
            })
            .collect();

        chart
            .draw_series(rects)
            .map_err(|e| ChartError::Draw(e.to_string()))?
            .label(series.variable.label())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(|e| ChartError::Draw(e.to_string()))?;

    root.present().map_err(|e| ChartError::Draw(e.to_string()))?;
    Ok(())
}

/// Export the choropleth for one (state, variable) pair.
pub fn export_choropleth(
    path: &Path,
    regions: &[ChoroplethRegion],
    title: &str,
    config: &RenderConfig,
) -> Result<()> {
    let size = (config.figure_width.max(200), config.figure_height.max(200));
    let render = || -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_choropleth(&root, regions, title, config)?;
        root.present().map_err(|e| ChartError::Draw(e.to_string()))
    };
    render().with_context(|| format!("failed to export {}", path.display()))?;
    tracing::info!(path = %path.display(), "choropleth exported");
    Ok(())
}

/// Headroom above the tallest bar (or stack) so bars never touch the frame.
fn bar_y_max(bars: &DemographicBars, stacked: bool) -> f64 {
    let n = bars.districts.len();
    let max = if stacked {
        (0..n)
            .map(|i| bars.series.iter().map(|s| s.values[i]).sum::<f64>())
            .fold(0.0f64, f64::max)
    } else {
        bars.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0f64, f64::max)
    };
    if max > 0.0 {
        max * 1.1
    } else {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BarSeries, Variable};

    fn bars() -> DemographicBars {
        DemographicBars {
            state: "Texas".to_string(),
            districts: vec![1, 2],
            series: vec![
                BarSeries {
                    variable: Variable::White,
                    values: vec![45.0, 60.0],
                },
                BarSeries {
                    variable: Variable::Black,
                    values: vec![12.0, 20.0],
                },
            ],
        }
    }

    #[test]
    fn grouped_headroom_tracks_tallest_bar() {
        let y_max = bar_y_max(&bars(), false);
        assert!((y_max - 66.0).abs() < 1e-9);
    }

    #[test]
    fn stacked_headroom_tracks_tallest_stack() {
        let y_max = bar_y_max(&bars(), true);
        assert!((y_max - 88.0).abs() < 1e-9);
    }

    #[test]
    fn export_failure_names_the_target() {
        let path = Path::new("/nonexistent-dir/texas_bars.png");
        let err = export_bar_chart(path, &bars(), false, "Texas", &RenderConfig::default())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("texas_bars.png"));
    }

    #[test]
    fn empty_chart_still_gets_a_frame() {
        let empty = DemographicBars {
            state: "Atlantis".to_string(),
            districts: Vec::new(),
            series: Vec::new(),
        };
        assert_eq!(bar_y_max(&empty, false), 100.0);
    }
}
