//! Bar Chart Module
//! Interactive grouped/stacked demographic bars using egui_plot.

use crate::data::{DemographicBars, Variable};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot};

/// Color palette, one slot per socio-economic variable.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue - white
    Color32::from_rgb(231, 76, 60),   // Red - black
    Color32::from_rgb(46, 204, 113),  // Green - asian
    Color32::from_rgb(155, 89, 182),  // Purple - hispanic
    Color32::from_rgb(243, 156, 18),  // Orange - female
    Color32::from_rgb(26, 188, 156),  // Teal - age 18-55
    Color32::from_rgb(233, 30, 99),   // Pink - age 55+
    Color32::from_rgb(0, 188, 212),   // Cyan - interM
    Color32::from_rgb(121, 85, 72),   // Brown - farm
    Color32::from_rgb(96, 125, 139),  // Blue Grey - personal
];

/// Stable color per variable, shared by the interactive and exported charts.
pub fn variable_color(variable: Variable) -> Color32 {
    let index = Variable::ALL
        .iter()
        .position(|v| *v == variable)
        .unwrap_or(0);
    PALETTE[index % PALETTE.len()]
}

pub fn variable_rgb(variable: Variable) -> (u8, u8, u8) {
    let color = variable_color(variable);
    (color.r(), color.g(), color.b())
}

/// Draw one bar group (grouped) or one stack (stacked) per district.
/// X-axis: districts, Y-axis: percentage.
pub fn draw_demographic_bars(ui: &mut egui::Ui, bars: &DemographicBars, stacked: bool) {
    let district_labels: Vec<String> = bars.districts.iter().map(|d| d.to_string()).collect();
    let group_count = bars.series.len().max(1);

    let mut charts: Vec<BarChart> = Vec::new();
    for (series_idx, series) in bars.series.iter().enumerate() {
        let elems: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(district_idx, &value)| {
                let (x, width) = if stacked {
                    (district_idx as f64, 0.6)
                } else {
                    let width = 0.8 / group_count as f64;
                    let offset =
                        (series_idx as f64 - (group_count as f64 - 1.0) / 2.0) * width;
                    (district_idx as f64 + offset, width)
                };
                Bar::new(x, value).width(width)
            })
            .collect();

        let mut chart = BarChart::new(elems)
            .color(variable_color(series.variable))
            .name(series.variable.label());
        if stacked {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart = chart.stack_on(&below);
        }
        charts.push(chart);
    }

    Plot::new(format!("demographic_bars_{}", bars.state))
        .legend(Legend::default())
        .x_axis_label("District")
        .y_axis_label("Percentage")
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if (mark.value - idx as f64).abs() < 1e-6 && idx < district_labels.len() {
                district_labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
