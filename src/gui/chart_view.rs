//! Chart View Widget
//! Central panel wrapper around the interactive demographic bar chart.

use crate::charts;
use crate::data::DemographicBars;
use egui::RichText;

pub struct ChartView;

impl Default for ChartView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartView {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, ui: &mut egui::Ui, bars: Option<&DemographicBars>, stacked: bool) {
        let Some(bars) = bars.filter(|b| !b.is_empty()) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        // Same titles the two bar variants carry in the analysis write-up.
        let title = if stacked {
            "White, Black and Asian percentages"
        } else {
            "White, Black, Asian and Hispanic percentages"
        };

        ui.vertical(|ui| {
            ui.label(
                RichText::new(format!("{} - {}", bars.state, title))
                    .size(16.0)
                    .strong(),
            );
            ui.add_space(6.0);
            charts::draw_demographic_bars(ui, bars, stacked);
        });
    }
}
