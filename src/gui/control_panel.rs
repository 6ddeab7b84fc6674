//! Control Panel Widget
//! Left side panel with data sources, view selection and the state/variable
//! dropdowns.

use crate::data::Variable;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Which of the two views is shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Bars,
    Map,
}

/// Current user selection driving both views.
#[derive(Clone)]
pub struct Selection {
    pub csv_path: Option<PathBuf>,
    pub shape_path: Option<PathBuf>,
    pub view: ViewMode,
    pub state: String,
    pub stacked: bool,
    pub variable: Variable,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            csv_path: None,
            shape_path: None,
            view: ViewMode::default(),
            state: String::new(),
            stacked: false,
            variable: Variable::PersonalIncome,
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub selection: Selection,
    pub states: Vec<String>,
    pub csv_loaded: bool,
    pub shapes_loaded: bool,
    pub progress: f32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            states: Vec::new(),
            csv_loaded: false,
            shapes_loaded: false,
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the state dropdown after a dataset load. Texas is the landing
    /// selection when present.
    pub fn update_states(&mut self, states: Vec<String>) {
        self.states = states;
        let current_ok = self.states.iter().any(|s| *s == self.selection.state);
        if !current_ok {
            self.selection.state = self
                .states
                .iter()
                .find(|s| *s == "Texas")
                .or_else(|| self.states.first())
                .cloned()
                .unwrap_or_default();
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🗺 District Lens")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Socio-economic district explorer")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Sources Section =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        self.file_row(ui, "Dataset CSV", true, &mut action);
        ui.add_space(5.0);
        self.file_row(ui, "District shapefile", false, &mut action);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Section =====
        ui.label(RichText::new("👁 View").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.radio_value(&mut self.selection.view, ViewMode::Bars, "Bar chart");
            ui.radio_value(&mut self.selection.view, ViewMode::Map, "Choropleth map");
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(RichText::new("🔧 Selection").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 170.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("State:"));
            ComboBox::from_id_salt("state")
                .width(combo_width)
                .selected_text(&self.selection.state)
                .show_ui(ui, |ui| {
                    for state in &self.states {
                        if ui
                            .selectable_label(self.selection.state == *state, state)
                            .clicked()
                        {
                            self.selection.state = state.clone();
                        }
                    }
                });
        });

        ui.add_space(5.0);

        match self.selection.view {
            ViewMode::Bars => {
                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Layout:"));
                    ui.checkbox(&mut self.selection.stacked, "Stacked");
                });
            }
            ViewMode::Map => {
                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Variable:"));
                    ComboBox::from_id_salt("variable")
                        .width(combo_width)
                        .selected_text(self.selection.variable.label())
                        .show_ui(ui, |ui| {
                            for variable in Variable::ALL {
                                if ui
                                    .selectable_label(
                                        self.selection.variable == variable,
                                        variable.label(),
                                    )
                                    .clicked()
                                {
                                    self.selection.variable = variable;
                                }
                            }
                        });
                });
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled(), |ui| {
                let button = egui::Button::new(RichText::new("💾 Export PNG").size(14.0))
                    .min_size(egui::vec2(160.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn file_row(
        &mut self,
        ui: &mut egui::Ui,
        label: &str,
        is_csv: bool,
        action: &mut ControlPanelAction,
    ) {
        let path = if is_csv {
            &self.selection.csv_path
        } else {
            &self.selection.shape_path
        };
        let path_text = path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("{}: none", label));

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            *action = if is_csv {
                                ControlPanelAction::BrowseCsv
                            } else {
                                ControlPanelAction::BrowseShapes
                            };
                        }
                    });
                });
            });
    }

    fn export_enabled(&self) -> bool {
        match self.selection.view {
            ViewMode::Bars => self.csv_loaded,
            ViewMode::Map => self.csv_loaded && self.shapes_loaded,
        }
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    BrowseShapes,
    ExportPng,
}
