//! District Lens Main Application
//! Main window wiring the control panel to the bar-chart and map views.

use crate::charts;
use crate::config::RenderConfig;
use crate::data::{self, DatasetLoader, DemographicBars};
use crate::geo::{self, DistrictShape, ShapeLoader};
use crate::gui::map_view::MapKey;
use crate::gui::{ChartView, ControlPanel, ControlPanelAction, MapView, ViewMode};
use egui::SidePanel;
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Bar data for one state, both layouts, precomputed after load.
pub struct StateBars {
    pub grouped: DemographicBars,
    pub stacked: DemographicBars,
}

/// Dataset loading result from background thread
enum CsvLoadResult {
    Progress(f32, String),
    Complete {
        df: DataFrame,
        states: Vec<String>,
        bars: HashMap<String, StateBars>,
        row_count: usize,
    },
    Error(String),
}

/// Shapefile loading result from background thread
enum ShapeLoadResult {
    Complete(Vec<DistrictShape>),
    Error(String),
}

/// Main application window.
pub struct DistrictLensApp {
    loader: DatasetLoader,
    shape_loader: ShapeLoader,
    control_panel: ControlPanel,
    chart_view: ChartView,
    map_view: MapView,
    render_config: RenderConfig,

    /// Per-state bar data, rebuilt on every dataset load.
    bars_cache: HashMap<String, StateBars>,
    /// Bumped on every load so cached map textures invalidate.
    data_rev: u64,

    csv_rx: Option<Receiver<CsvLoadResult>>,
    shape_rx: Option<Receiver<ShapeLoadResult>>,
    is_loading_csv: bool,
    is_loading_shapes: bool,
}

impl DistrictLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, render_config: RenderConfig) -> Self {
        Self {
            loader: DatasetLoader::new(),
            shape_loader: ShapeLoader::new(),
            control_panel: ControlPanel::new(),
            chart_view: ChartView::new(),
            map_view: MapView::new(),
            render_config,
            bars_cache: HashMap::new(),
            data_rev: 0,
            csv_rx: None,
            shape_rx: None,
            is_loading_csv: false,
            is_loading_shapes: false,
        }
    }

    /// Handle dataset CSV selection - loads in a background thread.
    fn handle_browse_csv(&mut self) {
        if self.is_loading_csv {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.selection.csv_path = Some(path.clone());
            self.control_panel.set_progress(0.0, "Loading dataset...");
            self.is_loading_csv = true;

            let (tx, rx) = channel();
            self.csv_rx = Some(rx);

            thread::spawn(move || Self::run_csv_load(tx, path));
        }
    }

    /// Read the CSV, then precompute bar data for every state in parallel
    /// (called from background thread).
    fn run_csv_load(tx: Sender<CsvLoadResult>, path: PathBuf) {
        let _ = tx.send(CsvLoadResult::Progress(
            10.0,
            "Reading CSV file...".to_string(),
        ));

        let path_str = path.to_string_lossy().to_string();
        let df = match DatasetLoader::read_csv(&path_str) {
            Ok(df) => df,
            Err(e) => {
                let _ = tx.send(CsvLoadResult::Error(e.to_string()));
                return;
            }
        };

        let states = DatasetLoader::unique_states(&df);
        let _ = tx.send(CsvLoadResult::Progress(
            50.0,
            format!("Preparing charts for {} states...", states.len()),
        ));

        let bars: HashMap<String, StateBars> = states
            .par_iter()
            .filter_map(|state| {
                let grouped = data::demographic_bars(&df, state, false).ok()?;
                let stacked = data::demographic_bars(&df, state, true).ok()?;
                Some((state.clone(), StateBars { grouped, stacked }))
            })
            .collect();

        let row_count = df.height();
        let _ = tx.send(CsvLoadResult::Complete {
            df,
            states,
            bars,
            row_count,
        });
    }

    /// Check for dataset loading results
    fn check_csv_results(&mut self) {
        let rx = self.csv_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    CsvLoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    CsvLoadResult::Complete {
                        df,
                        states,
                        bars,
                        row_count,
                    } => {
                        let state_count = states.len();
                        self.loader.set_dataframe(df);
                        self.bars_cache = bars;
                        self.control_panel.update_states(states);
                        self.control_panel.csv_loaded = true;
                        self.data_rev += 1;
                        self.map_view.clear();
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Loaded {} districts across {} states", row_count, state_count),
                        );
                        self.is_loading_csv = false;
                        should_keep_receiver = false;
                    }
                    CsvLoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading_csv = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.csv_rx = Some(rx);
            }
        }
    }

    /// Handle shapefile selection - loads in a background thread.
    fn handle_browse_shapes(&mut self) {
        if self.is_loading_shapes {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Shapefiles", &["shp"])
            .pick_file()
        {
            self.control_panel.selection.shape_path = Some(path.clone());
            self.control_panel
                .set_progress(0.0, "Loading district boundaries...");
            self.is_loading_shapes = true;

            let (tx, rx) = channel();
            self.shape_rx = Some(rx);

            thread::spawn(move || {
                let path_str = path.to_string_lossy().to_string();
                match geo::read_district_shapes(&path_str) {
                    Ok(shapes) => {
                        let _ = tx.send(ShapeLoadResult::Complete(shapes));
                    }
                    Err(e) => {
                        let _ = tx.send(ShapeLoadResult::Error(e.to_string()));
                    }
                }
            });
        }
    }

    /// Check for shapefile loading results
    fn check_shape_results(&mut self) {
        let rx = self.shape_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    ShapeLoadResult::Complete(shapes) => {
                        let count = shapes.len();
                        self.shape_loader.set_shapes(shapes);
                        self.control_panel.shapes_loaded = true;
                        self.data_rev += 1;
                        self.map_view.clear();
                        self.control_panel
                            .set_progress(100.0, &format!("Loaded {} district boundaries", count));
                        self.is_loading_shapes = false;
                        should_keep_receiver = false;
                    }
                    ShapeLoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading_shapes = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.shape_rx = Some(rx);
            }
        }
    }

    /// Filter, join and render the choropleth for the current selection.
    fn build_regions(&self) -> Option<Vec<geo::ChoroplethRegion>> {
        let df = self.loader.get_dataframe()?;
        let selection = &self.control_panel.selection;

        let values = match data::variable_values(df, &selection.state, selection.variable) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "variable extraction failed");
                return None;
            }
        };
        let shapes = self.shape_loader.shapes_for_state(&selection.state);
        Some(geo::join_by_district(&shapes, &values))
    }

    fn map_title(&self) -> String {
        let selection = &self.control_panel.selection;
        format!("{} - {}", selection.state, selection.variable.label())
    }

    /// Re-render the map texture when the selection or data changed.
    fn ensure_map_texture(&mut self, ctx: &egui::Context) {
        if !(self.control_panel.csv_loaded && self.control_panel.shapes_loaded) {
            return;
        }
        let selection = self.control_panel.selection.clone();
        let key: MapKey = (self.data_rev, selection.state.clone(), selection.variable);
        if !self.map_view.needs_render(&key) {
            return;
        }

        let Some(regions) = self.build_regions() else {
            return;
        };
        match charts::render_choropleth(&regions, &self.map_title(), &self.render_config) {
            Ok(image) => self.map_view.set_image(ctx, key, image),
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Export the current view to a PNG picked via a save dialog.
    fn handle_export(&mut self) {
        let selection = self.control_panel.selection.clone();
        let default_name = match selection.view {
            ViewMode::Bars => format!(
                "{}_{}_bars.png",
                selection.state,
                if selection.stacked { "stacked" } else { "grouped" }
            ),
            ViewMode::Map => format!("{}_{}.png", selection.state, selection.variable.column()),
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&default_name)
            .save_file()
        else {
            return; // User cancelled
        };

        let result = match selection.view {
            ViewMode::Bars => {
                let Some(bars) = self.bars_for_selection() else {
                    self.control_panel.set_progress(0.0, "No chart to export");
                    return;
                };
                let title = format!("{} demographic percentages", selection.state);
                charts::export_bar_chart(
                    &path,
                    bars,
                    selection.stacked,
                    &title,
                    &self.render_config,
                )
            }
            ViewMode::Map => {
                let Some(regions) = self.build_regions() else {
                    self.control_panel.set_progress(0.0, "No map to export");
                    return;
                };
                charts::export_choropleth(&path, &regions, &self.map_title(), &self.render_config)
            }
        };

        match result {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, &format!("Exported {}", path.display()));
                let _ = open::that(&path);
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: {:#}", e));
            }
        }
    }

    fn bars_for_selection(&self) -> Option<&DemographicBars> {
        let selection = &self.control_panel.selection;
        self.bars_cache.get(&selection.state).map(|state_bars| {
            if selection.stacked {
                &state_bars.stacked
            } else {
                &state_bars.grouped
            }
        })
    }
}

impl eframe::App for DistrictLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_csv_results();
        self.check_shape_results();

        // Request repaint while loading
        if self.is_loading_csv || self.is_loading_shapes {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::BrowseShapes => self.handle_browse_shapes(),
                        ControlPanelAction::ExportPng => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - active view
        egui::CentralPanel::default().show(ctx, |ui| match self.control_panel.selection.view {
            ViewMode::Bars => {
                let stacked = self.control_panel.selection.stacked;
                self.chart_view.show(ui, self.bars_for_selection(), stacked);
            }
            ViewMode::Map => {
                self.ensure_map_texture(ctx);
                self.map_view.show(ui);
            }
        });
    }
}
