//! GUI module - User interface components

mod app;
mod chart_view;
mod control_panel;
mod map_view;

pub use app::DistrictLensApp;
pub use chart_view::ChartView;
pub use control_panel::{ControlPanel, ControlPanelAction, Selection, ViewMode};
pub use map_view::MapView;
