//! Charts module - interactive plots and static rendering

mod bars;
mod choropleth;
mod export;

pub use bars::draw_demographic_bars;
pub use choropleth::{render_choropleth, ChartError};
pub use export::{export_bar_chart, export_choropleth};
