//! Data module - dataset loading and tabular extraction

mod loader;
mod table;

pub use loader::{DatasetLoader, LoaderError};
pub use table::{
    demographic_bars, variable_values, BarSeries, DemographicBars, DistrictValue, TableError,
    Variable,
};
