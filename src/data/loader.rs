//! Dataset Loader Module
//! Handles loading of the per-district socio-economic CSV using Polars.

use crate::data::table::REQUIRED_COLUMNS;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Holds the socio-economic dataset. One row per (state, district, year);
/// the frame is read-only after load.
pub struct DatasetLoader {
    df: Option<DataFrame>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Read the dataset CSV: drop the exported row-index column, then check
    /// that every expected column is present.
    pub fn read_csv(file_path: &str) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let df = Self::drop_index_columns(df);
        Self::validate_columns(&df)?;
        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        tracing::info!(
            path = file_path,
            rows = df.height(),
            columns = df.width(),
            "dataset loaded"
        );
        Ok(df)
    }

    /// Drop the unnamed row-index column pandas-style exports carry.
    fn drop_index_columns(df: DataFrame) -> DataFrame {
        let index_cols: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name.is_empty() || name.starts_with("Unnamed"))
            .collect();
        if index_cols.is_empty() {
            df
        } else {
            df.drop_many(index_cols)
        }
    }

    /// Every column of the documented schema must exist; charts select from
    /// them by name.
    fn validate_columns(df: &DataFrame) -> Result<(), LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// Distinct state names, sorted for the dropdown.
    pub fn unique_states(df: &DataFrame) -> Vec<String> {
        df.column("state")
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut states: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                states.sort();
                states
            })
            .unwrap_or_default()
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn frame_with(names: &[&str]) -> DataFrame {
        let cols: Vec<Column> = names
            .iter()
            .map(|name| Column::new((*name).into(), &[1.0f64]))
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn full_schema_validates() {
        let df = frame_with(&REQUIRED_COLUMNS);
        assert!(DatasetLoader::validate_columns(&df).is_ok());
    }

    #[test]
    fn missing_column_is_named() {
        let names: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|&name| name != "white")
            .collect();
        let df = frame_with(&names);
        match DatasetLoader::validate_columns(&df) {
            Err(LoaderError::MissingColumn(name)) => assert_eq!(name, "white"),
            other => panic!("expected MissingColumn, got {:?}", other.err()),
        }
    }

    #[test]
    fn index_column_is_dropped() {
        let df = frame_with(&["Unnamed: 0", "state", "district"]);
        let df = DatasetLoader::drop_index_columns(df);
        assert!(df.column("Unnamed: 0").is_err());
        assert!(df.column("state").is_ok());
    }

    #[test]
    fn header_only_csv_is_rejected() {
        let path = std::env::temp_dir().join("district_lens_header_only.csv");
        std::fs::write(&path, format!("{}\n", REQUIRED_COLUMNS.join(","))).unwrap();
        let result = DatasetLoader::read_csv(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(LoaderError::NoData)));
    }

    #[test]
    fn states_are_sorted_and_deduped() {
        let df = df!(
            "state" => &["Texas", "Montana", "Texas", "Virginia"],
        )
        .unwrap();
        let states = DatasetLoader::unique_states(&df);
        assert_eq!(states, vec!["Montana", "Texas", "Virginia"]);
    }
}
