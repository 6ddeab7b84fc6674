//! Tabular Extraction Module
//! Per-state filtering and column selection feeding both chart views.

use polars::prelude::*;
use std::fmt;
use thiserror::Error;

/// Documented dataset schema, minus the dropped row-index column.
pub const REQUIRED_COLUMNS: [&str; 21] = [
    "year",
    "office",
    "state",
    "state_po",
    "district",
    "win_party",
    "win_ratio",
    "win_R",
    "white",
    "black",
    "asian",
    "hispanic",
    "male",
    "female",
    "age_18_55",
    "age_55_plus",
    "interM",
    "domesM",
    "farm_E_I",
    "nonfarm_E",
    "personal",
];

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// The ten socio-economic variables selectable on the map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    White,
    Black,
    Asian,
    Hispanic,
    Female,
    Age18To55,
    Age55Plus,
    InterMigration,
    FarmEmployment,
    PersonalIncome,
}

impl Variable {
    pub const ALL: [Variable; 10] = [
        Variable::White,
        Variable::Black,
        Variable::Asian,
        Variable::Hispanic,
        Variable::Female,
        Variable::Age18To55,
        Variable::Age55Plus,
        Variable::InterMigration,
        Variable::FarmEmployment,
        Variable::PersonalIncome,
    ];

    /// Dataset column backing this variable.
    pub fn column(&self) -> &'static str {
        match self {
            Variable::White => "white",
            Variable::Black => "black",
            Variable::Asian => "asian",
            Variable::Hispanic => "hispanic",
            Variable::Female => "female",
            Variable::Age18To55 => "age_18_55",
            Variable::Age55Plus => "age_55_plus",
            Variable::InterMigration => "interM",
            Variable::FarmEmployment => "farm_E_I",
            Variable::PersonalIncome => "personal",
        }
    }

    /// Human-readable label for dropdowns and legends.
    pub fn label(&self) -> &'static str {
        match self {
            Variable::White => "White %",
            Variable::Black => "Black %",
            Variable::Asian => "Asian %",
            Variable::Hispanic => "Hispanic %",
            Variable::Female => "Female %",
            Variable::Age18To55 => "Age 18-55 %",
            Variable::Age55Plus => "Age 55+ %",
            Variable::InterMigration => "International migration",
            Variable::FarmEmployment => "Farm employment",
            Variable::PersonalIncome => "Personal income",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Values of one race/ethnicity field across the districts of a state.
#[derive(Debug, Clone)]
pub struct BarSeries {
    pub variable: Variable,
    pub values: Vec<f64>,
}

/// Bar-chart input: one bar group (or stack) per district, in dataset order.
#[derive(Debug, Clone)]
pub struct DemographicBars {
    pub state: String,
    pub districts: Vec<i64>,
    pub series: Vec<BarSeries>,
}

impl DemographicBars {
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

/// One district's value of the selected map variable.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictValue {
    pub district: i64,
    pub value: f64,
}

/// Race/ethnicity fields per bar-chart variant. Hispanic only appears in the
/// grouped (unstacked) chart.
pub fn race_fields(stacked: bool) -> &'static [Variable] {
    if stacked {
        &[Variable::White, Variable::Black, Variable::Asian]
    } else {
        &[
            Variable::White,
            Variable::Black,
            Variable::Asian,
            Variable::Hispanic,
        ]
    }
}

/// Build bar-chart data for all districts of `state`. An unknown state
/// yields empty districts, not an error.
pub fn demographic_bars(
    df: &DataFrame,
    state: &str,
    stacked: bool,
) -> Result<DemographicBars, TableError> {
    let dfstate = filter_state(df, state)?;
    let districts = district_numbers(&dfstate)?;

    let fields = race_fields(stacked);
    let mut series = Vec::with_capacity(fields.len());
    for variable in fields {
        series.push(BarSeries {
            variable: *variable,
            values: column_values(&dfstate, variable.column())?,
        });
    }

    Ok(DemographicBars {
        state: state.to_string(),
        districts,
        series,
    })
}

/// Per-district values of `variable` within `state`, in dataset order.
/// Rows with a null value are skipped.
pub fn variable_values(
    df: &DataFrame,
    state: &str,
    variable: Variable,
) -> Result<Vec<DistrictValue>, TableError> {
    let dfstate = filter_state(df, state)?;
    let districts = district_numbers(&dfstate)?;
    let values = column_values(&dfstate, variable.column())?;

    Ok(districts
        .into_iter()
        .zip(values)
        .filter(|(_, value)| !value.is_nan())
        .map(|(district, value)| DistrictValue { district, value })
        .collect())
}

fn filter_state(df: &DataFrame, state: &str) -> Result<DataFrame, TableError> {
    let dfstate = df
        .clone()
        .lazy()
        .filter(
            col("state")
                .eq(lit(state))
                .and(col("district").is_not_null()),
        )
        .collect()?;
    Ok(dfstate)
}

fn district_numbers(df: &DataFrame) -> Result<Vec<i64>, TableError> {
    let column = df.column("district")?.cast(&DataType::Int64)?;
    let ca = column.i64()?;
    Ok((0..df.height()).map(|i| ca.get(i).unwrap_or(0)).collect())
}

/// Column values cast to f64, positionally aligned with the frame; nulls
/// come back as NaN so row order is preserved.
fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, TableError> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let ca = column.f64()?;
    Ok((0..df.height())
        .map(|i| ca.get(i).unwrap_or(f64::NAN))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample_df() -> DataFrame {
        df!(
            "state" => &["Texas", "Texas", "Texas", "Montana", "Virginia"],
            "district" => &[1i64, 2, 3, 1, 1],
            "white" => &[45.0f64, 60.0, 70.5, 88.0, 62.0],
            "black" => &[12.0f64, 20.0, 8.0, 0.5, 19.0],
            "asian" => &[5.0f64, 3.5, 4.0, 0.7, 6.0],
            "hispanic" => &[35.0f64, 14.0, 15.0, 3.9, 9.0],
            "personal" => &[41000.0f64, 52000.0, 61000.0, 47000.0, 55000.0],
        )
        .unwrap()
    }

    #[test]
    fn grouped_bars_use_four_race_fields() {
        let bars = demographic_bars(&sample_df(), "Texas", false).unwrap();
        let fields: Vec<Variable> = bars.series.iter().map(|s| s.variable).collect();
        assert_eq!(
            fields,
            vec![
                Variable::White,
                Variable::Black,
                Variable::Asian,
                Variable::Hispanic
            ]
        );
        assert_eq!(bars.districts, vec![1, 2, 3]);
        for series in &bars.series {
            assert_eq!(series.values.len(), 3);
        }
    }

    #[test]
    fn stacked_bars_omit_hispanic() {
        let bars = demographic_bars(&sample_df(), "Texas", true).unwrap();
        let fields: Vec<Variable> = bars.series.iter().map(|s| s.variable).collect();
        assert_eq!(
            fields,
            vec![Variable::White, Variable::Black, Variable::Asian]
        );
    }

    #[test]
    fn stacked_texas_sums_stay_under_hundred() {
        let bars = demographic_bars(&sample_df(), "Texas", true).unwrap();
        for i in 0..bars.districts.len() {
            let total: f64 = bars.series.iter().map(|s| s.values[i]).sum();
            assert!(total <= 100.0, "district {} sums to {}", bars.districts[i], total);
        }
    }

    #[test]
    fn single_district_state_gets_one_bar() {
        let bars = demographic_bars(&sample_df(), "Montana", false).unwrap();
        assert_eq!(bars.districts, vec![1]);
        assert_eq!(bars.series[0].values, vec![88.0]);
    }

    #[test]
    fn unknown_state_is_empty_not_error() {
        let bars = demographic_bars(&sample_df(), "Atlantis", false).unwrap();
        assert!(bars.is_empty());
        assert!(bars.series.iter().all(|s| s.values.is_empty()));

        let values = variable_values(&sample_df(), "Atlantis", Variable::PersonalIncome).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn personal_income_values_match_dataset() {
        let values = variable_values(&sample_df(), "Texas", Variable::PersonalIncome).unwrap();
        assert_eq!(
            values,
            vec![
                DistrictValue { district: 1, value: 41000.0 },
                DistrictValue { district: 2, value: 52000.0 },
                DistrictValue { district: 3, value: 61000.0 },
            ]
        );
    }

    #[test]
    fn every_variable_maps_to_a_schema_column() {
        for variable in Variable::ALL {
            assert!(REQUIRED_COLUMNS.contains(&variable.column()));
        }
    }
}
