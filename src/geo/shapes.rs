//! Shapefile Loader Module
//! Reads district boundary polygons and their attribute table.

use shapefile::dbase::FieldValue;
use thiserror::Error;

/// Attribute carrying the state name in the district shapefile.
const STATE_FIELD: &str = "STATENAME";
/// Attribute carrying the district number.
const DISTRICT_FIELD: &str = "DISTRICT";

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Failed to read shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),
    #[error("Feature {index} has no '{name}' attribute")]
    MissingAttribute { index: usize, name: &'static str },
    #[error("Feature {index} has unusable '{name}' value '{value}'")]
    BadAttribute {
        index: usize,
        name: &'static str,
        value: String,
    },
}

/// One polygon ring in map coordinates. Holes are filled back in with the
/// background color when rendering.
#[derive(Debug, Clone)]
pub struct Ring {
    pub points: Vec<[f64; 2]>,
    pub hole: bool,
}

/// One district boundary from the shapefile.
#[derive(Debug, Clone)]
pub struct DistrictShape {
    pub state: String,
    pub district: i64,
    pub rings: Vec<Ring>,
}

/// Read every district boundary with its state name and district number.
pub fn read_district_shapes(file_path: &str) -> Result<Vec<DistrictShape>, GeoError> {
    let mut reader = shapefile::Reader::from_path(file_path)?;
    let mut shapes = Vec::new();

    for (index, result) in reader
        .iter_shapes_and_records_as::<shapefile::Polygon, shapefile::dbase::Record>()
        .enumerate()
    {
        let (polygon, record) = result?;
        let state = string_attribute(&record, index, STATE_FIELD)?;
        let district = district_attribute(&record, index)?;

        let rings = polygon
            .rings()
            .iter()
            .map(|ring| Ring {
                points: ring.points().iter().map(|p| [p.x, p.y]).collect(),
                hole: matches!(ring, shapefile::PolygonRing::Inner(_)),
            })
            .collect();

        shapes.push(DistrictShape {
            state,
            district,
            rings,
        });
    }

    tracing::info!(path = file_path, features = shapes.len(), "shapefile loaded");
    Ok(shapes)
}

fn string_attribute(
    record: &shapefile::dbase::Record,
    index: usize,
    name: &'static str,
) -> Result<String, GeoError> {
    match record.get(name) {
        Some(FieldValue::Character(Some(value))) => Ok(value.trim().to_string()),
        Some(FieldValue::Character(None)) | None => {
            Err(GeoError::MissingAttribute { index, name })
        }
        Some(other) => Err(GeoError::BadAttribute {
            index,
            name,
            value: format!("{:?}", other),
        }),
    }
}

/// The district number is stored as text in some vintages and numeric in
/// others; accept both.
fn district_attribute(record: &shapefile::dbase::Record, index: usize) -> Result<i64, GeoError> {
    let name = DISTRICT_FIELD;
    match record.get(name) {
        Some(FieldValue::Character(Some(value))) => {
            value.trim().parse::<i64>().map_err(|_| GeoError::BadAttribute {
                index,
                name,
                value: value.clone(),
            })
        }
        Some(FieldValue::Numeric(Some(value))) => Ok(*value as i64),
        Some(FieldValue::Integer(value)) => Ok(*value as i64),
        Some(FieldValue::Float(Some(value))) => Ok(*value as i64),
        None
        | Some(FieldValue::Character(None))
        | Some(FieldValue::Numeric(None))
        | Some(FieldValue::Float(None)) => Err(GeoError::MissingAttribute { index, name }),
        Some(other) => Err(GeoError::BadAttribute {
            index,
            name,
            value: format!("{:?}", other),
        }),
    }
}

/// Holds the loaded boundary table. Read-only after load, like the dataset.
pub struct ShapeLoader {
    shapes: Option<Vec<DistrictShape>>,
}

impl Default for ShapeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeLoader {
    pub fn new() -> Self {
        Self { shapes: None }
    }

    /// Boundaries of a state's districts, in shapefile order. Unknown
    /// states come back empty.
    pub fn shapes_for_state(&self, state: &str) -> Vec<DistrictShape> {
        self.shapes
            .as_ref()
            .map(|shapes| {
                shapes
                    .iter()
                    .filter(|shape| shape.state == state)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set shapes directly (used for async loading)
    pub fn set_shapes(&mut self, shapes: Vec<DistrictShape>) {
        self.shapes = Some(shapes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(state: &str, district: i64, origin: f64) -> DistrictShape {
        DistrictShape {
            state: state.to_string(),
            district,
            rings: vec![Ring {
                points: vec![
                    [origin, 0.0],
                    [origin + 1.0, 0.0],
                    [origin + 1.0, 1.0],
                    [origin, 1.0],
                    [origin, 0.0],
                ],
                hole: false,
            }],
        }
    }

    #[test]
    fn state_filter_keeps_shapefile_order() {
        let mut loader = ShapeLoader::new();
        loader.set_shapes(vec![
            square("Texas", 3, 0.0),
            square("Montana", 1, 5.0),
            square("Texas", 1, 2.0),
        ]);

        let texas = loader.shapes_for_state("Texas");
        assert_eq!(texas.len(), 2);
        assert_eq!(texas[0].district, 3);
        assert_eq!(texas[1].district, 1);
    }

    #[test]
    fn unknown_state_has_no_shapes() {
        let mut loader = ShapeLoader::new();
        loader.set_shapes(vec![square("Texas", 1, 0.0)]);
        assert!(loader.shapes_for_state("Atlantis").is_empty());
    }
}
