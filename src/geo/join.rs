//! District Join Module
//! Attaches record values to boundary polygons by district number.
//!
//! The join is keyed, not positional: the dataset and the shapefile are
//! independently sourced and do not promise the same district order.

use crate::data::DistrictValue;
use crate::geo::{DistrictShape, Ring};
use std::collections::HashMap;

/// One district polygon carrying the value to color it by. `None` means the
/// shapefile has a boundary the dataset has no record for; it renders in a
/// neutral fill.
#[derive(Debug, Clone)]
pub struct ChoroplethRegion {
    pub district: i64,
    pub rings: Vec<Ring>,
    pub value: Option<f64>,
}

/// Join shapes to values on the district number. Shape order is preserved;
/// value order is irrelevant.
pub fn join_by_district(
    shapes: &[DistrictShape],
    values: &[DistrictValue],
) -> Vec<ChoroplethRegion> {
    let lookup: HashMap<i64, f64> = values
        .iter()
        .map(|value| (value.district, value.value))
        .collect();

    shapes
        .iter()
        .map(|shape| {
            let value = lookup.get(&shape.district).copied();
            if value.is_none() {
                tracing::warn!(
                    state = %shape.state,
                    district = shape.district,
                    "no dataset record for district boundary"
                );
            }
            ChoroplethRegion {
                district: shape.district,
                rings: shape.rings.clone(),
                value,
            }
        })
        .collect()
}

/// Min/max of the joined values; `None` when nothing joined.
pub fn value_range(regions: &[ChoroplethRegion]) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for value in regions.iter().filter_map(|r| r.value) {
        range = Some(match range {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }
    range
}

/// Bounding box over every ring of every region.
pub fn bounds(regions: &[ChoroplethRegion]) -> Option<([f64; 2], [f64; 2])> {
    let mut bbox: Option<([f64; 2], [f64; 2])> = None;
    for point in regions
        .iter()
        .flat_map(|r| r.rings.iter())
        .flat_map(|ring| ring.points.iter())
    {
        bbox = Some(match bbox {
            Some((min, max)) => (
                [min[0].min(point[0]), min[1].min(point[1])],
                [max[0].max(point[0]), max[1].max(point[1])],
            ),
            None => (*point, *point),
        });
    }
    bbox
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
    fn join_matches_by_district_not_position() {
        // Shapes in reverse district order relative to the values.
        let shapes = vec![square("Texas", 3, 0.0), square("Texas", 1, 2.0)];
        let values = vec![
            DistrictValue { district: 1, value: 41000.0 },
            DistrictValue { district: 3, value: 61000.0 },
        ];

        let regions = join_by_district(&shapes, &values);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].district, 3);
        assert_eq!(regions[0].value, Some(61000.0));
        assert_eq!(regions[1].district, 1);
        assert_eq!(regions[1].value, Some(41000.0));
    }

    #[test]
    fn unmatched_boundary_gets_no_value() {
        let shapes = vec![square("Texas", 7, 0.0)];
        let values = vec![DistrictValue { district: 1, value: 5.0 }];
        let regions = join_by_district(&shapes, &values);
        assert_eq!(regions[0].value, None);
    }

    #[test]
    fn single_district_state_yields_one_region() {
        let shapes = vec![square("Montana", 1, 0.0)];
        let values = vec![DistrictValue { district: 1, value: 47000.0 }];
        let regions = join_by_district(&shapes, &values);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].value, Some(47000.0));
        assert_eq!(value_range(&regions), Some((47000.0, 47000.0)));
    }

    #[test]
    fn bounds_cover_all_rings() {
        let shapes = vec![square("Texas", 1, 0.0), square("Texas", 2, 4.0)];
        let regions = join_by_district(&shapes, &[]);
        assert_eq!(bounds(&regions), Some(([0.0, 0.0], [5.0, 1.0])));
    }
}
