//! Geo module - district boundary geometry and the record join

mod join;
mod shapes;

pub use join::{bounds, join_by_district, value_range, ChoroplethRegion};
pub use shapes::{read_district_shapes, DistrictShape, GeoError, Ring, ShapeLoader};
