use geo::{Contains, MultiPolygon, Point};
use ndarray::{Array1, Array2};
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::modules::extract::models::RectilinearGrid;

/// How the cells of a region are reduced to one value per time step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SpatialAggregation {
    Mean,
    Median,
    Min,
    Max,
    /// population standard deviation
    Std,
}

/// Cells of a (lat, lon) grid that belong to a region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMask {
    pub lats: Array1<f64>,
    pub lons: Array1<f64>,
    pub inside: Array2<bool>,
}

/// Latitude/longitude bounds of a rectangular region, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

/// Area a field is reduced over
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Box(LatLonBox),
    /// outline with longitudes in -180..180, e.g. a Natural Earth country
    Polygon(MultiPolygon<f64>),
}

impl Region {
    pub fn mask(&self, lats: &Array1<f64>, lons: &Array1<f64>) -> RegionMask {
        match self {
            Region::Box(bounds) => RegionMask::from_box(lats.clone(), lons.clone(), bounds),
            Region::Polygon(shape) => RegionMask::from_polygon(lats.clone(), lons.clone(), shape),
        }
    }
}

impl RegionMask {
    pub fn new(lats: Array1<f64>, lons: Array1<f64>, inside: Array2<bool>) -> ClimateResult<Self> {
        if inside.dim() != (lats.len(), lons.len()) {
            return Err(ClimateError::new(
                Stage::Regional,
                format!(
                    "region mask has shape {:?}, grid is {}x{}",
                    inside.dim(),
                    lats.len(),
                    lons.len()
                ),
            ));
        }
        Ok(RegionMask { lats, lons, inside })
    }

    /// Cells whose centre falls in the box. Box longitudes may be given in
    /// either convention; a box with lon_min > lon_max crosses the antimeridian.
    pub fn from_box(lats: Array1<f64>, lons: Array1<f64>, bounds: &LatLonBox) -> Self {
        let grid = RectilinearGrid::new(lats.clone(), lons.clone());
        let lon_min = grid.normalize_lon(bounds.lon_min);
        let lon_max = grid.normalize_lon(bounds.lon_max);
        let in_lon = |lon: f64| {
            if lon_min <= lon_max {
                lon >= lon_min && lon <= lon_max
            } else {
                lon >= lon_min || lon <= lon_max
            }
        };
        let inside = Array2::from_shape_fn((lats.len(), lons.len()), |(i, j)| {
            lats[i] >= bounds.lat_min && lats[i] <= bounds.lat_max && in_lon(lons[j])
        });
        RegionMask { lats, lons, inside }
    }

    /// Cells whose centre lies strictly inside the outline; cells on the
    /// boundary are outside. Grid longitudes above 180 are wrapped.
    pub fn from_polygon(lats: Array1<f64>, lons: Array1<f64>, shape: &MultiPolygon<f64>) -> Self {
        let inside = Array2::from_shape_fn((lats.len(), lons.len()), |(i, j)| {
            let lon = if lons[j] > 180.0 { lons[j] - 360.0 } else { lons[j] };
            shape.contains(&Point::new(lon, lats[i]))
        });
        RegionMask { lats, lons, inside }
    }

    pub fn n_cells(&self) -> usize {
        self.inside.iter().filter(|c| **c).count()
    }

    /// (row, col) of the cells inside the region
    pub fn cells(&self) -> Vec<(usize, usize)> {
        self.inside
            .indexed_iter()
            .filter(|(_, inside)| **inside)
            .map(|(idx, _)| idx)
            .collect()
    }
}
