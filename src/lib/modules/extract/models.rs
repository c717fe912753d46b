use std::fmt::Debug;

use ndarray::Array1;
use serde_derive::Serialize;

pub trait Grid {
    /// (row, col) of the grid sample nearest to the point, None on an empty grid
    fn index(&self, lat: f64, lon: f64) -> Option<(usize, usize)>;
    fn shape(&self) -> (usize, usize);
}

impl Debug for dyn Grid + '_ {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Grid {:?}", self.shape())
    }
}

/// Grid described by a latitude axis and a longitude axis (ERA5 style,
/// latitudes usually descending)
#[derive(Debug, Clone, PartialEq)]
pub struct RectilinearGrid {
    pub lats: Array1<f64>,
    pub lons: Array1<f64>,
}

/// index of the axis value closest to `value`; ties go to the lowest index
pub fn nearest_index(axis: &Array1<f64>, value: f64) -> Option<usize> {
    axis.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, v)| {
            let dist = (v - value).abs();
            match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((idx, dist)),
            }
        })
        .map(|(idx, _)| idx)
}

impl RectilinearGrid {
    pub fn new(lats: Array1<f64>, lons: Array1<f64>) -> Self {
        RectilinearGrid { lats, lons }
    }

    /// bring a longitude into the convention used by the grid axis (0..360 or -180..180)
    pub fn normalize_lon(&self, lon: f64) -> f64 {
        let max = self.lons.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = self.lons.iter().cloned().fold(f64::INFINITY, f64::min);
        if min >= 0.0 && max > 180.0 && lon < 0.0 {
            lon + 360.0
        } else if max <= 180.0 && lon > 180.0 {
            lon - 360.0
        } else {
            lon
        }
    }
}

impl Grid for RectilinearGrid {
    fn index(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        // on a rectilinear grid the euclidean nearest sample is the
        // per-axis nearest row and column
        let i = nearest_index(&self.lats, lat)?;
        let j = nearest_index(&self.lons, self.normalize_lon(lon))?;
        Some((i, j))
    }

    fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }
}

/// Where a reference location landed on the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPoint {
    pub name: String,
    pub row: usize,
    pub col: usize,
    pub lat: f64,
    pub lon: f64,
}
