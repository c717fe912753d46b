use ndarray::{Array1, Array3};

use crate::models::season::{SeasonField, SeasonSeries};

/// Seasonal means of a single series with the number of contributing samples
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonAggregate {
    pub means: SeasonSeries,
    pub counts: Array1<usize>,
}

/// Seasonal means of a gridded field with per-cell sample counts
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonFieldAggregate {
    pub means: SeasonField,
    /// (season, lat, lon)
    pub counts: Array3<usize>,
}

impl SeasonFieldAggregate {
    pub fn seasons(&self) -> &Array1<i32> {
        &self.means.seasons
    }
}
