use crate::models::season::{CorrelationMap, SeasonSeries};
use crate::modules::completeness::models::CompletenessMask;
use crate::modules::extract::models::GridPoint;

/// Products of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct IndexResult {
    /// standardized A minus standardized B, on the kept seasons
    pub index: SeasonSeries,
    pub standardized_a: SeasonSeries,
    pub standardized_b: SeasonSeries,
    /// index against the source field itself
    pub correlation: CorrelationMap,
    /// shared mask; any further field correlated with the index must pass it
    pub mask: CompletenessMask,
    /// grid cells the two stations resolved to, A first
    pub points: Vec<GridPoint>,
}

impl IndexResult {
    pub fn seasons(&self) -> &ndarray::Array1<i32> {
        &self.index.seasons
    }
}
