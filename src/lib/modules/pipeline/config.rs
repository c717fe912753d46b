use serde_derive::{Deserialize, Serialize};

use crate::models::station::Station;
use crate::modules::completeness::models::CompletenessMode;
use crate::modules::season::config::SeasonSpec;

/// Everything needed to derive a two-station index from a gridded field.
/// `station_a - station_b` is the sign convention of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub season: SeasonSpec,
    #[serde(default = "Station::azores")]
    pub station_a: Station,
    #[serde(default = "Station::iceland")]
    pub station_b: Station,
    #[serde(default)]
    pub completeness: CompletenessMode,
}

impl Default for IndexConfig {
    /// winter NAO: DJF, Azores minus Iceland
    fn default() -> Self {
        IndexConfig {
            season: SeasonSpec::djf(),
            station_a: Station::azores(),
            station_b: Station::iceland(),
            completeness: CompletenessMode::default(),
        }
    }
}
