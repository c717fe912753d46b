use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use woe::{
    error::ClimateResult,
    models::{
        season::{CorrelationMap, SeasonSeries},
        series::TimeSeries,
    },
    modules::{
        completeness::models::CompletenessMask,
        extract::models::GridPoint,
        market::models::MarketMetrics,
        monthly::models::{DunkelflauteResult, MonthCorrelation},
        solar::models::ElevationTable,
    },
};

/// Anything a task can persist
#[derive(Debug, Clone, Copy)]
pub enum Product<'a> {
    Seasons(&'a SeasonSeries),
    Series(&'a TimeSeries),
    Map(&'a CorrelationMap),
    Mask(&'a CompletenessMask),
    Points(&'a [GridPoint]),
    Climatology(&'a [f64; 12]),
    MonthCorrelation(&'a MonthCorrelation),
    Dunkelflaute(&'a DunkelflauteResult),
    Elevation(&'a ElevationTable),
    Metrics(&'a MarketMetrics),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    NetCdf,
}

fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Json]
}

/// Destination directory of a task and the formats written there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfiguration {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
}

/// Trait implemented by concrete output sinks (e.g. JSON, NetCDF) that persist task products.
/// Existing files with the same name are overwritten.
pub trait OutputSink {
    /// whether the sink has a representation for the product
    fn supports(&self, _product: &Product) -> bool {
        true
    }

    fn write(&mut self, name: &str, product: &Product) -> ClimateResult<()>;
}
