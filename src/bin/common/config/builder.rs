use std::fs::File;
use std::io::Read;

use itertools::Itertools;

use serde_derive::{Deserialize, Serialize};

use woe::{
    error::{ClimateError, ClimateResult, Stage},
    modules::{
        market::config::{SmardResolution, SrmcParameters},
        pipeline::{config::IndexConfig, functions::IndexPipeline},
        regional::models::{LatLonBox, SpatialAggregation},
        solar::models::SolarSite,
    },
    constants::DUNKELFLAUTE_QUANTILE,
};

use crate::common::io::{
    readers::{prelude::InputConfiguration, prices::PriceFileConfiguration},
    writers::prelude::OutputConfiguration,
};

use super::paths::ProjectPaths;

fn config_error(msg: impl Into<String>) -> ClimateError {
    ClimateError::new(Stage::Config, msg)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaoConfigBuilder {
    pub name: String,
    /// sea-level pressure (or any field the index is derived from)
    pub input: InputConfiguration,
    #[serde(flatten)]
    pub index: IndexConfig,
    /// further variables correlated with the index
    #[serde(default)]
    pub correlate: Vec<InputConfiguration>,
    pub output: OutputConfiguration,
}

pub struct NaoConfig {
    pub pipeline: IndexPipeline,
    pub input: InputConfiguration,
    pub correlate: Vec<InputConfiguration>,
    pub output: OutputConfiguration,
}

impl NaoConfigBuilder {
    pub fn build(&self) -> ClimateResult<NaoConfig> {
        let (a, b) = (&self.index.station_a, &self.index.station_b);
        if a.lat == b.lat && a.lon == b.lon {
            return Err(config_error(format!(
                "{}: stations {} and {} share the same location",
                self.name, a.name, b.name
            )));
        }
        Ok(NaoConfig {
            pipeline: IndexPipeline::new(self.index.clone()),
            input: self.input.clone(),
            correlate: self.correlate.clone(),
            output: self.output.clone(),
        })
    }
}

fn default_sites() -> Vec<SolarSite> {
    vec![SolarSite::munich(), SolarSite::sydney()]
}

fn default_minutes_step() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarConfigBuilder {
    pub name: String,
    #[serde(default = "default_sites")]
    pub sites: Vec<SolarSite>,
    #[serde(default = "default_minutes_step")]
    pub minutes_step: u32,
    pub output: OutputConfiguration,
}

pub struct SolarConfig {
    pub sites: Vec<SolarSite>,
    pub minutes_step: u32,
    pub output: OutputConfiguration,
}

impl SolarConfigBuilder {
    pub fn build(&self) -> ClimateResult<SolarConfig> {
        if self.sites.is_empty() {
            return Err(config_error(format!("{}: no site given", self.name)));
        }
        if self.minutes_step == 0 || 1440 % self.minutes_step != 0 {
            return Err(config_error(format!(
                "{}: time step of {} minutes does not divide a day",
                self.name, self.minutes_step
            )));
        }
        Ok(SolarConfig {
            sites: self.sites.clone(),
            minutes_step: self.minutes_step,
            output: self.output.clone(),
        })
    }
}

fn all_aggregations() -> Vec<SpatialAggregation> {
    vec![
        SpatialAggregation::Mean,
        SpatialAggregation::Median,
        SpatialAggregation::Min,
        SpatialAggregation::Max,
        SpatialAggregation::Std,
    ]
}

/// Either explicit bounds or an outline read from a GeoJSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionConfiguration {
    Box(LatLonBox),
    Shape {
        /// relative paths are looked up under the Natural Earth downloads
        geojson: String,
        /// feature to keep, matched against NAME, ADMIN or name
        #[serde(default)]
        name: Option<String>,
    },
}

fn check_region(name: &str, region: &RegionConfiguration) -> ClimateResult<()> {
    match region {
        RegionConfiguration::Box(bounds) if bounds.lat_min > bounds.lat_max => Err(config_error(format!(
            "{name}: lat_min {} is north of lat_max {}",
            bounds.lat_min, bounds.lat_max
        ))),
        RegionConfiguration::Shape { geojson, .. } if geojson.is_empty() => {
            Err(config_error(format!("{name}: empty GeoJSON path")))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalConfigBuilder {
    pub name: String,
    pub input: InputConfiguration,
    pub region: RegionConfiguration,
    #[serde(default = "all_aggregations")]
    pub aggregations: Vec<SpatialAggregation>,
    pub output: OutputConfiguration,
}

pub struct RegionalConfig {
    pub input: InputConfiguration,
    pub region: RegionConfiguration,
    pub aggregations: Vec<SpatialAggregation>,
    pub output: OutputConfiguration,
}

impl RegionalConfigBuilder {
    pub fn build(&self) -> ClimateResult<RegionalConfig> {
        check_region(&self.name, &self.region)?;
        if self.aggregations.is_empty() {
            return Err(config_error(format!("{}: no aggregation given", self.name)));
        }
        Ok(RegionalConfig {
            input: self.input.clone(),
            region: self.region.clone(),
            aggregations: self.aggregations.clone(),
            output: self.output.clone(),
        })
    }
}

fn default_quantile() -> f64 {
    DUNKELFLAUTE_QUANTILE
}

fn default_year_start_months() -> Vec<u32> {
    vec![1, 7]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyConfigBuilder {
    pub name: String,
    /// wind components, e.g. u100 and v100
    pub wind_u: InputConfiguration,
    pub wind_v: InputConfiguration,
    /// surface solar radiation downwards
    pub solar: InputConfiguration,
    pub region: RegionConfiguration,
    #[serde(default = "default_quantile")]
    pub quantile: f64,
    #[serde(default = "default_year_start_months")]
    pub year_start_months: Vec<u32>,
    pub output: OutputConfiguration,
}

pub struct MonthlyConfig {
    pub wind_u: InputConfiguration,
    pub wind_v: InputConfiguration,
    pub solar: InputConfiguration,
    pub region: RegionConfiguration,
    pub quantile: f64,
    pub year_start_months: Vec<u32>,
    pub output: OutputConfiguration,
}

impl MonthlyConfigBuilder {
    pub fn build(&self) -> ClimateResult<MonthlyConfig> {
        check_region(&self.name, &self.region)?;
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(config_error(format!(
                "{}: quantile {} outside [0, 1]",
                self.name, self.quantile
            )));
        }
        if let Some(bad) = self.year_start_months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(config_error(format!("{}: invalid month number {bad}", self.name)));
        }
        Ok(MonthlyConfig {
            wind_u: self.wind_u.clone(),
            wind_v: self.wind_v.clone(),
            solar: self.solar.clone(),
            region: self.region.clone(),
            quantile: self.quantile,
            year_start_months: self.year_start_months.clone(),
            output: self.output.clone(),
        })
    }
}

fn default_smard_path() -> String {
    "smard".into()
}

fn default_bidding_zone() -> String {
    "DE-LU".into()
}

fn default_capacity_region() -> String {
    "DE".into()
}

fn default_hourly() -> SmardResolution {
    SmardResolution::Hour
}

fn default_monthly() -> SmardResolution {
    SmardResolution::Month
}

/// Where the SMARD series live and which region and resolution to read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmardConfiguration {
    /// relative paths are looked up under the downloads directory
    #[serde(default = "default_smard_path")]
    pub path: String,
    /// bidding zone of prices, load and generation
    #[serde(default = "default_bidding_zone")]
    pub region: String,
    #[serde(default = "default_hourly")]
    pub resolution: SmardResolution,
    #[serde(default = "default_capacity_region")]
    pub capacity_region: String,
    #[serde(default = "default_monthly")]
    pub capacity_resolution: SmardResolution,
}

impl Default for SmardConfiguration {
    fn default() -> Self {
        SmardConfiguration {
            path: default_smard_path(),
            region: default_bidding_zone(),
            resolution: default_hourly(),
            capacity_region: default_capacity_region(),
            capacity_resolution: default_monthly(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfigBuilder {
    pub name: String,
    #[serde(default)]
    pub smard: SmardConfiguration,
    /// TTF front month [EUR/MWh]
    pub gas: PriceFileConfiguration,
    /// API 2 Rotterdam [USD/t]
    pub coal: PriceFileConfiguration,
    /// EU ETS allowances [EUR/t]
    pub carbon: PriceFileConfiguration,
    #[serde(default)]
    pub srmc: SrmcParameters,
    pub output: OutputConfiguration,
}

pub struct MarketConfig {
    pub smard: SmardConfiguration,
    pub gas: PriceFileConfiguration,
    pub coal: PriceFileConfiguration,
    pub carbon: PriceFileConfiguration,
    pub srmc: SrmcParameters,
    pub output: OutputConfiguration,
}

impl MarketConfigBuilder {
    pub fn build(&self) -> ClimateResult<MarketConfig> {
        self.srmc
            .validate()
            .map_err(|err| config_error(format!("{}: {}", self.name, err.message())))?;
        if matches!(
            self.smard.resolution,
            SmardResolution::Week | SmardResolution::Month | SmardResolution::Year
        ) {
            return Err(config_error(format!(
                "{}: market data at {} resolution cannot resolve the merit order",
                self.name, self.smard.resolution
            )));
        }
        Ok(MarketConfig {
            smard: self.smard.clone(),
            gas: self.gas.clone(),
            coal: self.coal.clone(),
            carbon: self.carbon.clone(),
            srmc: self.srmc,
            output: self.output.clone(),
        })
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TaskConfigType {
    NAO(NaoConfigBuilder),
    Solar(SolarConfigBuilder),
    Regional(RegionalConfigBuilder),
    Monthly(MonthlyConfigBuilder),
    Market(MarketConfigBuilder),
}

impl TaskConfigType {
    pub fn get_task_name(&self) -> &str {
        match self {
            TaskConfigType::NAO(task) => &task.name,
            TaskConfigType::Solar(task) => &task.name,
            TaskConfigType::Regional(task) => &task.name,
            TaskConfigType::Monthly(task) => &task.name,
            TaskConfigType::Market(task) => &task.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigContainer {
    #[serde(default)]
    pub paths: ProjectPaths,
    pub tasks: Vec<TaskConfigType>,
}

impl ConfigContainer {
    pub fn from_file(config_file: &str) -> ClimateResult<ConfigContainer> {
        // Check the file extension to determine which method to use
        if config_file.ends_with(".yaml") || config_file.ends_with(".yml") {
            Self::from_yaml(config_file)
        } else {
            Err(config_error(format!(
                "Unsupported config file format: {}",
                config_file
            )))
        }
    }

    pub fn from_yaml(config_file: &str) -> ClimateResult<Self> {
        let mut file = File::open(config_file)
            .map_err(|err| config_error(format!("Cannot open config file {}: {}", config_file, err)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|err| config_error(format!("Cannot read config file {}: {}", config_file, err)))?;

        Self::from_yaml_str(&contents)
            .map_err(|err| config_error(format!("Cannot parse config file {}: {}", config_file, err.message())))
    }

    pub fn from_yaml_str(contents: &str) -> ClimateResult<Self> {
        let conf: ConfigContainer =
            serde_yaml::from_str(contents).map_err(|err| config_error(err.to_string()))?;
        if let Some(name) = conf
            .tasks
            .iter()
            .map(|task| task.get_task_name())
            .duplicates()
            .next()
        {
            return Err(config_error(format!("task name {name} is used twice")));
        }
        Ok(conf)
    }
}
