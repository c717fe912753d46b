use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde_derive::{Deserialize, Serialize};

use crate::error::ClimateResult;
use crate::models::series::TimeSeries;

/// Start timestamps [ms since epoch] of the blocks of a SMARD series
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SmardIndex {
    pub timestamps: Vec<i64>,
}

/// One block of a SMARD series, `null` where no value was published
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SmardBlock {
    pub series: Vec<(i64, Option<f64>)>,
}

/// Series the hourly market frame is built from [MW, EUR/MWh]
#[derive(Debug, Clone, PartialEq)]
pub struct MarketInputs {
    pub price: TimeSeries,
    pub total_load: TimeSeries,
    pub solar: TimeSeries,
    pub wind_onshore: TimeSeries,
    pub wind_offshore: TimeSeries,
    pub nuclear: TimeSeries,
    pub biomass: TimeSeries,
    pub hydro: TimeSeries,
}

/// Market inputs restricted to the hours where all of them are defined
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyMarket {
    pub time: Array1<DateTime<Utc>>,
    pub price: Array1<f64>,
    pub total_load: Array1<f64>,
    pub solar: Array1<f64>,
    pub wind_onshore: Array1<f64>,
    pub wind_offshore: Array1<f64>,
    pub nuclear: Array1<f64>,
    pub biomass: Array1<f64>,
    pub hydro: Array1<f64>,
}

impl HourlyMarket {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Load left to the rest of the park once renewables (and baseload) are served
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualLoads {
    pub wind: Array1<f64>,
    pub renewables: Array1<f64>,
    pub baseload: Array1<f64>,
    /// total load minus renewables
    pub residual_load: Array1<f64>,
    /// residual load minus baseload, covered by coal and gas
    pub rl_fossil: Array1<f64>,
}

/// Daily short-run marginal costs [EUR/MWh]
#[derive(Debug, Clone, PartialEq)]
pub struct SrmcSeries {
    pub time: Array1<DateTime<Utc>>,
    pub gas: Array1<f64>,
    pub coal: Array1<f64>,
}

impl SrmcSeries {
    /// coal minus gas, positive when gas is cheaper
    pub fn spread(&self) -> Array1<f64> {
        &self.coal - &self.gas
    }

    pub fn gas_series(&self) -> TimeSeries {
        TimeSeries {
            time: self.time.clone(),
            values: self.gas.clone(),
        }
    }

    pub fn coal_series(&self) -> TimeSeries {
        TimeSeries {
            time: self.time.clone(),
            values: self.coal.clone(),
        }
    }
}

/// Installed fossil capacities [MW], NaN where a source has no value
#[derive(Debug, Clone, PartialEq)]
pub struct FossilCapacities {
    pub time: Array1<DateTime<Utc>>,
    pub brown_coal: Array1<f64>,
    pub hard_coal: Array1<f64>,
    pub natural_gas: Array1<f64>,
}

/// Actual and merit-order prices on the hours with known marginal costs
#[derive(Debug, Clone, PartialEq)]
pub struct PriceReconstruction {
    pub time: Array1<DateTime<Utc>>,
    pub price: Array1<f64>,
    pub reconstructed: Array1<f64>,
    pub residual_load: Array1<f64>,
    pub rl_fossil: Array1<f64>,
}

impl PriceReconstruction {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn series(&self, values: &Array1<f64>) -> ClimateResult<TimeSeries> {
        TimeSeries::new(self.time.clone(), values.clone())
    }

    pub fn price_series(&self) -> ClimateResult<TimeSeries> {
        self.series(&self.price)
    }

    pub fn reconstructed_series(&self) -> ClimateResult<TimeSeries> {
        self.series(&self.reconstructed)
    }

    pub fn residual_load_series(&self) -> ClimateResult<TimeSeries> {
        self.series(&self.residual_load)
    }
}

/// Agreement between actual prices, their reconstruction and the residual loads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketMetrics {
    pub hours: usize,
    pub negative_residual_load_hours: usize,
    pub negative_rl_fossil_hours: usize,
    /// coefficient of determination of the reconstructed price
    pub r2_reconstructed: f64,
    pub mae: f64,
    pub rmse: f64,
    pub correlation_residual_load: f64,
    pub correlation_rl_fossil: f64,
    /// R² of a linear fit of the price on the load
    pub r2_residual_load: f64,
    pub r2_rl_fossil: f64,
    /// residual load vs price, October to March and April to September
    pub correlation_winter: f64,
    pub correlation_summer: f64,
}
