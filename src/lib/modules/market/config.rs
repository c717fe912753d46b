use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::constants::{
    COAL_CARBON_INTENSITY, COAL_EFFICIENCY, COAL_THERMAL_CONTENT, EURUSD_RATE,
    GAS_CARBON_INTENSITY, GAS_EFFICIENCY, VOM_COST,
};
use crate::error::{ClimateError, ClimateResult, Stage};

/// Plant and fuel parameters of the short-run marginal cost model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrmcParameters {
    pub coal_efficiency: f64,
    pub gas_efficiency: f64,
    /// tCO2 per MWh of electricity
    pub coal_carbon_intensity: f64,
    pub gas_carbon_intensity: f64,
    /// [EUR/MWh]
    pub vom_cost: f64,
    /// [MWh/t]
    pub coal_thermal_content: f64,
    /// USD per EUR
    pub eurusd_rate: f64,
}

impl Default for SrmcParameters {
    fn default() -> Self {
        SrmcParameters {
            coal_efficiency: COAL_EFFICIENCY,
            gas_efficiency: GAS_EFFICIENCY,
            coal_carbon_intensity: COAL_CARBON_INTENSITY,
            gas_carbon_intensity: GAS_CARBON_INTENSITY,
            vom_cost: VOM_COST,
            coal_thermal_content: COAL_THERMAL_CONTENT,
            eurusd_rate: EURUSD_RATE,
        }
    }
}

impl SrmcParameters {
    pub fn validate(&self) -> ClimateResult<()> {
        for (name, value) in [
            ("coal_efficiency", self.coal_efficiency),
            ("gas_efficiency", self.gas_efficiency),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ClimateError::new(
                    Stage::Market,
                    format!("{name} {value} outside (0, 1]"),
                ));
            }
        }
        for (name, value) in [
            ("coal_thermal_content", self.coal_thermal_content),
            ("eurusd_rate", self.eurusd_rate),
        ] {
            if !(value > 0.0) {
                return Err(ClimateError::new(
                    Stage::Market,
                    format!("{name} must be positive, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Time resolution of a SMARD chart data series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SmardResolution {
    QuarterHour,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// SMARD chart data series used by the merit order model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SmardVariable {
    PriceDeLu,
    TotalLoad,
    ResidualLoad,
    Solar,
    WindOnshore,
    WindOffshore,
    Nuclear,
    Biomass,
    Hydro,
    BrownCoal,
    HardCoal,
    NaturalGas,
    CapacityBrownCoal,
    CapacityHardCoal,
    CapacityNaturalGas,
}

impl SmardVariable {
    /// filter id in the SMARD chart data API
    pub fn id(&self) -> u32 {
        match self {
            SmardVariable::PriceDeLu => 4169,
            SmardVariable::TotalLoad => 410,
            SmardVariable::ResidualLoad => 4359,
            SmardVariable::Solar => 4068,
            SmardVariable::WindOnshore => 4067,
            SmardVariable::WindOffshore => 1225,
            SmardVariable::Nuclear => 1224,
            SmardVariable::Biomass => 4066,
            SmardVariable::Hydro => 1226,
            SmardVariable::BrownCoal => 1223,
            SmardVariable::HardCoal => 4069,
            SmardVariable::NaturalGas => 4071,
            SmardVariable::CapacityBrownCoal => 4072,
            SmardVariable::CapacityHardCoal => 4075,
            SmardVariable::CapacityNaturalGas => 198,
        }
    }

    /// name of the file listing the block timestamps
    pub fn index_file(resolution: SmardResolution) -> String {
        format!("index_{resolution}.json")
    }

    /// name of the block starting at `timestamp` [ms since epoch]
    pub fn block_file(&self, region: &str, resolution: SmardResolution, timestamp: i64) -> String {
        format!("{}_{region}_{resolution}_{timestamp}.json", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn default_parameters_are_valid() {
        let params = SrmcParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.vom_cost, 2.0);

        let bad = SrmcParameters {
            gas_efficiency: 1.5,
            ..params
        };
        assert_eq!(bad.validate().expect_err("efficiency above 1").stage(), Stage::Market);
    }

    #[test]
    fn smard_file_names() {
        assert_eq!(SmardVariable::index_file(SmardResolution::QuarterHour), "index_quarterhour.json");
        assert_eq!(
            SmardVariable::PriceDeLu.block_file("DE-LU", SmardResolution::Hour, 1420412400000),
            "4169_DE-LU_hour_1420412400000.json"
        );
        assert_eq!(SmardVariable::from_str("wind_offshore"), Ok(SmardVariable::WindOffshore));
        assert_eq!(SmardResolution::from_str("Month"), Ok(SmardResolution::Month));
    }
}
