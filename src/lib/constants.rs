/// standard gravity [m/s²]
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// J/m² in one kWh/m²
pub const JOULES_PER_KWH: f64 = 3.6e6;

/// Ponta Delgada, Azores
pub const AZORES_LAT: f64 = 37.74;
pub const AZORES_LON: f64 = -25.68;

/// Reykjavik, Iceland
pub const ICELAND_LAT: f64 = 64.13;
pub const ICELAND_LON: f64 = -21.90;

// solar geometry
pub const MAX_DECLINATION: f64 = 23.44;
pub const DAYS_IN_YEAR: f64 = 365.0;
/// day of year of the (approximate) march equinox
pub const EQUINOX_DAY: f64 = 81.0;
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// default quantile below which a resource is considered scarce
pub const DUNKELFLAUTE_QUANTILE: f64 = 0.25;

// merit order model, API 2 coal at 6000 kcal/kg NAR
pub const COAL_EFFICIENCY: f64 = 0.40;
pub const GAS_EFFICIENCY: f64 = 0.50;
/// tCO2 per MWh of electricity
pub const COAL_CARBON_INTENSITY: f64 = 0.83;
pub const GAS_CARBON_INTENSITY: f64 = 0.37;
/// variable operation and maintenance [EUR/MWh]
pub const VOM_COST: f64 = 2.0;
/// MWh per metric ton of coal
pub const COAL_THERMAL_CONTENT: f64 = 6.98;
/// USD per EUR
pub const EURUSD_RATE: f64 = 1.08;

/// October to March, the heating half of the year
pub const WINTER_MONTHS: [u32; 6] = [10, 11, 12, 1, 2, 3];
