use ndarray::{Array1, Array2};
use serde_derive::{Deserialize, Serialize};

/// A location with the fixed UTC offset its local clock runs on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSite {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// hours east of UTC
    #[serde(default)]
    pub utc_offset: i32,
}

impl SolarSite {
    pub fn new(name: &str, lat: f64, lon: f64, utc_offset: i32) -> Self {
        SolarSite {
            name: name.to_owned(),
            lat,
            lon,
            utc_offset,
        }
    }

    pub fn munich() -> Self {
        SolarSite::new("Munich", 48.14, 11.58, 1)
    }

    pub fn sydney() -> Self {
        SolarSite::new("Sydney", -33.87, 151.21, 11)
    }
}

/// Solar elevation [°] per local time of day (rows) and day of year (columns).
/// NaN while the sun is below the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationTable {
    pub site: SolarSite,
    /// local clock time [h]
    pub local_hours: Array1<f64>,
    /// 1..=365
    pub days: Array1<u32>,
    pub values: Array2<f64>,
}

impl ElevationTable {
    /// highest elevation reached over the whole table
    pub fn max_elevation(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NAN, f64::max)
    }

    /// hours of sunlight on a given day, at the table resolution
    pub fn sunlit_hours(&self, day: u32) -> Option<f64> {
        let col = self.days.iter().position(|d| *d == day)?;
        let step = match self.local_hours.len() {
            0 | 1 => 24.0,
            _ => self.local_hours[1] - self.local_hours[0],
        };
        let sunlit = self
            .values
            .column(col)
            .iter()
            .filter(|v| v.is_finite())
            .count();
        Some(sunlit as f64 * step)
    }
}
