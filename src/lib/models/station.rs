use serde_derive::{Deserialize, Serialize};

use crate::constants::{AZORES_LAT, AZORES_LON, ICELAND_LAT, ICELAND_LON};

/// A named reference location, supplied by configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    /// latitude [°N]
    pub lat: f64,
    /// longitude [°E]
    pub lon: f64,
}

impl Station {
    pub fn new(name: &str, lat: f64, lon: f64) -> Self {
        Station {
            name: name.to_owned(),
            lat,
            lon,
        }
    }

    pub fn azores() -> Self {
        Station::new("Azores", AZORES_LAT, AZORES_LON)
    }

    pub fn iceland() -> Self {
        Station::new("Iceland", ICELAND_LAT, ICELAND_LON)
    }
}
