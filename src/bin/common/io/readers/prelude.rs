use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array3, Array4};
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use woe::{
    error::{ClimateError, ClimateResult, Stage},
    models::field::{Field, LevelledField},
    modules::derived::functions::{geopotential_height, joules_to_kwh, kelvin_to_celsius},
};

/// Unit conversion applied to a variable right after reading it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    KelvinToCelsius,
    GeopotentialHeight,
    JoulesToKwh,
}

impl Transform {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Transform::KelvinToCelsius => kelvin_to_celsius(value),
            Transform::GeopotentialHeight => geopotential_height(value),
            Transform::JoulesToKwh => joules_to_kwh(value),
        }
    }
}

fn default_lat_name() -> String {
    "latitude".into()
}

fn default_lon_name() -> String {
    "longitude".into()
}

fn default_time_name() -> String {
    "time".into()
}

fn default_level_name() -> String {
    "pressure_level".into()
}

/// Where a gridded variable lives and how its axes are named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfiguration {
    pub path: String,
    pub variable: String,
    #[serde(default = "default_lat_name")]
    pub lat_name: String,
    #[serde(default = "default_lon_name")]
    pub lon_name: String,
    #[serde(default = "default_time_name")]
    pub time_name: String,
    #[serde(default = "default_level_name")]
    pub level_name: String,
    /// pressure level to select for variables on levels [hPa]
    #[serde(default)]
    pub level: Option<f64>,
    #[serde(default)]
    pub transform: Option<Transform>,
}

impl InputConfiguration {
    pub fn new(path: &str, variable: &str) -> Self {
        InputConfiguration {
            path: path.to_owned(),
            variable: variable.to_owned(),
            lat_name: default_lat_name(),
            lon_name: default_lon_name(),
            time_name: default_time_name(),
            level_name: default_level_name(),
            level: None,
            transform: None,
        }
    }
}

/// Trait implemented by the dataset formats a gridded variable can be read from
pub trait FieldReader {
    fn read_field(&self, path: &Path, config: &InputConfiguration) -> ClimateResult<Field>;
}

/// Axes of a dataset as read from disk, before the values are shaped
pub struct RawAxes {
    pub time: Array1<DateTime<Utc>>,
    pub levels: Option<Array1<f64>>,
    pub lats: Array1<f64>,
    pub lons: Array1<f64>,
}

/// Shape flat row-major values into a field, selecting the configured level
/// and applying the configured transform
pub fn assemble_field(axes: RawAxes, values: Vec<f64>, config: &InputConfiguration) -> ClimateResult<Field> {
    let RawAxes {
        time,
        levels,
        lats,
        lons,
    } = axes;
    let shape_err = |err: ndarray::ShapeError| {
        ClimateError::new(
            Stage::Input,
            format!("variable {} does not match its axes: {err}", config.variable),
        )
    };

    let field = match (config.level, levels) {
        (Some(level), Some(levels)) => {
            let shape = (time.len(), levels.len(), lats.len(), lons.len());
            let values = Array4::from_shape_vec(shape, values).map_err(shape_err)?;
            LevelledField::new(time, levels, lats, lons, values)?.select_level(level)?
        }
        (Some(level), None) => {
            return Err(ClimateError::new(
                Stage::Input,
                format!(
                    "level {level} requested but {} has no {} axis",
                    config.variable, config.level_name
                ),
            ))
        }
        (None, _) => {
            let shape = (time.len(), lats.len(), lons.len());
            let values = Array3::from_shape_vec(shape, values).map_err(shape_err)?;
            Field::new(time, lats, lons, values)?
        }
    };

    Ok(match config.transform {
        Some(transform) => field.mapv(|v| transform.apply(v)),
        None => field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use woe::helpers::month_start;

    fn axes(levels: Option<Vec<f64>>) -> RawAxes {
        RawAxes {
            time: Array1::from(vec![month_start(2000, 1).expect("valid")]),
            levels: levels.map(Array1::from),
            lats: Array1::from(vec![50.0, 40.0]),
            lons: Array1::from(vec![0.0]),
        }
    }

    #[test]
    fn selects_the_requested_level_and_converts() {
        let mut config = InputConfiguration::new("z.json", "z");
        config.level = Some(500.0);
        config.transform = Some(Transform::GeopotentialHeight);
        let g = 9.80665;
        let values = vec![g * 1.0, g * 2.0, g * 5500.0, g * 5600.0];
        let field = assemble_field(axes(Some(vec![850.0, 500.0])), values, &config).expect("valid");
        assert_eq!(field.values.dim(), (1, 2, 1));
        assert!((field.values[[0, 0, 0]] - 5500.0).abs() < 1e-9);
    }

    #[test]
    fn wrong_number_of_values_is_an_error() {
        let config = InputConfiguration::new("msl.json", "msl");
        let err = assemble_field(axes(None), vec![1.0, 2.0, 3.0], &config).expect_err("should fail");
        assert_eq!(err.stage(), Stage::Input);
    }
}
