use chrono::{DateTime, Utc};
use ndarray::{s, Array1, Array3, Array4, Axis, Zip};

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::models::series::{check_time_axis, TimeSeries};
use crate::modules::extract::models::RectilinearGrid;

/// Gridded field shaped (time, lat, lon)
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub time: Array1<DateTime<Utc>>,
    pub lats: Array1<f64>,
    pub lons: Array1<f64>,
    pub values: Array3<f64>,
}

impl Field {
    pub fn new(
        time: Array1<DateTime<Utc>>,
        lats: Array1<f64>,
        lons: Array1<f64>,
        values: Array3<f64>,
    ) -> ClimateResult<Self> {
        let expected = (time.len(), lats.len(), lons.len());
        if values.dim() != expected {
            return Err(ClimateError::new(
                Stage::Input,
                format!(
                    "field values have shape {:?}, axes imply {:?}",
                    values.dim(),
                    expected
                ),
            ));
        }
        check_time_axis(&time)?;
        Ok(Field {
            time,
            lats,
            lons,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn grid(&self) -> RectilinearGrid {
        RectilinearGrid::new(self.lats.clone(), self.lons.clone())
    }

    /// time series of a single grid cell
    pub fn cell_series(&self, i: usize, j: usize) -> TimeSeries {
        TimeSeries {
            time: self.time.clone(),
            values: self.values.slice(s![.., i, j]).to_owned(),
        }
    }

    pub fn mapv(&self, fun: impl Fn(f64) -> f64) -> Field {
        Field {
            time: self.time.clone(),
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values: self.values.mapv(fun),
        }
    }

    /// true when the time and grid axes of both fields coincide
    pub fn same_axes(&self, other: &Field) -> bool {
        self.time == other.time && self.lats == other.lats && self.lons == other.lons
    }

    /// combine two fields on identical axes cell by cell
    pub fn zip_with(&self, other: &Field, fun: impl Fn(f64, f64) -> f64) -> ClimateResult<Field> {
        if !self.same_axes(other) {
            return Err(ClimateError::new(
                Stage::Input,
                "fields must share time, latitude and longitude axes",
            ));
        }
        let values = Zip::from(&self.values)
            .and(&other.values)
            .map_collect(|a, b| fun(*a, *b));
        Ok(Field {
            time: self.time.clone(),
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values,
        })
    }
}

/// Gridded field on pressure levels, shaped (time, level, lat, lon)
#[derive(Debug, Clone, PartialEq)]
pub struct LevelledField {
    pub time: Array1<DateTime<Utc>>,
    /// pressure levels [hPa]
    pub levels: Array1<f64>,
    pub lats: Array1<f64>,
    pub lons: Array1<f64>,
    pub values: Array4<f64>,
}

impl LevelledField {
    pub fn new(
        time: Array1<DateTime<Utc>>,
        levels: Array1<f64>,
        lats: Array1<f64>,
        lons: Array1<f64>,
        values: Array4<f64>,
    ) -> ClimateResult<Self> {
        let expected = (time.len(), levels.len(), lats.len(), lons.len());
        if values.dim() != expected {
            return Err(ClimateError::new(
                Stage::Input,
                format!(
                    "levelled field values have shape {:?}, axes imply {:?}",
                    values.dim(),
                    expected
                ),
            ));
        }
        check_time_axis(&time)?;
        Ok(LevelledField {
            time,
            levels,
            lats,
            lons,
            values,
        })
    }

    pub fn select_level(&self, level: f64) -> ClimateResult<Field> {
        let index = self
            .levels
            .iter()
            .position(|l| (l - level).abs() < 1e-6)
            .ok_or_else(|| {
                ClimateError::new(Stage::Input, format!("pressure level {level} hPa not found"))
            })?;
        Ok(Field {
            time: self.time.clone(),
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values: self.values.index_axis(Axis(1), index).to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn times(n: usize) -> Array1<DateTime<Utc>> {
        (0..n)
            .map(|i| Utc.with_ymd_and_hms(2000, 1 + i as u32, 1, 0, 0, 0).unwrap())
            .collect()
    }

    #[test]
    fn shape_must_match_axes() {
        let result = Field::new(
            times(2),
            Array1::from(vec![10.0, 20.0]),
            Array1::from(vec![0.0]),
            Array3::zeros((2, 2, 2)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn select_level_extracts_the_right_slab() {
        let mut values = Array4::zeros((1, 2, 1, 1));
        values[[0, 1, 0, 0]] = 5500.0;
        let field = LevelledField::new(
            times(1),
            Array1::from(vec![250.0, 500.0]),
            Array1::from(vec![50.0]),
            Array1::from(vec![10.0]),
            values,
        )
        .expect("valid field");

        let z500 = field.select_level(500.0).expect("level exists");
        assert_eq!(z500.values[[0, 0, 0]], 5500.0);
        assert!(field.select_level(850.0).is_err());
    }

    #[test]
    fn zip_with_requires_same_axes() {
        let a = Field::new(
            times(1),
            Array1::from(vec![50.0]),
            Array1::from(vec![10.0]),
            Array3::from_elem((1, 1, 1), 3.0),
        )
        .expect("valid");
        let b = a.mapv(|v| v + 1.0);
        let sum = a.zip_with(&b, |x, y| x + y).expect("same axes");
        assert_eq!(sum.values[[0, 0, 0]], 7.0);

        let mut c = b.clone();
        c.lats = Array1::from(vec![51.0]);
        assert!(a.zip_with(&c, |x, y| x + y).is_err());
    }
}
