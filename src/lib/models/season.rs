use ndarray::{s, Array1, Array2, Array3};

use crate::error::{ClimateError, ClimateResult, Stage};

/// One value per season label
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSeries {
    pub seasons: Array1<i32>,
    pub values: Array1<f64>,
}

fn check_season_axis(seasons: &Array1<i32>) -> ClimateResult<()> {
    if seasons.windows(2).into_iter().any(|w| w[1] <= w[0]) {
        return Err(ClimateError::new(
            Stage::Season,
            "season labels must be strictly increasing",
        ));
    }
    Ok(())
}

impl SeasonSeries {
    pub fn new(seasons: Array1<i32>, values: Array1<f64>) -> ClimateResult<Self> {
        if seasons.len() != values.len() {
            return Err(ClimateError::new(
                Stage::Season,
                format!(
                    "{} season labels but {} values",
                    seasons.len(),
                    values.len()
                ),
            ));
        }
        check_season_axis(&seasons)?;
        Ok(SeasonSeries { seasons, values })
    }

    pub fn empty() -> Self {
        SeasonSeries {
            seasons: Array1::zeros(0),
            values: Array1::zeros(0),
        }
    }

    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, season: i32) -> Option<f64> {
        self.seasons
            .iter()
            .position(|s| *s == season)
            .map(|idx| self.values[idx])
    }
}

/// Seasonal means on a grid, shaped (season, lat, lon)
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonField {
    pub seasons: Array1<i32>,
    pub lats: Array1<f64>,
    pub lons: Array1<f64>,
    pub values: Array3<f64>,
}

impl SeasonField {
    pub fn new(
        seasons: Array1<i32>,
        lats: Array1<f64>,
        lons: Array1<f64>,
        values: Array3<f64>,
    ) -> ClimateResult<Self> {
        let expected = (seasons.len(), lats.len(), lons.len());
        if values.dim() != expected {
            return Err(ClimateError::new(
                Stage::Season,
                format!(
                    "season field values have shape {:?}, axes imply {:?}",
                    values.dim(),
                    expected
                ),
            ));
        }
        check_season_axis(&seasons)?;
        Ok(SeasonField {
            seasons,
            lats,
            lons,
            values,
        })
    }

    pub fn cell_series(&self, i: usize, j: usize) -> SeasonSeries {
        SeasonSeries {
            seasons: self.seasons.clone(),
            values: self.values.slice(s![.., i, j]).to_owned(),
        }
    }
}

/// Pearson coefficients of an index against every cell of a field
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMap {
    pub lats: Array1<f64>,
    pub lons: Array1<f64>,
    pub values: Array2<f64>,
}

impl CorrelationMap {
    /// number of cells with a defined coefficient
    pub fn n_valid(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }
}
