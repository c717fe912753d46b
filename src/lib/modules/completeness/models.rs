use log::debug;
use ndarray::{Array1, Axis};
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::models::season::{SeasonField, SeasonSeries};

/// How the season mask of a gridded field is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum CompletenessMode {
    /// counts of one reference cell stand for the whole grid;
    /// the grid is then checked to have the same counts everywhere
    #[default]
    ReferencePoint,
    /// a season is kept only if every cell is complete
    AllLocations,
}

/// Which seasons have the full number of contributing samples
#[derive(Debug, Clone, PartialEq)]
pub struct CompletenessMask {
    pub seasons: Array1<i32>,
    pub keep: Array1<bool>,
    pub expected: usize,
}

impl CompletenessMask {
    pub fn kept_seasons(&self) -> Array1<i32> {
        self.seasons
            .iter()
            .zip(self.keep.iter())
            .filter(|(_, keep)| **keep)
            .map(|(season, _)| *season)
            .collect()
    }

    pub fn dropped_seasons(&self) -> Array1<i32> {
        self.seasons
            .iter()
            .zip(self.keep.iter())
            .filter(|(_, keep)| !**keep)
            .map(|(season, _)| *season)
            .collect()
    }

    pub fn n_kept(&self) -> usize {
        self.keep.iter().filter(|k| **k).count()
    }

    /// indexes of the kept seasons on an axis that must carry the mask's labels
    fn kept_indexes(&self, seasons: &Array1<i32>) -> ClimateResult<Vec<usize>> {
        if *seasons != self.seasons {
            return Err(ClimateError::new(
                Stage::Completeness,
                format!(
                    "season axis {:?} does not match the mask axis {:?}",
                    seasons.to_vec(),
                    self.seasons.to_vec()
                ),
            ));
        }
        Ok(self
            .keep
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(idx, _)| idx)
            .collect())
    }

    pub fn apply_series(&self, series: &SeasonSeries) -> ClimateResult<SeasonSeries> {
        let idxs = self.kept_indexes(&series.seasons)?;
        debug!(
            "completeness gate keeps {} of {} seasons",
            idxs.len(),
            series.len()
        );
        Ok(SeasonSeries {
            seasons: series.seasons.select(Axis(0), &idxs),
            values: series.values.select(Axis(0), &idxs),
        })
    }

    pub fn apply_field(&self, field: &SeasonField) -> ClimateResult<SeasonField> {
        let idxs = self.kept_indexes(&field.seasons)?;
        Ok(SeasonField {
            seasons: field.seasons.select(Axis(0), &idxs),
            lats: field.lats.clone(),
            lons: field.lons.clone(),
            values: field.values.select(Axis(0), &idxs),
        })
    }
}
