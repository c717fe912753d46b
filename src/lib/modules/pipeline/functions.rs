use std::time::Instant;

use log::{debug, info, warn};

use crate::error::ClimateResult;
use crate::models::{field::Field, season::CorrelationMap};
use crate::modules::{
    completeness::functions::{build_field_mask, ensure_consistent},
    correlation::functions::correlate_field,
    extract::functions::locate_station,
    index::functions::combine_index,
    season::functions::{aggregate_field, resample_field_monthly},
    standardize::functions::standardize,
};

use super::config::IndexConfig;
use super::models::IndexResult;

/// Season aggregation, completeness gate, station extraction,
/// standardization, combination and correlation, in this order.
/// Sources finer than monthly are averaged to calendar months first, so a
/// full season always holds one sample per month.
#[derive(Debug, Clone, Default)]
pub struct IndexPipeline {
    config: IndexConfig,
}

impl IndexPipeline {
    pub fn new(config: IndexConfig) -> Self {
        IndexPipeline { config }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn run(&self, field: &Field) -> ClimateResult<IndexResult> {
        let start = Instant::now();
        let config = &self.config;
        let expected = config.season.expected_count();

        let monthly = resample_field_monthly(field)?;
        let aggregate = aggregate_field(&monthly, &config.season);
        info!(
            "aggregated {} samples ({} months) into {} seasons over a {}x{} grid",
            field.len(),
            monthly.len(),
            aggregate.seasons().len(),
            field.lats.len(),
            field.lons.len()
        );

        let point_a = locate_station(&aggregate.means, &config.station_a)?;
        let point_b = locate_station(&aggregate.means, &config.station_b)?;

        let mask = build_field_mask(
            &aggregate,
            config.completeness,
            (point_a.row, point_a.col),
            expected,
        )?;
        let kept = mask.apply_field(&aggregate.means)?;
        info!(
            "{} of {} seasons complete ({} mode)",
            mask.n_kept(),
            mask.seasons.len(),
            config.completeness
        );
        if kept.seasons.is_empty() {
            warn!("no complete season left, the index will be empty");
        }

        let standardized_a = standardize(&kept.cell_series(point_a.row, point_a.col));
        let standardized_b = standardize(&kept.cell_series(point_b.row, point_b.col));
        let index = combine_index(&standardized_a, &standardized_b);
        debug!("index over seasons {:?}", index.seasons.to_vec());

        let correlation = correlate_field(&index, &kept)?;

        info!("index computed in {:?}", start.elapsed());
        Ok(IndexResult {
            index,
            standardized_a,
            standardized_b,
            correlation,
            mask,
            points: vec![point_a, point_b],
        })
    }

    /// Correlate an existing index with a further variable. The variable is
    /// aggregated with the same seasons and must be complete wherever the
    /// shared mask keeps a season.
    pub fn correlate_with(&self, result: &IndexResult, other: &Field) -> ClimateResult<CorrelationMap> {
        let monthly = resample_field_monthly(other)?;
        let aggregate = aggregate_field(&monthly, &self.config.season);
        ensure_consistent(&result.mask, aggregate.seasons(), &aggregate.counts)?;
        let kept = result.mask.apply_field(&aggregate.means)?;
        correlate_field(&result.index, &kept)
    }
}
