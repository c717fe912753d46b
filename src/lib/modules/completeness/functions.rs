use log::{debug, warn};
use ndarray::{s, Array1, Array3, Axis};

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::modules::season::models::{SeasonAggregate, SeasonFieldAggregate};

use super::models::{CompletenessMask, CompletenessMode};

fn check_counts_axis(seasons: &Array1<i32>, n_counts: usize) -> ClimateResult<()> {
    if seasons.len() != n_counts {
        return Err(ClimateError::new(
            Stage::Completeness,
            format!("{} seasons but {} counts", seasons.len(), n_counts),
        ));
    }
    Ok(())
}

/// Keep the seasons whose count reaches `expected`
pub fn mask_from_counts(
    seasons: &Array1<i32>,
    counts: &Array1<usize>,
    expected: usize,
) -> ClimateResult<CompletenessMask> {
    check_counts_axis(seasons, counts.len())?;
    let keep = counts.mapv(|c| c >= expected);
    let mask = CompletenessMask {
        seasons: seasons.clone(),
        keep,
        expected,
    };
    let dropped = mask.dropped_seasons();
    if !dropped.is_empty() {
        debug!("incomplete seasons dropped: {:?}", dropped.to_vec());
    }
    Ok(mask)
}

pub fn mask_for_series(aggregate: &SeasonAggregate, expected: usize) -> ClimateResult<CompletenessMask> {
    mask_from_counts(&aggregate.means.seasons, &aggregate.counts, expected)
}

/// Mask built from the counts of a single grid cell
pub fn mask_from_reference_point(
    aggregate: &SeasonFieldAggregate,
    cell: (usize, usize),
    expected: usize,
) -> ClimateResult<CompletenessMask> {
    let (_, n_lats, n_lons) = aggregate.counts.dim();
    let (i, j) = cell;
    if i >= n_lats || j >= n_lons {
        return Err(ClimateError::new(
            Stage::Completeness,
            format!("reference cell ({i}, {j}) outside a {n_lats}x{n_lons} grid"),
        ));
    }
    let counts = aggregate.counts.slice(s![.., i, j]).to_owned();
    mask_from_counts(aggregate.seasons(), &counts, expected)
}

/// Mask keeping a season only when every cell of the grid is complete
pub fn mask_all_locations(
    aggregate: &SeasonFieldAggregate,
    expected: usize,
) -> ClimateResult<CompletenessMask> {
    let min_counts = aggregate
        .counts
        .map_axis(Axis(2), |lane| lane.iter().copied().min().unwrap_or(0))
        .map_axis(Axis(1), |lane| lane.iter().copied().min().unwrap_or(0));
    mask_from_counts(aggregate.seasons(), &min_counts, expected)
}

pub fn build_field_mask(
    aggregate: &SeasonFieldAggregate,
    mode: CompletenessMode,
    reference: (usize, usize),
    expected: usize,
) -> ClimateResult<CompletenessMask> {
    match mode {
        CompletenessMode::ReferencePoint => {
            let mask = mask_from_reference_point(aggregate, reference, expected)?;
            ensure_consistent(&mask, aggregate.seasons(), &aggregate.counts)?;
            Ok(mask)
        }
        CompletenessMode::AllLocations => mask_all_locations(aggregate, expected),
    }
}

/// Enforce that a shared mask is valid for a consumer field: every kept
/// season must be complete at every cell of `counts` (season, lat, lon).
pub fn ensure_consistent(
    mask: &CompletenessMask,
    seasons: &Array1<i32>,
    counts: &Array3<usize>,
) -> ClimateResult<()> {
    check_counts_axis(seasons, counts.len_of(Axis(0)))?;
    for (season, keep) in mask.seasons.iter().zip(mask.keep.iter()) {
        if !keep {
            continue;
        }
        let k = seasons.iter().position(|s| s == season).ok_or_else(|| {
            ClimateError::new(
                Stage::Completeness,
                format!("season {season} kept by the mask is missing from the field"),
            )
        })?;
        let slab = counts.index_axis(Axis(0), k);
        if let Some(((i, j), count)) = slab.indexed_iter().find(|(_, c)| **c < mask.expected) {
            warn!("season {season} is incomplete at cell ({i}, {j})");
            return Err(ClimateError::new(
                Stage::Completeness,
                format!(
                    "shared mask keeps season {season} but cell ({i}, {j}) has {count} of {} samples; \
                     missingness is not uniform, build the mask per location",
                    mask.expected
                ),
            ));
        }
    }
    Ok(())
}
