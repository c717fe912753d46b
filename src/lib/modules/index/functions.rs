use std::collections::HashMap;

use ndarray::Array1;

use crate::models::season::SeasonSeries;

/// `a - b` over the season labels present in both series (inner join),
/// in ascending season order. The order of the operands is the sign
/// convention of the index and must not be swapped.
pub fn combine_index(a: &SeasonSeries, b: &SeasonSeries) -> SeasonSeries {
    let b_by_season: HashMap<i32, f64> = b
        .seasons
        .iter()
        .copied()
        .zip(b.values.iter().copied())
        .collect();

    let (seasons, values): (Vec<i32>, Vec<f64>) = a
        .seasons
        .iter()
        .zip(a.values.iter())
        .filter_map(|(season, va)| b_by_season.get(season).map(|vb| (*season, va - vb)))
        .unzip();

    SeasonSeries {
        seasons: Array1::from(seasons),
        values: Array1::from(values),
    }
}
