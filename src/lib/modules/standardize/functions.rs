use log::warn;
use ndarray::Array1;

use crate::models::season::SeasonSeries;

/// Sample standard deviation (ddof = 1) used by the standardizer
pub const DDOF: f64 = 1.0;

/// (mean, sample std) of a series; NaN for fewer than two values
pub fn mean_std(values: &Array1<f64>) -> (f64, f64) {
    let mean = values.mean().unwrap_or(f64::NAN);
    let std = if values.len() as f64 > DDOF {
        values.std(DDOF)
    } else {
        f64::NAN
    };
    (mean, std)
}

/// Rescale a series to zero mean and unit sample variance over its own span.
/// A zero or undefined standard deviation yields NaN values; callers decide
/// whether such a result is usable.
pub fn standardize(series: &SeasonSeries) -> SeasonSeries {
    if series.is_empty() {
        return series.clone();
    }
    let (mean, std) = mean_std(&series.values);
    if std.is_nan() || std <= 0.0 {
        warn!(
            "standardizing a degenerate series (std = {std}) over {} seasons",
            series.len()
        );
    }
    SeasonSeries {
        seasons: series.seasons.clone(),
        values: series.values.mapv(|x| (x - mean) / std),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn series(values: Vec<f64>) -> SeasonSeries {
        let seasons = (0..values.len() as i32).map(|s| 1950 + s).collect();
        SeasonSeries::new(seasons, Array1::from(values)).expect("valid")
    }

    #[test]
    fn sample_std_of_one_two_three_is_one() {
        let result = standardize(&series(vec![1.0, 2.0, 3.0]));
        assert_eq!(result.values.to_vec(), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn output_has_zero_mean_and_unit_std() {
        let result = standardize(&series(vec![1012.3, 1008.1, 1020.7, 1001.2, 1015.0, 998.4]));
        let (mean, std) = mean_std(&result.values);
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(std, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_yields_nan() {
        let result = standardize(&series(vec![5.0, 5.0, 5.0]));
        assert!(result.values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn single_value_yields_nan_and_empty_stays_empty() {
        assert!(standardize(&series(vec![5.0])).values[0].is_nan());
        assert!(standardize(&SeasonSeries::empty()).is_empty());
    }
}
