use log::debug;
use ndarray::{ArrayView1, Axis, Zip};

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::models::season::{CorrelationMap, SeasonField, SeasonSeries};

/// Pearson correlation coefficient of two equally long series.
/// NaN when either series is constant (or contains NaN).
pub fn pearson(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let n = x.len();
    if n == 0 || n != y.len() {
        return f64::NAN;
    }
    let mx = x.sum() / n as f64;
    let my = y.sum() / n as f64;

    let (sxy, sxx, syy) = Zip::from(&x).and(&y).fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), a, b| {
        let dx = a - mx;
        let dy = b - my;
        (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
    });

    let r = sxy / (sxx * syy).sqrt();
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        f64::NAN
    }
}

/// Pearson correlation over the pairs where both values are defined
pub fn pearson_pairwise(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip();
    pearson(ArrayView1::from(&xs), ArrayView1::from(&ys))
}

/// Correlate a season-indexed series with every cell of a season field.
/// Both inputs must carry the identical, already filtered season axis.
pub fn correlate_field(index: &SeasonSeries, field: &SeasonField) -> ClimateResult<CorrelationMap> {
    if index.seasons != field.seasons {
        return Err(ClimateError::new(
            Stage::Correlator,
            format!(
                "index covers seasons {:?} but the field covers {:?}; \
                 apply the same completeness mask to both inputs",
                index.seasons.to_vec(),
                field.seasons.to_vec()
            ),
        ));
    }

    let x = index.values.view();
    let values = Zip::from(field.values.lanes(Axis(0))).par_map_collect(|lane| pearson(x, lane));

    let map = CorrelationMap {
        lats: field.lats.clone(),
        lons: field.lons.clone(),
        values,
    };
    debug!(
        "correlation map: {} of {} cells defined",
        map.n_valid(),
        map.values.len()
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array3};

    #[test]
    fn perfect_and_anti_correlation() {
        let x = Array1::from(vec![1.0, 2.0, 3.0, 4.0]);
        let y = x.mapv(|v| 3.0 * v + 1.0);
        assert_abs_diff_eq!(pearson(x.view(), y.view()), 1.0, epsilon = 1e-12);
        let z = x.mapv(|v| -v);
        assert_abs_diff_eq!(pearson(x.view(), z.view()), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_is_undefined() {
        let x = Array1::from(vec![1.0, 2.0, 3.0]);
        let c = Array1::from(vec![7.0, 7.0, 7.0]);
        assert!(pearson(x.view(), c.view()).is_nan());
    }

    #[test]
    fn pairwise_skips_missing_values() {
        let x = Array1::from(vec![1.0, 2.0, f64::NAN, 4.0]);
        let y = Array1::from(vec![2.0, 4.0, 100.0, 8.0]);
        assert_abs_diff_eq!(pearson_pairwise(x.view(), y.view()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn field_correlation_is_bounded_and_nan_on_constant_cells() {
        let seasons = Array1::from(vec![1950, 1951, 1952, 1953, 1954]);
        let index = SeasonSeries::new(seasons.clone(), Array1::from(vec![0.3, -1.2, 0.8, 1.9, -0.4]))
            .expect("valid");
        let mut values = Array3::zeros((5, 2, 2));
        for ((k, i, j), v) in values.indexed_iter_mut() {
            *v = match (i, j) {
                (0, 0) => index.values[k] * 2.0,
                (0, 1) => -index.values[k],
                (1, 0) => ((k * 7 + 3) % 5) as f64,
                _ => 1.0,
            };
        }
        let field = SeasonField::new(seasons, Array1::from(vec![60.0, 40.0]), Array1::from(vec![-20.0, 0.0]), values)
            .expect("valid");

        let map = correlate_field(&index, &field).expect("same axes");
        assert_abs_diff_eq!(map.values[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(map.values[[0, 1]], -1.0, epsilon = 1e-12);
        assert!(map.values[[1, 0]].abs() <= 1.0);
        assert!(map.values[[1, 1]].is_nan());
        assert_eq!(map.n_valid(), 3);
    }

    #[test]
    fn mismatched_axes_are_rejected() {
        let index = SeasonSeries::new(Array1::from(vec![1950, 1951]), Array1::from(vec![0.0, 1.0]))
            .expect("valid");
        let field = SeasonField::new(
            Array1::from(vec![1950, 1952]),
            Array1::from(vec![0.0]),
            Array1::from(vec![0.0]),
            Array3::zeros((2, 1, 1)),
        )
        .expect("valid");
        let err = correlate_field(&index, &field).expect_err("should fail");
        assert_eq!(err.stage(), Stage::Correlator);
    }
}
