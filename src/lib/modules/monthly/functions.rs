use std::collections::HashMap;

use chrono::Datelike;
use itertools::Itertools;
use log::debug;
use ndarray::{Array1, Array2, Axis};

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::models::series::TimeSeries;
use crate::modules::{
    correlation::functions::pearson_pairwise, regional::functions::nan_quantile,
    season::functions::nan_mean_count,
};

use super::models::{DunkelflauteResult, MonthCorrelation};

/// Mean of every calendar month over all years, January first
pub fn monthly_climatology(series: &TimeSeries) -> [f64; 12] {
    let groups = series
        .time
        .iter()
        .zip(series.values.iter())
        .map(|(t, v)| (t.month0() as usize, *v))
        .into_group_map();

    let mut climatology = [f64::NAN; 12];
    for (month0, values) in groups {
        climatology[month0] = nan_mean_count(Array1::from(values).view()).0;
    }
    climatology
}

/// Departure of every sample from the climatology of its calendar month
pub fn monthly_anomalies(series: &TimeSeries) -> TimeSeries {
    let climatology = monthly_climatology(series);
    let values = series
        .time
        .iter()
        .zip(series.values.iter())
        .map(|(t, v)| v - climatology[t.month0() as usize])
        .collect();
    TimeSeries {
        time: series.time.clone(),
        values,
    }
}

fn check_start_month(year_start_month: u32) -> ClimateResult<()> {
    if !(1..=12).contains(&year_start_month) {
        return Err(ClimateError::new(
            Stage::Monthly,
            format!("invalid month number {year_start_month}"),
        ));
    }
    Ok(())
}

/// Calendar months in the order of a year starting at `year_start_month`
pub fn month_order(year_start_month: u32) -> Vec<u32> {
    (0..12).map(|k| (year_start_month - 1 + k) % 12 + 1).collect()
}

/// Pivot a monthly series into a (group year, month) table. Months before
/// `year_start_month` belong to the previous group year.
pub fn pivot_years(series: &TimeSeries, year_start_month: u32) -> ClimateResult<(Vec<i32>, Array2<f64>)> {
    check_start_month(year_start_month)?;
    let order = month_order(year_start_month);

    let mut cells: HashMap<(i32, usize), f64> = HashMap::new();
    for (t, v) in series.time.iter().zip(series.values.iter()) {
        let year = if t.month() >= year_start_month {
            t.year()
        } else {
            t.year() - 1
        };
        let col = order.iter().position(|m| *m == t.month()).unwrap_or_default();
        if cells.insert((year, col), *v).is_some() {
            return Err(ClimateError::new(
                Stage::Monthly,
                format!(
                    "more than one value for {}-{:02}, resample to monthly means first",
                    t.year(),
                    t.month()
                ),
            ));
        }
    }

    let years: Vec<i32> = cells.keys().map(|(year, _)| *year).unique().sorted().collect();
    let mut table = Array2::from_elem((years.len(), 12), f64::NAN);
    for (row, year) in years.iter().enumerate() {
        for col in 0..12 {
            if let Some(v) = cells.get(&(*year, col)) {
                table[[row, col]] = *v;
            }
        }
    }
    Ok((years, table))
}

/// Pearson correlation between every pair of calendar months across years,
/// using the years where both months are defined
pub fn month_correlation(series: &TimeSeries, year_start_month: u32) -> ClimateResult<MonthCorrelation> {
    let (years, table) = pivot_years(series, year_start_month)?;
    let matrix = Array2::from_shape_fn((12, 12), |(a, b)| {
        pearson_pairwise(table.column(a), table.column(b))
    });
    debug!("month correlation over {} years", years.len());
    Ok(MonthCorrelation {
        months: month_order(year_start_month),
        years,
        matrix,
    })
}

/// Flag the months where wind and solar are both below their own
/// `quantile` (linear interpolation over the whole record)
pub fn dunkelflaute(wind: &TimeSeries, solar: &TimeSeries, quantile: f64) -> ClimateResult<DunkelflauteResult> {
    if wind.time != solar.time {
        return Err(ClimateError::new(
            Stage::Monthly,
            "wind and solar series must share the same time axis",
        ));
    }
    if !(0.0..=1.0).contains(&quantile) {
        return Err(ClimateError::new(
            Stage::Monthly,
            format!("quantile {quantile} outside [0, 1]"),
        ));
    }
    let threshold = |values: &Array1<f64>| {
        nan_quantile(values, quantile).map_err(|err| ClimateError::new(Stage::Monthly, err.message()))
    };
    let wind_threshold = threshold(&wind.values)?;
    let solar_threshold = threshold(&solar.values)?;

    let flags: Array1<bool> = wind
        .values
        .iter()
        .zip(solar.values.iter())
        .map(|(w, s)| *w < wind_threshold && *s < solar_threshold)
        .collect();

    let mut count_by_month = [0usize; 12];
    let mut samples_by_month = [0usize; 12];
    for (t, flag) in wind.time.iter().zip(flags.iter()) {
        let m = t.month0() as usize;
        samples_by_month[m] += 1;
        if *flag {
            count_by_month[m] += 1;
        }
    }
    let mut frequency_by_month = [f64::NAN; 12];
    for m in 0..12 {
        if samples_by_month[m] > 0 {
            frequency_by_month[m] = count_by_month[m] as f64 / samples_by_month[m] as f64;
        }
    }

    let result = DunkelflauteResult {
        time: wind.time.clone(),
        flags,
        wind_threshold,
        solar_threshold,
        count_by_month,
        frequency_by_month,
    };
    debug!(
        "{} of {} months below both thresholds",
        result.n_flagged(),
        result.flags.len_of(Axis(0))
    );
    Ok(result)
}
