use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use itertools::Itertools;
use log::debug;
use ndarray::{s, Array1, Array2, Array3, ArrayView1, Axis, Zip};

use crate::error::ClimateResult;
use crate::helpers::month_start;
use crate::models::{
    field::Field,
    season::{SeasonField, SeasonSeries},
    series::TimeSeries,
};

use super::{
    config::SeasonSpec,
    models::{SeasonAggregate, SeasonFieldAggregate},
};

/// mean of the non-NaN samples and their number
pub fn nan_mean_count(values: ArrayView1<f64>) -> (f64, usize) {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        (f64::NAN, 0)
    } else {
        (sum / count as f64, count)
    }
}

/// time indexes grouped by season label, in ascending label order
fn season_groups(time: &Array1<DateTime<Utc>>, spec: &SeasonSpec) -> Vec<(i32, Vec<usize>)> {
    time.iter()
        .enumerate()
        .filter_map(|(idx, t)| spec.label(t).map(|label| (label, idx)))
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(label, _)| *label)
        .collect()
}

/// Filter a series to the target months and average it per season
pub fn aggregate_series(series: &TimeSeries, spec: &SeasonSpec) -> SeasonAggregate {
    let groups = season_groups(&series.time, spec);

    let (seasons, (values, counts)): (Vec<i32>, (Vec<f64>, Vec<usize>)) = groups
        .iter()
        .map(|(label, idxs)| {
            let samples = series.values.select(Axis(0), idxs);
            (*label, nan_mean_count(samples.view()))
        })
        .unzip();

    SeasonAggregate {
        means: SeasonSeries {
            seasons: Array1::from(seasons),
            values: Array1::from(values),
        },
        counts: Array1::from(counts),
    }
}

/// Filter a field to the target months and average every cell per season
pub fn aggregate_field(field: &Field, spec: &SeasonSpec) -> SeasonFieldAggregate {
    let groups = season_groups(&field.time, spec);
    let (_, n_lats, n_lons) = field.values.dim();

    let mut means: Array3<f64> = Array3::from_elem((groups.len(), n_lats, n_lons), f64::NAN);
    let mut counts: Array3<usize> = Array3::zeros((groups.len(), n_lats, n_lons));

    for (k, (label, idxs)) in groups.iter().enumerate() {
        let samples = field.values.select(Axis(0), idxs);
        let stats: Array2<(f64, usize)> =
            Zip::from(samples.lanes(Axis(0))).par_map_collect(nan_mean_count);

        Zip::from(means.slice_mut(s![k, .., ..]))
            .and(counts.slice_mut(s![k, .., ..]))
            .and(&stats)
            .for_each(|m, c, (mean, count)| {
                *m = *mean;
                *c = *count;
            });
        debug!("season {label}: {} samples", idxs.len());
    }

    let seasons = groups.iter().map(|(label, _)| *label).collect::<Array1<i32>>();

    SeasonFieldAggregate {
        means: SeasonField {
            seasons,
            lats: field.lats.clone(),
            lons: field.lons.clone(),
            values: means,
        },
        counts,
    }
}

/// consecutive time indexes sharing a calendar month
fn month_groups(time: &Array1<DateTime<Utc>>) -> Vec<((i32, u32), Vec<usize>)> {
    time.iter()
        .enumerate()
        .chunk_by(|(_, t)| (t.year(), t.month()))
        .into_iter()
        .map(|(key, group)| (key, group.map(|(idx, _)| idx).collect()))
        .collect()
}

/// Average an hourly or daily series into calendar-month means
pub fn resample_monthly(series: &TimeSeries) -> ClimateResult<TimeSeries> {
    let groups = month_groups(&series.time);

    let time = groups
        .iter()
        .map(|((year, month), _)| month_start(*year, *month))
        .collect::<ClimateResult<Array1<DateTime<Utc>>>>()?;

    let values = groups
        .iter()
        .map(|(_, idxs)| nan_mean_count(series.values.select(Axis(0), idxs).view()).0)
        .collect::<Array1<f64>>();

    TimeSeries::new(time, values)
}

/// consecutive time indexes sharing a calendar day
fn day_groups(time: &Array1<DateTime<Utc>>) -> Vec<(NaiveDate, Vec<usize>)> {
    time.iter()
        .enumerate()
        .chunk_by(|(_, t)| t.date_naive())
        .into_iter()
        .map(|(day, group)| (day, group.map(|(idx, _)| idx).collect()))
        .collect()
}

/// Average an hourly series into daily means stamped at midnight UTC
pub fn resample_daily(series: &TimeSeries) -> ClimateResult<TimeSeries> {
    let groups = day_groups(&series.time);

    let time = groups
        .iter()
        .map(|(day, _)| Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)))
        .collect::<Array1<DateTime<Utc>>>();

    let values = groups
        .iter()
        .map(|(_, idxs)| nan_mean_count(series.values.select(Axis(0), idxs).view()).0)
        .collect::<Array1<f64>>();

    TimeSeries::new(time, values)
}

/// Average an hourly or daily field into calendar-month means
pub fn resample_field_monthly(field: &Field) -> ClimateResult<Field> {
    let groups = month_groups(&field.time);
    let (_, n_lats, n_lons) = field.values.dim();

    let time = groups
        .iter()
        .map(|((year, month), _)| month_start(*year, *month))
        .collect::<ClimateResult<Array1<DateTime<Utc>>>>()?;

    let mut values = Array3::from_elem((groups.len(), n_lats, n_lons), f64::NAN);
    for (k, (_, idxs)) in groups.iter().enumerate() {
        let samples = field.values.select(Axis(0), idxs);
        let means = Zip::from(samples.lanes(Axis(0))).par_map_collect(|lane| nan_mean_count(lane).0);
        values.slice_mut(s![k, .., ..]).assign(&means);
    }

    Field::new(time, field.lats.clone(), field.lons.clone(), values)
}
