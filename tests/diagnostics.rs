use ndarray::{Array1, Array3};

use woe::{
    helpers::{add_months, month_start},
    models::field::Field,
    modules::{
        derived::functions::{joules_to_kwh, wind_speed_field},
        monthly::functions::{dunkelflaute, month_correlation, monthly_anomalies, monthly_climatology},
        regional::{
            functions::regional_aggregate,
            models::{LatLonBox, RegionMask, SpatialAggregation},
        },
        season::functions::resample_field_monthly,
        solar::{
            functions::{daylight_hours, elevation_table},
            models::SolarSite,
        },
    },
};

const YEARS: usize = 6;

fn monthly_field(fun: impl Fn(usize, usize, usize) -> f64) -> Field {
    let n = YEARS * 12;
    let start = month_start(2015, 1).expect("valid date");
    let time = (0..n as u32)
        .map(|k| add_months(&start, k).expect("valid date"))
        .collect();
    let mut values = Array3::zeros((n, 3, 4));
    for ((t, i, j), v) in values.indexed_iter_mut() {
        *v = fun(t, i, j);
    }
    Field::new(
        time,
        Array1::from(vec![55.0, 51.0, 47.0]),
        Array1::from(vec![2.0, 6.0, 10.0, 14.0]),
        values,
    )
    .expect("valid field")
}

fn germany(field: &Field) -> RegionMask {
    RegionMask::from_box(
        field.lats.clone(),
        field.lons.clone(),
        &LatLonBox {
            lat_min: 47.0,
            lat_max: 55.0,
            lon_min: 5.0,
            lon_max: 15.0,
        },
    )
}

#[test]
fn wind_and_solar_chain() {
    // windy winters, sunny summers, one calm and dark January
    let winter = |t: usize| matches!(t % 12, 0 | 1 | 10 | 11);
    let u = monthly_field(|t, _, _| match t {
        24 => 1.0,
        _ if winter(t) => 6.0,
        _ => 3.0,
    });
    let v = monthly_field(|t, i, _| if t == 24 { 0.0 } else { 4.0 + i as f64 });
    let ssrd = monthly_field(|t, _, _| {
        let month = (t % 12) as f64;
        3.6e6 * (6.0 - (month - 5.5).abs())
    });

    let speed = wind_speed_field(&u, &v).expect("same axes");
    let region = germany(&speed);
    assert_eq!(region.n_cells(), 9);

    let wind = regional_aggregate(&speed, &region, SpatialAggregation::Mean).expect("valid");
    let solar = regional_aggregate(&ssrd.mapv(joules_to_kwh), &region, SpatialAggregation::Mean)
        .expect("valid");

    let climatology = monthly_climatology(&solar);
    assert!((climatology[5] - 5.5).abs() < 1e-12);
    assert!((climatology[0] - 0.5).abs() < 1e-12);
    assert!(monthly_anomalies(&solar).values.iter().all(|a| a.abs() < 1e-12));

    let corr = month_correlation(&wind, 7).expect("valid");
    assert_eq!(corr.months[0], 7);
    assert!(corr.matrix.iter().all(|r| r.is_nan() || r.abs() <= 1.0));

    let result = dunkelflaute(&wind, &solar, 0.25).expect("same axes");
    // the calm January of 2017 is the only month below both thresholds
    assert_eq!(result.n_flagged(), 1);
    assert!(result.flags[24]);
    assert_eq!(result.count_by_month[0], 1);
    assert!((result.frequency_by_month[0] - 1.0 / YEARS as f64).abs() < 1e-12);
}

#[test]
fn spread_statistics_over_a_region() {
    let field = monthly_field(|t, i, j| (t + i * 4 + j) as f64);
    let region = germany(&field);
    let max = regional_aggregate(&field, &region, SpatialAggregation::Max).expect("valid");
    let min = regional_aggregate(&field, &region, SpatialAggregation::Min).expect("valid");
    let std = regional_aggregate(&field, &region, SpatialAggregation::Std).expect("valid");
    for t in 0..field.len() {
        assert_eq!(max.values[t] - min.values[t], 10.0);
        assert!(std.values[t] > 0.0);
    }
}

#[test]
fn hourly_samples_are_averaged_before_seasonal_work() {
    let start = month_start(2020, 1).expect("valid date");
    let time: Array1<_> = (0..24 * 60)
        .map(|h| start + chrono::Duration::hours(h))
        .collect();
    let values = Array3::from_shape_fn((time.len(), 1, 1), |(h, _, _)| if h < 24 * 31 { 1.0 } else { 3.0 });
    let field = Field::new(time, Array1::from(vec![50.0]), Array1::from(vec![10.0]), values)
        .expect("valid field");
    let monthly = resample_field_monthly(&field).expect("valid");
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly.values[[0, 0, 0]], 1.0);
    assert_eq!(monthly.values[[1, 0, 0]], 3.0);
}

#[test]
fn solar_tables_agree_with_day_length() {
    let site = SolarSite::munich();
    let table = elevation_table(&site, 15).expect("valid step");
    for day in [1u32, 81, 172, 266, 355] {
        let sunlit = table.sunlit_hours(day).expect("day in table");
        assert!((sunlit - daylight_hours(site.lat, day as f64)).abs() <= 0.5);
    }
}
