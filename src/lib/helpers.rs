use cftime_rs::{calendars::Calendar, datetime::CFDatetime, decoder::CFDecoder};
use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::error::{ClimateError, ClimateResult, Stage};

/// first instant of the given month
pub fn month_start(year: i32, month: u32) -> ClimateResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ClimateError::new(Stage::Input, format!("invalid month {year}-{month}")))
}

pub fn add_months(date: &DateTime<Utc>, months: u32) -> ClimateResult<DateTime<Utc>> {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    month_start(year, month)
}

fn to_utc(datetime: &CFDatetime) -> ClimateResult<DateTime<Utc>> {
    let (year, month, day, hour, minute, second) = datetime
        .ymd_hms()
        .map_err(|err| ClimateError::new(Stage::Input, format!("invalid CF datetime: {err:?}")))?;
    Utc.with_ymd_and_hms(
        year as i32,
        month as u32,
        day as u32,
        hour as u32,
        minute as u32,
        second as u32,
    )
    .single()
    .ok_or_else(|| {
        ClimateError::new(
            Stage::Input,
            format!("{year}-{month}-{day} {hour}:{minute}:{second} is not a valid UTC time"),
        )
    })
}

/// Decode CF time values ("<unit> since <reference>") into UTC datetimes.
/// Only the standard calendar is supported, which is what ERA5 files carry.
pub fn decode_cf_time(units: &str, values: &[f64]) -> ClimateResult<Vec<DateTime<Utc>>> {
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(ClimateError::new(
            Stage::Input,
            format!("time value {} at index {pos} is not a number", values[pos]),
        ));
    }
    let datetimes = values
        .to_vec()
        .decode_cf(units, Calendar::Standard)
        .map_err(|err| ClimateError::new(Stage::Input, format!("invalid time units '{units}': {err:?}")))?;
    datetimes.iter().map(to_utc).collect()
}
