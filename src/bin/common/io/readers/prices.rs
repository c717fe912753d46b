use std::path::Path;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use itertools::Itertools;
use log::debug;
use ndarray::Array1;
use serde_derive::{Deserialize, Serialize};

use woe::{
    error::{ClimateError, ClimateResult, Stage},
    models::series::TimeSeries,
};

fn default_date_column() -> String {
    "Date".into()
}

fn default_value_column() -> String {
    "Price".into()
}

fn default_date_format() -> String {
    "%m/%d/%Y".into()
}

/// A daily price table exported as CSV, by default in the Investing.com layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFileConfiguration {
    pub path: String,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    /// chrono format of the date column
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn csv_error(path: &Path, msg: impl std::fmt::Display) -> ClimateError {
    ClimateError::new(Stage::Input, format!("{}: {msg}", path.display()))
}

fn column(headers: &csv::StringRecord, name: &str, path: &Path) -> ClimateResult<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        .ok_or_else(|| csv_error(path, format!("no column named '{name}'")))
}

/// thousands separators are dropped, an empty cell is missing
fn parse_price(cell: &str) -> Result<f64, std::num::ParseFloatError> {
    let cell = cell.trim().replace(',', "");
    if cell.is_empty() {
        Ok(f64::NAN)
    } else {
        cell.parse()
    }
}

/// Daily prices stamped at midnight UTC, oldest first. When a date is
/// listed twice the first row wins.
pub fn read_price_csv(path: &Path, config: &PriceFileConfiguration) -> ClimateResult<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|err| csv_error(path, err))?;
    let headers = reader.headers().map_err(|err| csv_error(path, err))?.clone();
    let date_idx = column(&headers, &config.date_column, path)?;
    let value_idx = column(&headers, &config.value_column, path)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|err| csv_error(path, err))?;
        let (Some(date), Some(value)) = (record.get(date_idx), record.get(value_idx)) else {
            return Err(csv_error(path, format!("row {} is too short", line + 1)));
        };
        let date = NaiveDate::parse_from_str(date.trim(), &config.date_format)
            .map_err(|err| csv_error(path, format!("row {}: date '{date}': {err}", line + 1)))?;
        let value = parse_price(value)
            .map_err(|err| csv_error(path, format!("row {}: price '{value}': {err}", line + 1)))?;
        rows.push((date, value));
    }

    let (time, values): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .sorted_by_key(|(date, _)| *date)
        .dedup_by(|a, b| a.0 == b.0)
        .map(|(date, value)| (Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)), value))
        .unzip();
    debug!("{}: {} daily prices", path.display(), values.len());
    TimeSeries::new(Array1::from(time), Array1::from(values))
}
