use std::fs;
use std::path::PathBuf;

use log::debug;
use ndarray::Array2;
use serde_json::{json, Value};

use woe::error::{ClimateError, ClimateResult, Stage};

use super::prelude::{OutputSink, Product};

/// Writes one pretty-printed JSON document per product, `null` for NaN
pub struct JsonWriter {
    dir: PathBuf,
}

impl JsonWriter {
    pub fn new(dir: PathBuf) -> Self {
        JsonWriter { dir }
    }
}

fn number(v: f64) -> Value {
    if v.is_finite() {
        json!(v)
    } else {
        Value::Null
    }
}

fn numbers<'a>(values: impl IntoIterator<Item = &'a f64>) -> Value {
    Value::Array(values.into_iter().map(|v| number(*v)).collect())
}

fn rows(values: &Array2<f64>) -> Value {
    Value::Array(values.outer_iter().map(|row| numbers(row.iter())).collect())
}

/// JSON representation of a product
pub fn to_json(product: &Product) -> Value {
    match product {
        Product::Seasons(series) => json!({
            "season": series.seasons.to_vec(),
            "value": numbers(series.values.iter()),
        }),
        Product::Series(series) => json!({
            "time": series.time.iter().map(|t| t.to_rfc3339()).collect::<Vec<_>>(),
            "value": numbers(series.values.iter()),
        }),
        Product::Map(map) => json!({
            "latitude": numbers(map.lats.iter()),
            "longitude": numbers(map.lons.iter()),
            "correlation": rows(&map.values),
        }),
        Product::Mask(mask) => json!({
            "expected": mask.expected,
            "kept": mask.kept_seasons().to_vec(),
            "dropped": mask.dropped_seasons().to_vec(),
        }),
        Product::Points(points) => json!(points),
        Product::Climatology(values) => json!({
            "month": (1..=12).collect::<Vec<u32>>(),
            "value": numbers(values.iter()),
        }),
        Product::MonthCorrelation(corr) => json!({
            "month": corr.months,
            "years": corr.years,
            "correlation": rows(&corr.matrix),
        }),
        Product::Dunkelflaute(result) => json!({
            "time": result.time.iter().map(|t| t.to_rfc3339()).collect::<Vec<_>>(),
            "flag": result.flags.to_vec(),
            "wind_threshold": number(result.wind_threshold),
            "solar_threshold": number(result.solar_threshold),
            "count_by_month": result.count_by_month,
            "frequency_by_month": numbers(result.frequency_by_month.iter()),
        }),
        Product::Elevation(table) => json!({
            "site": table.site,
            "local_hour": numbers(table.local_hours.iter()),
            "day": table.days.to_vec(),
            "elevation": rows(&table.values),
        }),
        Product::Metrics(metrics) => json!(metrics),
    }
}

impl OutputSink for JsonWriter {
    fn write(&mut self, name: &str, product: &Product) -> ClimateResult<()> {
        let file = self.dir.join(format!("{name}.json"));
        let contents = serde_json::to_string_pretty(&to_json(product))
            .map_err(|err| ClimateError::new(Stage::Output, format!("{name}: {err}")))?;
        fs::write(&file, contents).map_err(|err| {
            ClimateError::new(
                Stage::Output,
                format!("cannot write {}: {err}", file.display()),
            )
        })?;
        debug!("written {}", file.display());
        Ok(())
    }
}
