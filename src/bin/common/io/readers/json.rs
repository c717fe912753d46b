use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use ndarray::Array1;
use serde_json::{Map, Value};

use woe::{
    error::{ClimateError, ClimateResult, Stage},
    models::field::Field,
};

use super::prelude::{assemble_field, FieldReader, InputConfiguration, RawAxes};

/// Reads a JSON document holding the axes and the variables of a dataset
/// as top level arrays. Variables are row-major, flat or nested, with
/// `null` for missing values.
#[derive(Debug, Default)]
pub struct JsonFieldReader;

fn input_error(path: &Path, msg: impl std::fmt::Display) -> ClimateError {
    ClimateError::new(Stage::Input, format!("{}: {msg}", path.display()))
}

fn array<'a>(doc: &'a Map<String, Value>, name: &str, path: &Path) -> ClimateResult<&'a Vec<Value>> {
    doc.get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| input_error(path, format!("no array named '{name}'")))
}

/// depth-first flattening of nested arrays, null becomes NaN
fn flatten_into(value: &Value, out: &mut Vec<f64>) -> Result<(), String> {
    match value {
        Value::Array(items) => items.iter().try_for_each(|item| flatten_into(item, out)),
        Value::Null => {
            out.push(f64::NAN);
            Ok(())
        }
        Value::Number(n) => {
            out.push(n.as_f64().unwrap_or(f64::NAN));
            Ok(())
        }
        other => Err(format!("unexpected value {other}")),
    }
}

fn numbers(doc: &Map<String, Value>, name: &str, path: &Path) -> ClimateResult<Vec<f64>> {
    let mut out = Vec::new();
    for item in array(doc, name, path)? {
        flatten_into(item, &mut out).map_err(|err| input_error(path, format!("{name}: {err}")))?;
    }
    Ok(out)
}

fn times(doc: &Map<String, Value>, name: &str, path: &Path) -> ClimateResult<Array1<DateTime<Utc>>> {
    array(doc, name, path)?
        .iter()
        .map(|item| {
            item.as_str()
                .and_then(|s| s.parse::<DateTime<Utc>>().ok())
                .ok_or_else(|| input_error(path, format!("{name}: invalid timestamp {item}")))
        })
        .collect()
}

impl FieldReader for JsonFieldReader {
    fn read_field(&self, path: &Path, config: &InputConfiguration) -> ClimateResult<Field> {
        let contents = fs::read_to_string(path).map_err(|err| input_error(path, err))?;
        let doc: Map<String, Value> =
            serde_json::from_str(&contents).map_err(|err| input_error(path, err))?;

        let levels = if doc.contains_key(&config.level_name) {
            Some(Array1::from(numbers(&doc, &config.level_name, path)?))
        } else {
            None
        };
        let axes = RawAxes {
            time: times(&doc, &config.time_name, path)?,
            levels,
            lats: Array1::from(numbers(&doc, &config.lat_name, path)?),
            lons: Array1::from(numbers(&doc, &config.lon_name, path)?),
        };
        let values = numbers(&doc, &config.variable, path)?;
        debug!(
            "read {} values of {} from {}",
            values.len(),
            config.variable,
            path.display()
        );
        assemble_field(axes, values, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn reads_nested_values_with_nulls() {
        let path = temp_dir().join("woe-climate-json-reader.json");
        let doc = r#"{
            "time": ["2000-01-01T00:00:00Z", "2000-02-01T00:00:00Z"],
            "latitude": [60.0, 40.0],
            "longitude": [350.0],
            "msl": [[[101000.0], [102000.0]], [[null], [101500.0]]]
        }"#;
        fs::write(&path, doc).expect("should write");

        let config = InputConfiguration::new("ignored", "msl");
        let field = JsonFieldReader.read_field(&path, &config).expect("should read");
        assert_eq!(field.values.dim(), (2, 2, 1));
        assert_eq!(field.values[[0, 1, 0]], 102000.0);
        assert!(field.values[[1, 0, 0]].is_nan());

        let missing = InputConfiguration::new("ignored", "t2m");
        assert!(JsonFieldReader.read_field(&path, &missing).is_err());
        fs::remove_file(&path).expect("should remove");
    }
}
