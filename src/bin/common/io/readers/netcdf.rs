use std::path::Path;

use log::{debug, warn};
use ndarray::Array1;
use netcdf::{extent::Extents, AttributeValue, Variable};

use woe::{
    error::{ClimateError, ClimateResult, Stage},
    helpers::decode_cf_time,
    models::field::Field,
};

use super::prelude::{assemble_field, FieldReader, InputConfiguration, RawAxes};

/// Reads CF-style NetCDF files as distributed by the CDS (ERA5)
#[derive(Debug, Default)]
pub struct NetCdfFieldReader;

fn input_error(path: &Path, msg: impl std::fmt::Display) -> ClimateError {
    ClimateError::new(Stage::Input, format!("{}: {msg}", path.display()))
}

fn numeric_attribute(var: &Variable, name: &str) -> Option<f64> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(v as f64),
        AttributeValue::Short(v) => Some(v as f64),
        AttributeValue::Schar(v) => Some(v as f64),
        AttributeValue::Uchar(v) => Some(v as f64),
        _ => None,
    }
}

fn string_attribute(var: &Variable, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn read_axis(file: &netcdf::File, name: &str, path: &Path) -> ClimateResult<Array1<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| input_error(path, format!("could not find variable {name}")))?;
    let values = var
        .values::<f64, _>(Extents::All)
        .map_err(|err| input_error(path, err))?
        .into_iter()
        .collect::<Array1<f64>>();
    Ok(values)
}

impl FieldReader for NetCdfFieldReader {
    fn read_field(&self, path: &Path, config: &InputConfiguration) -> ClimateResult<Field> {
        let file = netcdf::open(path).map_err(|err| input_error(path, err))?;

        let time_var = file
            .variable(&config.time_name)
            .ok_or_else(|| input_error(path, format!("could not find variable {}", config.time_name)))?;
        let units = string_attribute(&time_var, "units")
            .ok_or_else(|| input_error(path, format!("{} has no units", config.time_name)))?;
        let raw_time = time_var
            .values::<f64, _>(Extents::All)
            .map_err(|err| input_error(path, err))?
            .into_iter()
            .collect::<Vec<f64>>();
        let time = Array1::from(decode_cf_time(&units, &raw_time)?);

        let var = file
            .variable(&config.variable)
            .ok_or_else(|| input_error(path, format!("could not find variable {}", config.variable)))?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let levels = if dims.contains(&config.level_name) {
            Some(read_axis(&file, &config.level_name, path)?)
        } else {
            None
        };
        let mut expected = vec![config.time_name.clone()];
        if levels.is_some() {
            expected.push(config.level_name.clone());
        }
        expected.extend([config.lat_name.clone(), config.lon_name.clone()]);
        if dims != expected {
            return Err(input_error(
                path,
                format!("{} has dimensions {dims:?}, expected {expected:?}", config.variable),
            ));
        }

        let scale = numeric_attribute(&var, "scale_factor").unwrap_or(1.0);
        let offset = numeric_attribute(&var, "add_offset").unwrap_or(0.0);
        let fill = numeric_attribute(&var, "_FillValue").or_else(|| numeric_attribute(&var, "missing_value"));
        if fill.is_none() {
            warn!("{} carries no fill value, no sample is treated as missing", config.variable);
        }

        let values = var
            .values::<f64, _>(Extents::All)
            .map_err(|err| input_error(path, err))?
            .into_iter()
            .map(|raw| match fill {
                Some(fill) if raw == fill => f64::NAN,
                _ => raw * scale + offset,
            })
            .collect::<Vec<f64>>();
        debug!(
            "read {} values of {} from {}",
            values.len(),
            config.variable,
            path.display()
        );

        let axes = RawAxes {
            time,
            levels,
            lats: read_axis(&file, &config.lat_name, path)?,
            lons: read_axis(&file, &config.lon_name, path)?,
        };
        assemble_field(axes, values, config)
    }
}
