use std::fs;

use woe::error::{ClimateError, ClimateResult, Stage};

use crate::common::config::paths::ProjectPaths;

pub mod json;
#[cfg(feature = "netcdf")]
pub mod netcdf;
pub mod prelude;

use prelude::{OutputConfiguration, OutputFormat, OutputSink};

/// Build the sinks of a task, creating its output directory
pub fn build_sinks(config: &OutputConfiguration, paths: &ProjectPaths) -> ClimateResult<Vec<Box<dyn OutputSink>>> {
    let dir = paths.resolve_output(&config.path);
    fs::create_dir_all(&dir).map_err(|err| {
        ClimateError::new(
            Stage::Output,
            format!("cannot create {}: {err}", dir.display()),
        )
    })?;

    config
        .formats
        .iter()
        .map(|format| -> ClimateResult<Box<dyn OutputSink>> {
            match format {
                OutputFormat::Json => Ok(Box::new(json::JsonWriter::new(dir.clone()))),
                #[cfg(feature = "netcdf")]
                OutputFormat::NetCdf => Ok(Box::new(netcdf::NetCdfWriter::new(dir.clone()))),
                #[cfg(not(feature = "netcdf"))]
                OutputFormat::NetCdf => Err(ClimateError::new(
                    Stage::Output,
                    "NetCDF output needs the `netcdf` feature",
                )),
            }
        })
        .collect()
}
