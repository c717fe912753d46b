use std::path::Path;

use woe::error::{ClimateError, ClimateResult, Stage};

pub mod json;
#[cfg(feature = "netcdf")]
pub mod netcdf;
pub mod prelude;
pub mod prices;
pub mod smard;

use prelude::FieldReader;

/// Pick the reader matching the file extension
pub fn reader_for(path: &Path) -> ClimateResult<Box<dyn FieldReader>> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Box::new(json::JsonFieldReader)),
        #[cfg(feature = "netcdf")]
        Some("nc") => Ok(Box::new(netcdf::NetCdfFieldReader)),
        #[cfg(not(feature = "netcdf"))]
        Some("nc") => Err(ClimateError::new(
            Stage::Input,
            format!(
                "{}: NetCDF input needs the `netcdf` feature",
                path.display()
            ),
        )),
        _ => Err(ClimateError::new(
            Stage::Input,
            format!("{}: unsupported input format", path.display()),
        )),
    }
}
