use std::path::{Path, PathBuf};

use log::debug;
use ndarray::{Array1, Array2};
use netcdf::extent::Extents;

use woe::error::{ClimateError, ClimateResult, Stage};

use super::prelude::{OutputSink, Product};

/// Writes two-dimensional products (correlation maps, elevation tables) as NetCDF4
pub struct NetCdfWriter {
    dir: PathBuf,
}

impl NetCdfWriter {
    pub fn new(dir: PathBuf) -> Self {
        NetCdfWriter { dir }
    }
}

struct Grid2<'a> {
    row_name: &'a str,
    rows: Array1<f64>,
    col_name: &'a str,
    cols: Array1<f64>,
    variable: &'a str,
    values: &'a Array2<f64>,
}

fn output_error(file: &Path, msg: impl std::fmt::Display) -> ClimateError {
    ClimateError::new(Stage::Output, format!("{}: {msg}", file.display()))
}

fn write_grid(file_name: &Path, grid: &Grid2) -> ClimateResult<()> {
    let err = |e: netcdf::Error| output_error(file_name, e);
    let mut file =
        netcdf::create_with(file_name, netcdf::Options::NETCDF4).map_err(err)?;

    file.add_dimension(grid.row_name, grid.rows.len()).map_err(err)?;
    file.add_dimension(grid.col_name, grid.cols.len()).map_err(err)?;

    for (name, axis) in [(grid.row_name, &grid.rows), (grid.col_name, &grid.cols)] {
        let mut var = file.add_variable::<f64>(name, &[name]).map_err(err)?;
        var.put_values(axis.to_vec().as_slice(), Extents::All).map_err(err)?;
    }

    let mut var = file
        .add_variable::<f64>(grid.variable, &[grid.row_name, grid.col_name])
        .map_err(err)?;
    var.add_attribute("missing_value", f64::NAN).map_err(err)?;
    let values: Vec<f64> = grid.values.iter().copied().collect();
    var.put_values(values.as_slice(), Extents::All).map_err(err)?;
    Ok(())
}

impl OutputSink for NetCdfWriter {
    fn supports(&self, product: &Product) -> bool {
        matches!(product, Product::Map(_) | Product::Elevation(_))
    }

    fn write(&mut self, name: &str, product: &Product) -> ClimateResult<()> {
        let file = self.dir.join(format!("{name}.nc"));
        let grid = match product {
            Product::Map(map) => Grid2 {
                row_name: "latitude",
                rows: map.lats.clone(),
                col_name: "longitude",
                cols: map.lons.clone(),
                variable: "correlation",
                values: &map.values,
            },
            Product::Elevation(table) => Grid2 {
                row_name: "local_hour",
                rows: table.local_hours.clone(),
                col_name: "day_of_year",
                cols: table.days.mapv(|d| d as f64),
                variable: "elevation",
                values: &table.values,
            },
            _ => {
                return Err(output_error(&file, "product has no NetCDF representation"));
            }
        };
        // replace the output of a previous run
        if file.exists() {
            std::fs::remove_file(&file).map_err(|e| output_error(&file, e))?;
        }
        write_grid(&file, &grid)?;
        debug!("written {}", file.display());
        Ok(())
    }
}
