use log::debug;

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::models::{
    season::{SeasonField, SeasonSeries},
    station::Station,
};

use super::models::{Grid, GridPoint, RectilinearGrid};

/// Resolve a location to its nearest grid sample
pub fn locate(grid: &dyn Grid, name: &str, lat: f64, lon: f64) -> ClimateResult<(usize, usize)> {
    grid.index(lat, lon).ok_or_else(|| {
        ClimateError::new(
            Stage::Extractor,
            format!("cannot locate {name} ({lat}, {lon}) on an empty {:?}", grid),
        )
    })
}

pub fn locate_station(field: &SeasonField, station: &Station) -> ClimateResult<GridPoint> {
    let grid = RectilinearGrid::new(field.lats.clone(), field.lons.clone());
    let (row, col) = locate(&grid, &station.name, station.lat, station.lon)?;
    let point = GridPoint {
        name: station.name.clone(),
        row,
        col,
        lat: field.lats[row],
        lon: field.lons[col],
    };
    debug!(
        "{} ({}, {}) -> grid cell ({}, {}) at ({}, {})",
        station.name, station.lat, station.lon, row, col, point.lat, point.lon
    );
    Ok(point)
}

/// Seasonal series of the grid sample nearest to (lat, lon)
pub fn extract_point(field: &SeasonField, lat: f64, lon: f64) -> ClimateResult<SeasonSeries> {
    let grid = RectilinearGrid::new(field.lats.clone(), field.lons.clone());
    let (row, col) = locate(&grid, "point", lat, lon)?;
    Ok(field.cell_series(row, col))
}

pub fn extract_station(field: &SeasonField, station: &Station) -> ClimateResult<SeasonSeries> {
    let point = locate_station(field, station)?;
    Ok(field.cell_series(point.row, point.col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array3};

    fn field() -> SeasonField {
        // descending latitudes, 0..360 longitudes
        let lats = Array1::from(vec![65.0, 50.0, 35.0]);
        let lons = Array1::from(vec![0.0, 90.0, 180.0, 270.0, 335.0]);
        let mut values = Array3::zeros((1, 3, 5));
        for ((_, i, j), v) in values.indexed_iter_mut() {
            *v = (i * 10 + j) as f64;
        }
        SeasonField::new(Array1::from(vec![1950]), lats, lons, values).expect("valid")
    }

    #[test]
    fn nearest_cell_on_descending_latitudes() {
        let series = extract_point(&field(), 37.7, 89.0).expect("grid not empty");
        assert_eq!(series.values[0], 21.0);
    }

    #[test]
    fn negative_longitudes_wrap_onto_0_360_grids() {
        let point = locate_station(&field(), &Station::azores()).expect("grid not empty");
        assert_eq!((point.row, point.col), (2, 4));
        assert_eq!(point.lon, 335.0);
    }

    #[test]
    fn empty_grid_is_an_error() {
        let empty = SeasonField::new(
            Array1::from(vec![1950]),
            Array1::zeros(0),
            Array1::zeros(0),
            Array3::zeros((1, 0, 0)),
        )
        .expect("valid");
        let err = extract_station(&empty, &Station::iceland()).expect_err("should fail");
        assert_eq!(err.stage(), Stage::Extractor);
    }

    #[test]
    fn locate_error_names_the_borrowed_grid_shape() {
        let grid = RectilinearGrid::new(Array1::zeros(0), Array1::from(vec![0.0, 10.0]));
        let err = locate(&grid, "Reykjavik", 64.1, -21.9).expect_err("no latitude");
        assert!(err.message().contains("Grid (0, 2)"), "{}", err.message());
    }
}
