use geo::{Geometry, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson};
use log::debug;
use ndarray::{Array1, ArrayView2, Axis};
use ndarray_stats::{interpolate::Linear, QuantileExt};
use noisy_float::types::n64;

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::models::{field::Field, series::TimeSeries};
use crate::modules::season::functions::nan_mean_count;

use super::models::{RegionMask, SpatialAggregation};

/// Quantile of the defined values with linear interpolation; NaN when none is defined
pub fn nan_quantile(values: &Array1<f64>, q: f64) -> ClimateResult<f64> {
    if values.is_empty() {
        return Ok(f64::NAN);
    }
    let mut values = values.clone();
    let quantile = values
        .quantile_axis_skipnan_mut(Axis(0), n64(q), &Linear)
        .map_err(|err| ClimateError::new(Stage::Regional, format!("quantile {q}: {err}")))?;
    Ok(quantile.into_scalar())
}

/// Population standard deviation of the defined values
pub fn nan_std(values: &Array1<f64>) -> f64 {
    let defined: Array1<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if defined.is_empty() {
        return f64::NAN;
    }
    defined.std(0.0)
}

/// Reduce a set of values with the given aggregation, skipping NaN
pub fn aggregate_values(values: &Array1<f64>, how: SpatialAggregation) -> ClimateResult<f64> {
    let result = match how {
        SpatialAggregation::Mean => nan_mean_count(values.view()).0,
        SpatialAggregation::Median => nan_quantile(values, 0.5)?,
        SpatialAggregation::Min => {
            if values.is_empty() {
                f64::NAN
            } else {
                *values.min_skipnan()
            }
        }
        SpatialAggregation::Max => {
            if values.is_empty() {
                f64::NAN
            } else {
                *values.max_skipnan()
            }
        }
        SpatialAggregation::Std => nan_std(values),
    };
    Ok(result)
}

fn region_values(slab: ArrayView2<f64>, cells: &[(usize, usize)]) -> Array1<f64> {
    cells.iter().map(|&(i, j)| slab[[i, j]]).collect()
}

/// One value per time step computed over the cells inside the region
pub fn regional_aggregate(
    field: &Field,
    region: &RegionMask,
    how: SpatialAggregation,
) -> ClimateResult<TimeSeries> {
    if region.lats != field.lats || region.lons != field.lons {
        return Err(ClimateError::new(
            Stage::Regional,
            "region mask is defined on a different grid than the field",
        ));
    }
    let cells = region.cells();
    if cells.is_empty() {
        return Err(ClimateError::new(
            Stage::Regional,
            "region contains no grid cell",
        ));
    }
    debug!("{how} over {} cells for {} time steps", cells.len(), field.len());

    let values = field
        .values
        .outer_iter()
        .map(|slab| aggregate_values(&region_values(slab, &cells), how))
        .collect::<ClimateResult<Array1<f64>>>()?;

    Ok(TimeSeries {
        time: field.time.clone(),
        values,
    })
}

/// Feature properties holding a country or area name, Natural Earth first
const NAME_PROPERTIES: [&str; 3] = ["NAME", "ADMIN", "name"];

fn feature_named(feature: &Feature, name: &str) -> bool {
    NAME_PROPERTIES.iter().any(|key| {
        feature
            .property(key)
            .and_then(|value| value.as_str())
            .is_some_and(|value| value.eq_ignore_ascii_case(name))
    })
}

fn polygons_of(geometry: geojson::Geometry) -> ClimateResult<Vec<Polygon<f64>>> {
    let geometry = Geometry::<f64>::try_from(geometry)
        .map_err(|err| ClimateError::new(Stage::Regional, format!("invalid geometry: {err}")))?;
    match geometry {
        Geometry::Polygon(polygon) => Ok(vec![polygon]),
        Geometry::MultiPolygon(multi) => Ok(multi.0),
        other => Err(ClimateError::new(
            Stage::Regional,
            format!("region outlines must be polygons, found {other:?}"),
        )),
    }
}

/// Outline of a region read from GeoJSON text. With a name, only the
/// features whose NAME, ADMIN or name property matches are kept.
pub fn region_from_geojson(text: &str, name: Option<&str>) -> ClimateResult<MultiPolygon<f64>> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|err| ClimateError::new(Stage::Regional, format!("cannot parse GeoJSON: {err}")))?;
    let wanted = |feature: &Feature| name.map_or(true, |name| feature_named(feature, name));

    let geometries: Vec<geojson::Geometry> = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => Some(feature)
            .filter(|f| wanted(f))
            .and_then(|f| f.geometry)
            .into_iter()
            .collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter(|f| wanted(f))
            .filter_map(|f| f.geometry)
            .collect(),
    };
    if geometries.is_empty() {
        return Err(ClimateError::new(
            Stage::Regional,
            format!("no polygon named {} in GeoJSON", name.unwrap_or("<any>")),
        ));
    }

    let mut polygons = Vec::new();
    for geometry in geometries {
        polygons.extend(polygons_of(geometry)?);
    }
    debug!("region outline with {} polygons", polygons.len());
    Ok(MultiPolygon::new(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::month_start;
    use crate::modules::regional::models::{LatLonBox, Region};
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, Array3};
    use std::str::FromStr;

    fn field() -> Field {
        let time = Array1::from(vec![
            month_start(2020, 1).expect("valid"),
            month_start(2020, 2).expect("valid"),
        ]);
        let lats = Array1::from(vec![55.0, 52.5, 50.0, 47.5]);
        let lons = Array1::from(vec![5.0, 7.5, 10.0, 12.5, 15.0]);
        let mut values = Array3::zeros((2, 4, 5));
        for ((t, i, j), v) in values.indexed_iter_mut() {
            *v = (t * 100 + i * 5 + j) as f64;
        }
        values[[1, 1, 1]] = f64::NAN;
        Field::new(time, lats, lons, values).expect("valid")
    }

    fn germany(field: &Field) -> RegionMask {
        RegionMask::from_box(
            field.lats.clone(),
            field.lons.clone(),
            &LatLonBox {
                lat_min: 47.0,
                lat_max: 53.0,
                lon_min: 6.0,
                lon_max: 11.0,
            },
        )
    }

    #[test]
    fn box_selects_the_expected_cells() {
        let field = field();
        let region = germany(&field);
        assert_eq!(region.cells(), vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]);
    }

    #[test]
    fn aggregations_skip_missing_cells() {
        let field = field();
        let region = germany(&field);
        // first step: 6, 7, 11, 12, 16, 17
        let mean = regional_aggregate(&field, &region, SpatialAggregation::Mean).expect("valid");
        assert_abs_diff_eq!(mean.values[0], 11.5, epsilon = 1e-12);
        let median = regional_aggregate(&field, &region, SpatialAggregation::Median).expect("valid");
        assert_abs_diff_eq!(median.values[0], 11.5, epsilon = 1e-12);
        // second step: 107 .. 117 with 106 missing
        let min = regional_aggregate(&field, &region, SpatialAggregation::Min).expect("valid");
        assert_eq!(min.values.to_vec(), vec![6.0, 107.0]);
        let max = regional_aggregate(&field, &region, SpatialAggregation::Max).expect("valid");
        assert_eq!(max.values.to_vec(), vec![17.0, 117.0]);
        let median = regional_aggregate(&field, &region, SpatialAggregation::Median).expect("valid");
        assert_abs_diff_eq!(median.values[1], 112.0, epsilon = 1e-12);
    }

    #[test]
    fn population_std() {
        let values = Array1::from(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, f64::NAN]);
        assert_abs_diff_eq!(nan_std(&values), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_region_is_an_error() {
        let field = field();
        let region = RegionMask::new(
            field.lats.clone(),
            field.lons.clone(),
            Array2::from_elem((4, 5), false),
        )
        .expect("valid");
        let err = regional_aggregate(&field, &region, SpatialAggregation::Mean).expect_err("should fail");
        assert_eq!(err.stage(), Stage::Regional);
    }

    #[test]
    fn aggregation_names_parse() {
        assert_eq!(SpatialAggregation::from_str("Median"), Ok(SpatialAggregation::Median));
        assert_eq!(SpatialAggregation::Std.to_string(), "std");
    }

    // two rectangles in -180..180 longitudes, the first one covering
    // cells (1..=2, 1..=2) of the test grid
    const COUNTRIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "NAME": "Germany", "ADMIN": "Germany" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[6.0, 48.5], [11.0, 48.5], [11.0, 53.5], [6.0, 53.5], [6.0, 48.5]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Elsewhere" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-10.0, 40.0], [-5.0, 40.0], [-5.0, 45.0], [-10.0, 40.0]]]]
                }
            }
        ]
    }"#;

    #[test]
    fn geojson_feature_is_selected_by_name() {
        let shape = region_from_geojson(COUNTRIES, Some("germany")).expect("valid");
        assert_eq!(shape.0.len(), 1);
        let all = region_from_geojson(COUNTRIES, None).expect("valid");
        assert_eq!(all.0.len(), 2);

        let err = region_from_geojson(COUNTRIES, Some("Atlantis")).expect_err("unknown name");
        assert_eq!(err.stage(), Stage::Regional);
    }

    #[test]
    fn polygon_mask_keeps_interior_cells() {
        let field = field();
        let shape = region_from_geojson(COUNTRIES, Some("Germany")).expect("valid");
        let region = Region::Polygon(shape).mask(&field.lats, &field.lons);
        assert_eq!(region.cells(), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);

        let mean = regional_aggregate(&field, &region, SpatialAggregation::Mean).expect("valid");
        // first step: 6, 7, 11, 12
        assert_abs_diff_eq!(mean.values[0], 9.0, epsilon = 1e-12);
    }

    #[test]
    fn polygon_mask_wraps_0_360_longitudes() {
        let lats = Array1::from(vec![44.0, 41.0]);
        let lons = Array1::from(vec![352.0, 356.0, 2.0]);
        let shape = region_from_geojson(COUNTRIES, Some("Elsewhere")).expect("valid");
        let region = Region::Polygon(shape).mask(&lats, &lons);
        // the triangle holds (-8, 41) but not (-8, 44) or anything east of -5
        assert_eq!(region.cells(), vec![(1, 0)]);
    }

    #[test]
    fn non_polygon_geometry_is_rejected() {
        let point = r#"{ "type": "Point", "coordinates": [10.0, 50.0] }"#;
        let err = region_from_geojson(point, None).expect_err("not an outline");
        assert!(err.message().contains("polygons"), "{}", err.message());
        assert!(region_from_geojson("not json", None).is_err());
    }
}
