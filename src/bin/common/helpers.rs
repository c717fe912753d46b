use std::fs;
use std::time::Instant;

use log::{debug, info};

use woe::{
    error::{ClimateError, ClimateResult, Stage},
    models::field::Field,
    modules::{
        regional::{functions::region_from_geojson, models::Region},
        season::functions::resample_field_monthly,
    },
};

use crate::common::{
    config::{builder::RegionConfiguration, paths::ProjectPaths},
    io::{
        readers::{prelude::InputConfiguration, reader_for},
        writers::prelude::{OutputSink, Product},
    },
};

/// Read a configured variable and bring it to calendar-month means
pub fn load_field(input: &InputConfiguration, paths: &ProjectPaths) -> ClimateResult<Field> {
    let start = Instant::now();
    let path = paths.resolve_input(&input.path);
    let reader = reader_for(&path)?;
    let field = reader.read_field(&path, input)?;
    let monthly = resample_field_monthly(&field)?;
    info!(
        "loaded {} from {}: {} months on a {}x{} grid",
        input.variable,
        path.display(),
        monthly.len(),
        monthly.lats.len(),
        monthly.lons.len()
    );
    debug!("loading {} took {:?}", input.variable, start.elapsed());
    Ok(monthly)
}

/// Bounds as configured, or the outline read from the GeoJSON file
pub fn load_region(region: &RegionConfiguration, paths: &ProjectPaths) -> ClimateResult<Region> {
    match region {
        RegionConfiguration::Box(bounds) => Ok(Region::Box(*bounds)),
        RegionConfiguration::Shape { geojson, name } => {
            let path = paths.resolve_shape(geojson);
            let text = fs::read_to_string(&path).map_err(|err| {
                ClimateError::new(Stage::Input, format!("cannot read {}: {err}", path.display()))
            })?;
            let shape = region_from_geojson(&text, name.as_deref())?;
            info!(
                "region {} from {}: {} polygons",
                name.as_deref().unwrap_or("<all features>"),
                path.display(),
                shape.0.len()
            );
            Ok(Region::Polygon(shape))
        }
    }
}

/// Hand a product to every sink that can represent it
pub fn write_product(sinks: &mut [Box<dyn OutputSink>], name: &str, product: Product) -> ClimateResult<()> {
    let mut written = false;
    for sink in sinks.iter_mut().filter(|sink| sink.supports(&product)) {
        sink.write(name, &product)?;
        written = true;
    }
    if !written {
        return Err(ClimateError::new(
            Stage::Output,
            format!("no configured output format can hold {name}"),
        ));
    }
    Ok(())
}
