mod common;
use std::env::{set_var, var};
use std::error::Error;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use log::{info, warn};
use rayon::prelude::*;

use common::config::builder::{
    ConfigContainer, MarketConfigBuilder, MonthlyConfigBuilder, NaoConfigBuilder,
    RegionalConfigBuilder, SolarConfigBuilder, TaskConfigType,
};
use common::config::paths::ProjectPaths;
use common::helpers::{load_field, load_region, write_product};
use common::io::readers::{
    prices::{read_price_csv, PriceFileConfiguration},
    smard::SmardArchive,
};
use common::io::writers::{build_sinks, prelude::Product};
use woe::{
    error::ClimateResult,
    modules::{
        derived::functions::wind_speed_field,
        market::{
            config::SmardVariable,
            functions::{align_hourly, daily_srmc, market_metrics, reconstruct_prices},
            models::{FossilCapacities, MarketInputs},
        },
        monthly::functions::{dunkelflaute, month_correlation, monthly_anomalies, monthly_climatology},
        regional::{
            functions::regional_aggregate,
            models::SpatialAggregation,
        },
        season::functions::{resample_daily, resample_monthly},
        solar::functions::{daylight_hours, elevation_table},
    },
    version::LONG_VERSION,
};

#[derive(Parser, Debug)]
#[command(
    version,
    long_version=LONG_VERSION,
    about="Seasonal climate indices and diagnostics from ERA5 reanalysis data",
    long_about="Derives the winter NAO index from gridded sea-level pressure, correlates it with further variables,
and computes solar geometry tables, regional aggregates, monthly wind/solar analyses and a merit order
reconstruction of electricity prices as configured."
)]
struct Args {
    #[arg(required = true, help = "Path to the configuration file", index = 1)]
    config_path: String,

    #[arg(long, help = "Run only the task with this name")]
    only: Option<String>,
}

fn run_nao(task: &NaoConfigBuilder, paths: &ProjectPaths) -> ClimateResult<()> {
    let config = task.build()?;
    let mut sinks = build_sinks(&config.output, paths)?;

    let field = load_field(&config.input, paths)?;
    let result = config.pipeline.run(&field)?;
    info!(
        "{}: index over {} seasons, {} of {} correlation cells defined",
        task.name,
        result.index.len(),
        result.correlation.n_valid(),
        result.correlation.values.len()
    );

    let index_config = config.pipeline.config();
    write_product(&mut sinks, &format!("{}_index", task.name), Product::Seasons(&result.index))?;
    write_product(
        &mut sinks,
        &format!("{}_{}", task.name, index_config.station_a.name.to_lowercase()),
        Product::Seasons(&result.standardized_a),
    )?;
    write_product(
        &mut sinks,
        &format!("{}_{}", task.name, index_config.station_b.name.to_lowercase()),
        Product::Seasons(&result.standardized_b),
    )?;
    write_product(&mut sinks, &format!("{}_mask", task.name), Product::Mask(&result.mask))?;
    write_product(&mut sinks, &format!("{}_points", task.name), Product::Points(&result.points))?;
    write_product(
        &mut sinks,
        &format!("{}_correlation_{}", task.name, config.input.variable),
        Product::Map(&result.correlation),
    )?;

    for input in &config.correlate {
        let other = load_field(input, paths)?;
        let map = config.pipeline.correlate_with(&result, &other)?;
        info!(
            "{}: {} correlated on {} of {} cells",
            task.name,
            input.variable,
            map.n_valid(),
            map.values.len()
        );
        write_product(
            &mut sinks,
            &format!("{}_correlation_{}", task.name, input.variable),
            Product::Map(&map),
        )?;
    }
    Ok(())
}

fn run_solar(task: &SolarConfigBuilder, paths: &ProjectPaths) -> ClimateResult<()> {
    let config = task.build()?;
    let mut sinks = build_sinks(&config.output, paths)?;

    let tables = config
        .sites
        .par_iter()
        .map(|site| elevation_table(site, config.minutes_step))
        .collect::<ClimateResult<Vec<_>>>()?;

    for table in &tables {
        let site = &table.site;
        info!(
            "{}: {:.1} h of daylight at the June solstice, {:.1} h at the December solstice, max elevation {:.1}°",
            site.name,
            daylight_hours(site.lat, 172.0),
            daylight_hours(site.lat, 355.0),
            table.max_elevation()
        );
        write_product(
            &mut sinks,
            &format!("{}_{}", task.name, site.name.to_lowercase()),
            Product::Elevation(table),
        )?;
    }
    Ok(())
}

fn run_regional(task: &RegionalConfigBuilder, paths: &ProjectPaths) -> ClimateResult<()> {
    let config = task.build()?;
    let mut sinks = build_sinks(&config.output, paths)?;

    let field = load_field(&config.input, paths)?;
    let region = load_region(&config.region, paths)?.mask(&field.lats, &field.lons);
    info!("{}: {} cells inside the region", task.name, region.n_cells());

    for how in &config.aggregations {
        let series = regional_aggregate(&field, &region, *how)?;
        write_product(
            &mut sinks,
            &format!("{}_{}_{}", task.name, config.input.variable, how),
            Product::Series(&series),
        )?;
    }
    Ok(())
}

fn run_monthly(task: &MonthlyConfigBuilder, paths: &ProjectPaths) -> ClimateResult<()> {
    let config = task.build()?;
    let mut sinks = build_sinks(&config.output, paths)?;

    let u = load_field(&config.wind_u, paths)?;
    let v = load_field(&config.wind_v, paths)?;
    let speed = wind_speed_field(&u, &v)?;
    let solar = load_field(&config.solar, paths)?;

    let region = load_region(&config.region, paths)?;
    let wind_region = region.mask(&speed.lats, &speed.lons);
    let solar_region = region.mask(&solar.lats, &solar.lons);
    let series = [
        ("wind", regional_aggregate(&speed, &wind_region, SpatialAggregation::Mean)?),
        ("solar", regional_aggregate(&solar, &solar_region, SpatialAggregation::Mean)?),
    ];

    for (label, s) in &series {
        let climatology = monthly_climatology(s);
        write_product(
            &mut sinks,
            &format!("{}_{label}_climatology", task.name),
            Product::Climatology(&climatology),
        )?;
        let anomalies = monthly_anomalies(s);
        write_product(
            &mut sinks,
            &format!("{}_{label}_anomalies", task.name),
            Product::Series(&anomalies),
        )?;
        for start in &config.year_start_months {
            let corr = month_correlation(s, *start)?;
            write_product(
                &mut sinks,
                &format!("{}_{label}_month_correlation_{start:02}", task.name),
                Product::MonthCorrelation(&corr),
            )?;
        }
    }

    let result = dunkelflaute(&series[0].1, &series[1].1, config.quantile)?;
    info!(
        "{}: {} of {} months below the {} quantile of both wind and solar",
        task.name,
        result.n_flagged(),
        result.flags.len(),
        config.quantile
    );
    write_product(
        &mut sinks,
        &format!("{}_dunkelflaute", task.name),
        Product::Dunkelflaute(&result),
    )
}

fn run_market(task: &MarketConfigBuilder, paths: &ProjectPaths) -> ClimateResult<()> {
    let config = task.build()?;
    let mut sinks = build_sinks(&config.output, paths)?;

    let smard = &config.smard;
    let archive = SmardArchive::new(paths.resolve_download(&smard.path));
    let hourly = |variable| archive.read(variable, &smard.region, smard.resolution);
    let inputs = MarketInputs {
        price: hourly(SmardVariable::PriceDeLu)?,
        total_load: hourly(SmardVariable::TotalLoad)?,
        solar: hourly(SmardVariable::Solar)?,
        wind_onshore: hourly(SmardVariable::WindOnshore)?,
        wind_offshore: hourly(SmardVariable::WindOffshore)?,
        nuclear: hourly(SmardVariable::Nuclear)?,
        biomass: hourly(SmardVariable::Biomass)?,
        hydro: hourly(SmardVariable::Hydro)?,
    };
    let capacity = |variable| archive.read(variable, &smard.capacity_region, smard.capacity_resolution);
    let capacities = FossilCapacities::from_series(
        &capacity(SmardVariable::CapacityBrownCoal)?,
        &capacity(SmardVariable::CapacityHardCoal)?,
        &capacity(SmardVariable::CapacityNaturalGas)?,
    );

    let prices = |file: &PriceFileConfiguration| {
        read_price_csv(&paths.resolve_download(&file.path), file)
    };
    let srmc = daily_srmc(&prices(&config.gas)?, &prices(&config.coal)?, &prices(&config.carbon)?, &config.srmc)?;
    write_product(&mut sinks, &format!("{}_gas_srmc", task.name), Product::Series(&srmc.gas_series()))?;
    write_product(&mut sinks, &format!("{}_coal_srmc", task.name), Product::Series(&srmc.coal_series()))?;

    let market = align_hourly(&inputs)?;
    let reconstruction = reconstruct_prices(&market, &srmc, &capacities)?;
    let metrics = market_metrics(&reconstruction);
    info!(
        "{}: R² {:.3}, MAE {:.1} EUR/MWh over {} hours, residual load vs price r = {:.3}",
        task.name, metrics.r2_reconstructed, metrics.mae, metrics.hours, metrics.correlation_residual_load
    );
    write_product(&mut sinks, &format!("{}_metrics", task.name), Product::Metrics(&metrics))?;

    let hourly_series = [
        ("price", reconstruction.price_series()?),
        ("price_reconstructed", reconstruction.reconstructed_series()?),
        ("residual_load", reconstruction.residual_load_series()?),
    ];
    for (label, series) in &hourly_series {
        write_product(
            &mut sinks,
            &format!("{}_{label}_daily", task.name),
            Product::Series(&resample_daily(series)?),
        )?;
        write_product(
            &mut sinks,
            &format!("{}_{label}_monthly", task.name),
            Product::Series(&resample_monthly(series)?),
        )?;
    }
    Ok(())
}

/// main function
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config_path_str = args.config_path;

    if var("RUST_LOG").is_err() {
        set_var("RUST_LOG", "info")
    }
    pretty_env_logger::init();

    if !Path::new(&config_path_str).is_file() {
        return Err(format!("Config file {} is not a file", config_path_str).into());
    }

    let configs = ConfigContainer::from_file(&config_path_str)
        .map_err(|err| format!("Failed to load config: {}", err))?;
    configs
        .paths
        .ensure_directories()
        .map_err(|err| format!("Failed to prepare project directories: {}", err))?;

    let tasks: Vec<&TaskConfigType> = configs
        .tasks
        .iter()
        .filter(|task| match &args.only {
            Some(only) => task.get_task_name() == only,
            None => true,
        })
        .collect();
    if tasks.is_empty() {
        return Err(format!("No task to run in {}", config_path_str).into());
    }

    for task in tasks {
        info!("Running task: {}", task.get_task_name());
        let start_time = Instant::now();

        let task_run = match task {
            TaskConfigType::NAO(task) => run_nao(task, &configs.paths),
            TaskConfigType::Solar(task) => run_solar(task, &configs.paths),
            TaskConfigType::Regional(task) => run_regional(task, &configs.paths),
            TaskConfigType::Monthly(task) => run_monthly(task, &configs.paths),
            TaskConfigType::Market(task) => run_market(task, &configs.paths),
        };

        if let Err(err) = task_run {
            warn!("Error running task {}: {}", task.get_task_name(), err);
        }

        info!("Elapsed time: {:.2} seconds", start_time.elapsed().as_secs_f64());
    }

    Ok(())
}
