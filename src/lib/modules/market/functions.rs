use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use itertools::Itertools;
use log::{debug, info};
use ndarray::{Array1, ArrayView1, Axis, Zip};

use crate::constants::WINTER_MONTHS;
use crate::error::{ClimateError, ClimateResult, Stage};
use crate::models::series::TimeSeries;
use crate::modules::correlation::functions::pearson;

use super::config::SrmcParameters;
use super::models::{
    FossilCapacities, HourlyMarket, MarketInputs, MarketMetrics, PriceReconstruction,
    ResidualLoads, SmardBlock, SmardIndex, SrmcSeries,
};

fn market_error(msg: impl Into<String>) -> ClimateError {
    ClimateError::new(Stage::Market, msg)
}

pub fn parse_smard_index(text: &str) -> ClimateResult<SmardIndex> {
    serde_json::from_str(text).map_err(|err| market_error(format!("invalid SMARD index: {err}")))
}

pub fn parse_smard_block(text: &str) -> ClimateResult<SmardBlock> {
    serde_json::from_str(text).map_err(|err| market_error(format!("invalid SMARD block: {err}")))
}

/// Join SMARD blocks into one series. Timestamps are sorted, the first of
/// duplicated timestamps wins and unpublished values are dropped.
pub fn merge_smard_blocks(blocks: &[SmardBlock]) -> ClimateResult<TimeSeries> {
    let samples: Vec<(i64, f64)> = blocks
        .iter()
        .flat_map(|block| block.series.iter().copied())
        .sorted_by_key(|(ts, _)| *ts)
        .dedup_by(|a, b| a.0 == b.0)
        .filter_map(|(ts, value)| value.map(|v| (ts, v)))
        .collect();

    let time = samples
        .iter()
        .map(|(ts, _)| {
            Utc.timestamp_millis_opt(*ts)
                .single()
                .ok_or_else(|| market_error(format!("timestamp {ts} out of range")))
        })
        .collect::<ClimateResult<Array1<DateTime<Utc>>>>()?;
    let values = samples.iter().map(|(_, v)| *v).collect::<Array1<f64>>();
    debug!("{} blocks merged into {} samples", blocks.len(), values.len());

    TimeSeries::new(time, values)
}

/// Timestamps present in every series, with the values of each series there
pub fn inner_join(series: &[&TimeSeries]) -> (Array1<DateTime<Utc>>, Vec<Array1<f64>>) {
    let Some((first, rest)) = series.split_first() else {
        return (Array1::from(vec![]), vec![]);
    };
    let lookups: Vec<HashMap<DateTime<Utc>, f64>> = rest
        .iter()
        .map(|s| s.time.iter().copied().zip(s.values.iter().copied()).collect())
        .collect();

    let rows: Vec<(DateTime<Utc>, Vec<f64>)> = first
        .time
        .iter()
        .zip(first.values.iter())
        .filter_map(|(t, v)| {
            let others = lookups
                .iter()
                .map(|lookup| lookup.get(t).copied())
                .collect::<Option<Vec<f64>>>()?;
            Some((*t, std::iter::once(*v).chain(others).collect()))
        })
        .collect();

    let time = rows.iter().map(|(t, _)| *t).collect();
    let columns = (0..series.len())
        .map(|k| rows.iter().map(|(_, row)| row[k]).collect())
        .collect();
    (time, columns)
}

/// Union of the timestamps, NaN where a series has no value
pub fn outer_join(series: &[&TimeSeries]) -> (Array1<DateTime<Utc>>, Vec<Array1<f64>>) {
    let time: Vec<DateTime<Utc>> = series
        .iter()
        .flat_map(|s| s.time.iter().copied())
        .sorted()
        .dedup()
        .collect();
    let columns = series
        .iter()
        .map(|s| {
            let lookup: HashMap<DateTime<Utc>, f64> =
                s.time.iter().copied().zip(s.values.iter().copied()).collect();
            time.iter()
                .map(|t| lookup.get(t).copied().unwrap_or(f64::NAN))
                .collect()
        })
        .collect();
    (Array1::from(time), columns)
}

/// Replace NaN with the last defined value; leading NaN stay
pub fn forward_fill(values: &mut Array1<f64>) {
    let mut last = f64::NAN;
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = last;
        } else {
            last = *v;
        }
    }
}

/// Hours where every market input is defined
pub fn align_hourly(inputs: &MarketInputs) -> ClimateResult<HourlyMarket> {
    let (time, columns) = inner_join(&[
        &inputs.price,
        &inputs.total_load,
        &inputs.solar,
        &inputs.wind_onshore,
        &inputs.wind_offshore,
        &inputs.nuclear,
        &inputs.biomass,
        &inputs.hydro,
    ]);
    let complete: Vec<usize> = (0..time.len())
        .filter(|&h| columns.iter().all(|c| c[h].is_finite()))
        .collect();
    if complete.is_empty() {
        return Err(market_error("market inputs share no complete hour"));
    }
    let mut columns = columns.iter().map(|c| c.select(Axis(0), &complete));
    let mut next = || columns.next().unwrap_or_default();

    let market = HourlyMarket {
        time: time.select(Axis(0), &complete),
        price: next(),
        total_load: next(),
        solar: next(),
        wind_onshore: next(),
        wind_offshore: next(),
        nuclear: next(),
        biomass: next(),
        hydro: next(),
    };
    info!(
        "{} complete hours from {} to {}",
        market.len(),
        market.time[0],
        market.time[market.len() - 1]
    );
    Ok(market)
}

pub fn residual_loads(market: &HourlyMarket) -> ResidualLoads {
    let wind = &market.wind_onshore + &market.wind_offshore;
    let renewables = &market.solar + &wind;
    let baseload = &market.nuclear + &market.biomass + &market.hydro;
    let residual_load = &market.total_load - &renewables;
    let rl_fossil = &residual_load - &baseload;
    ResidualLoads {
        wind,
        renewables,
        baseload,
        residual_load,
        rl_fossil,
    }
}

/// API 2 coal price converted from USD/t to EUR/MWh thermal
pub fn coal_eur_per_mwh(usd_per_tonne: f64, params: &SrmcParameters) -> f64 {
    usd_per_tonne / params.eurusd_rate / params.coal_thermal_content
}

/// Gas plant cost from the fuel price [EUR/MWh] and the carbon price [EUR/t]
pub fn gas_srmc(gas: f64, carbon: f64, params: &SrmcParameters) -> f64 {
    gas / params.gas_efficiency + params.gas_carbon_intensity * carbon + params.vom_cost
}

/// Coal plant cost from the fuel price [USD/t] and the carbon price [EUR/t]
pub fn coal_srmc(coal: f64, carbon: f64, params: &SrmcParameters) -> f64 {
    coal_eur_per_mwh(coal, params) / params.coal_efficiency
        + params.coal_carbon_intensity * carbon
        + params.vom_cost
}

/// Marginal costs on the dates quoted for all three commodities.
/// Missing quotes are carried forward.
pub fn daily_srmc(
    gas: &TimeSeries,
    coal: &TimeSeries,
    carbon: &TimeSeries,
    params: &SrmcParameters,
) -> ClimateResult<SrmcSeries> {
    params.validate()?;
    let (time, mut columns) = inner_join(&[gas, coal, carbon]);
    if time.is_empty() {
        return Err(market_error("gas, coal and carbon prices share no date"));
    }
    columns.iter_mut().for_each(forward_fill);

    let gas_cost = Zip::from(&columns[0])
        .and(&columns[2])
        .map_collect(|g, c| gas_srmc(*g, *c, params));
    let coal_cost = Zip::from(&columns[1])
        .and(&columns[2])
        .map_collect(|k, c| coal_srmc(*k, *c, params));
    info!("marginal costs on {} dates", time.len());

    Ok(SrmcSeries {
        time,
        gas: gas_cost,
        coal: coal_cost,
    })
}

impl FossilCapacities {
    /// Capacity series on the union of their timestamps
    pub fn from_series(brown_coal: &TimeSeries, hard_coal: &TimeSeries, natural_gas: &TimeSeries) -> Self {
        let (time, mut columns) = outer_join(&[brown_coal, hard_coal, natural_gas]);
        let natural_gas = columns.pop().unwrap_or_default();
        let hard_coal = columns.pop().unwrap_or_default();
        let brown_coal = columns.pop().unwrap_or_default();
        FossilCapacities {
            time,
            brown_coal,
            hard_coal,
            natural_gas,
        }
    }
}

/// Daily costs looked up by calendar day and carried forward over missing days
fn srmc_on_hours(time: &Array1<DateTime<Utc>>, srmc: &SrmcSeries) -> (Array1<f64>, Array1<f64>) {
    let by_date: HashMap<NaiveDate, (f64, f64)> = srmc
        .time
        .iter()
        .zip(srmc.gas.iter().zip(srmc.coal.iter()))
        .map(|(t, (gas, coal))| (t.date_naive(), (*gas, *coal)))
        .collect();
    let (gas, coal): (Vec<f64>, Vec<f64>) = time
        .iter()
        .map(|t| by_date.get(&t.date_naive()).copied().unwrap_or((f64::NAN, f64::NAN)))
        .unzip();
    let (mut gas, mut coal) = (Array1::from(gas), Array1::from(coal));
    forward_fill(&mut gas);
    forward_fill(&mut coal);
    (gas, coal)
}

/// Latest capacity at or before each hour, zero where unknown
fn capacities_on_hours(time: &Array1<DateTime<Utc>>, capacities: &FossilCapacities) -> (Array1<f64>, Array1<f64>) {
    let starts = capacities.time.to_vec();
    let known = |v: f64| if v.is_nan() { 0.0 } else { v };
    let (coal, gas): (Vec<f64>, Vec<f64>) = time
        .iter()
        .map(|t| match starts.partition_point(|s| s <= t) {
            0 => (0.0, 0.0),
            n => (
                known(capacities.brown_coal[n - 1]) + known(capacities.hard_coal[n - 1]),
                known(capacities.natural_gas[n - 1]),
            ),
        })
        .unzip();
    (Array1::from(coal), Array1::from(gas))
}

/// Merit order price of one hour. The cheaper fuel sets the price while its
/// capacity covers the fossil residual load, the dearer one beyond that.
/// A renewable surplus clears at zero.
pub fn reconstruct_price(
    rl_fossil: f64,
    gas_srmc: f64,
    coal_srmc: f64,
    capacity_coal: f64,
    capacity_gas: f64,
) -> f64 {
    if rl_fossil <= 0.0 {
        return 0.0;
    }
    let (cheaper, dearer, cheaper_capacity) = if coal_srmc <= gas_srmc {
        (coal_srmc, gas_srmc, capacity_coal)
    } else {
        (gas_srmc, coal_srmc, capacity_gas)
    };
    if rl_fossil <= cheaper_capacity {
        cheaper
    } else {
        dearer
    }
}

/// Reconstruct hourly prices; hours before the first quoted cost are dropped
pub fn reconstruct_prices(
    market: &HourlyMarket,
    srmc: &SrmcSeries,
    capacities: &FossilCapacities,
) -> ClimateResult<PriceReconstruction> {
    let loads = residual_loads(market);
    let (gas, coal) = srmc_on_hours(&market.time, srmc);
    let (capacity_coal, capacity_gas) = capacities_on_hours(&market.time, capacities);

    let keep: Vec<usize> = (0..market.len())
        .filter(|&h| gas[h].is_finite() && coal[h].is_finite())
        .collect();
    if keep.is_empty() {
        return Err(market_error("no market hour has a marginal cost"));
    }
    let reconstructed = keep
        .iter()
        .map(|&h| reconstruct_price(loads.rl_fossil[h], gas[h], coal[h], capacity_coal[h], capacity_gas[h]))
        .collect::<Array1<f64>>();
    debug!("{} of {} hours kept after the cost merge", keep.len(), market.len());

    Ok(PriceReconstruction {
        time: market.time.select(Axis(0), &keep),
        price: market.price.select(Axis(0), &keep),
        reconstructed,
        residual_load: loads.residual_load.select(Axis(0), &keep),
        rl_fossil: loads.rl_fossil.select(Axis(0), &keep),
    })
}

/// Coefficient of determination. A constant target scores 1 when matched
/// exactly and 0 otherwise.
pub fn r2_score(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    let n = actual.len();
    if n == 0 || n != predicted.len() {
        return f64::NAN;
    }
    let mean = actual.sum() / n as f64;
    let (ss_res, ss_tot) = Zip::from(&actual)
        .and(&predicted)
        .fold((0.0, 0.0), |(res, tot), a, p| (res + (a - p).powi(2), tot + (a - mean).powi(2)));
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn mean_absolute_error(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    (&actual - &predicted).mapv(f64::abs).sum() / actual.len() as f64
}

pub fn root_mean_squared_error(actual: ArrayView1<f64>, predicted: ArrayView1<f64>) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    ((&actual - &predicted).mapv(|d| d * d).sum() / actual.len() as f64).sqrt()
}

/// Residual load vs price correlation over the winter and the summer half year
fn half_year_correlations(reconstruction: &PriceReconstruction) -> (f64, f64) {
    let (winter, summer): (Vec<usize>, Vec<usize>) = (0..reconstruction.len())
        .partition(|&h| WINTER_MONTHS.contains(&reconstruction.time[h].month()));
    let correlation = |hours: &[usize]| {
        pearson(
            reconstruction.residual_load.select(Axis(0), hours).view(),
            reconstruction.price.select(Axis(0), hours).view(),
        )
    };
    (correlation(&winter), correlation(&summer))
}

pub fn market_metrics(reconstruction: &PriceReconstruction) -> MarketMetrics {
    let price = reconstruction.price.view();
    let correlation_residual_load = pearson(reconstruction.residual_load.view(), price);
    let correlation_rl_fossil = pearson(reconstruction.rl_fossil.view(), price);
    let (correlation_winter, correlation_summer) = half_year_correlations(reconstruction);
    let negative = |values: &Array1<f64>| values.iter().filter(|v| **v < 0.0).count();

    MarketMetrics {
        hours: reconstruction.len(),
        negative_residual_load_hours: negative(&reconstruction.residual_load),
        negative_rl_fossil_hours: negative(&reconstruction.rl_fossil),
        r2_reconstructed: r2_score(price, reconstruction.reconstructed.view()),
        mae: mean_absolute_error(price, reconstruction.reconstructed.view()),
        rmse: root_mean_squared_error(price, reconstruction.reconstructed.view()),
        correlation_residual_load,
        correlation_rl_fossil,
        r2_residual_load: correlation_residual_load.powi(2),
        r2_rl_fossil: correlation_rl_fossil.powi(2),
        correlation_winter,
        correlation_summer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::Duration;

    fn hours(first: DateTime<Utc>, values: Vec<f64>) -> TimeSeries {
        let time = (0..values.len() as i64)
            .map(|h| first + Duration::hours(h))
            .collect::<Array1<_>>();
        TimeSeries::new(time, Array1::from(values)).expect("valid")
    }

    fn days(first: DateTime<Utc>, values: Vec<f64>) -> TimeSeries {
        let time = (0..values.len() as i64)
            .map(|d| first + Duration::days(d))
            .collect::<Array1<_>>();
        TimeSeries::new(time, Array1::from(values)).expect("valid")
    }

    fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn smard_blocks_are_merged_in_order() {
        let first = parse_smard_block(
            r#"{"meta_data": {"version": 1}, "series": [[7200000, 3.5], [3600000, null], [10800000, 4]]}"#,
        )
        .expect("valid");
        let second = parse_smard_block(r#"{"series": [[10800000, 9.0], [0, 1.25]]}"#).expect("valid");
        let series = merge_smard_blocks(&[first, second]).expect("valid");

        assert_eq!(series.time[0], midnight(1970, 1, 1));
        assert_eq!(series.values.to_vec(), vec![1.25, 3.5, 4.0]);

        let index = parse_smard_index(r#"{"timestamps": [1420412400000, 1421017200000]}"#).expect("valid");
        assert_eq!(index.timestamps.len(), 2);
        assert_eq!(parse_smard_block("[]").expect_err("not a block").stage(), Stage::Market);
    }

    #[test]
    fn joins_and_forward_fill() {
        let a = days(midnight(2024, 1, 1), vec![1.0, 2.0, 3.0, 4.0]);
        let b = days(midnight(2024, 1, 2), vec![20.0, f64::NAN, 40.0]);
        let (time, columns) = inner_join(&[&a, &b]);
        assert_eq!(time.to_vec(), b.time.to_vec());
        assert_eq!(columns[0].to_vec(), vec![2.0, 3.0, 4.0]);

        let (time, mut columns) = outer_join(&[&a, &b]);
        assert_eq!(time.len(), 4);
        assert!(columns[1][0].is_nan());
        forward_fill(&mut columns[1]);
        assert!(columns[1][0].is_nan());
        assert_eq!(columns[1][2], 20.0);
    }

    #[test]
    fn srmc_formulas() {
        let params = SrmcParameters::default();
        // 30 EUR/MWh gas, 80 EUR/t carbon: 60 + 29.6 + 2
        assert_abs_diff_eq!(gas_srmc(30.0, 80.0, &params), 91.6, epsilon = 1e-9);
        // 108 USD/t coal is 100 EUR/t, 100 / 6.98 MWh
        assert_abs_diff_eq!(coal_eur_per_mwh(108.0, &params), 100.0 / 6.98, epsilon = 1e-9);
        let expected = 100.0 / 6.98 / 0.4 + 0.83 * 80.0 + 2.0;
        assert_abs_diff_eq!(coal_srmc(108.0, 80.0, &params), expected, epsilon = 1e-9);
    }

    #[test]
    fn daily_srmc_carries_missing_quotes_forward() {
        let gas = days(midnight(2024, 1, 1), vec![30.0, f64::NAN, 40.0]);
        let coal = days(midnight(2024, 1, 1), vec![108.0, 108.0, 108.0]);
        let carbon = days(midnight(2024, 1, 2), vec![80.0, 80.0]);
        let srmc = daily_srmc(&gas, &coal, &carbon, &SrmcParameters::default()).expect("valid");

        // the join starts on 2024-01-02, where gas has no quote to carry forward
        assert_eq!(srmc.time.len(), 2);
        assert!(srmc.gas[0].is_nan());
        assert_abs_diff_eq!(srmc.gas[1], 80.0 + 29.6 + 2.0, epsilon = 1e-9);
        assert!(srmc.spread()[1] < 0.0);

        let later = days(midnight(2025, 1, 1), vec![80.0]);
        let err = daily_srmc(&gas, &coal, &later, &SrmcParameters::default()).expect_err("no overlap");
        assert_eq!(err.stage(), Stage::Market);
    }

    #[test]
    fn merit_order_price() {
        // coal cheaper, demand within coal capacity
        assert_eq!(reconstruct_price(100.0, 90.0, 60.0, 150.0, 500.0), 60.0);
        // coal cheaper, demand beyond coal capacity
        assert_eq!(reconstruct_price(200.0, 90.0, 60.0, 150.0, 500.0), 90.0);
        // gas cheaper
        assert_eq!(reconstruct_price(100.0, 50.0, 60.0, 150.0, 120.0), 50.0);
        assert_eq!(reconstruct_price(130.0, 50.0, 60.0, 150.0, 120.0), 60.0);
        // surplus
        assert_eq!(reconstruct_price(0.0, 50.0, 60.0, 150.0, 120.0), 0.0);
        assert_eq!(reconstruct_price(-5.0, 50.0, 60.0, 150.0, 120.0), 0.0);
    }

    fn inputs(first: DateTime<Utc>, n: usize) -> MarketInputs {
        let flat = |v: f64| hours(first, vec![v; n]);
        MarketInputs {
            price: hours(first, (0..n).map(|h| 50.0 + h as f64).collect()),
            total_load: hours(first, (0..n).map(|h| 1000.0 + 100.0 * h as f64).collect()),
            solar: flat(100.0),
            wind_onshore: flat(150.0),
            wind_offshore: flat(50.0),
            nuclear: flat(0.0),
            biomass: flat(100.0),
            hydro: flat(50.0),
        }
    }

    #[test]
    fn residual_load_components() {
        let mut inputs = inputs(midnight(2024, 1, 1), 4);
        inputs.hydro.values[3] = f64::NAN;
        let market = align_hourly(&inputs).expect("valid");
        assert_eq!(market.len(), 3);

        let loads = residual_loads(&market);
        assert_eq!(loads.wind[0], 200.0);
        assert_eq!(loads.renewables[0], 300.0);
        assert_eq!(loads.baseload[0], 150.0);
        assert_eq!(loads.residual_load.to_vec(), vec![700.0, 800.0, 900.0]);
        assert_eq!(loads.rl_fossil.to_vec(), vec![550.0, 650.0, 750.0]);
    }

    #[test]
    fn hourly_reconstruction_uses_daily_costs_and_latest_capacity() {
        // 2024-01-01 22:00 .. 2024-01-02 01:00
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        let market = align_hourly(&inputs(first, 4)).expect("valid");

        // no quote on 2024-01-02, the one of 2024-01-01 is carried forward
        let srmc = SrmcSeries {
            time: Array1::from(vec![midnight(2024, 1, 1)]),
            gas: Array1::from(vec![90.0]),
            coal: Array1::from(vec![60.0]),
        };
        let stamps = |samples: Vec<(DateTime<Utc>, f64)>| {
            let (time, values): (Vec<_>, Vec<_>) = samples.into_iter().unzip();
            TimeSeries::new(Array1::from(time), Array1::from(values)).expect("valid")
        };
        let (december, january) = (midnight(2023, 12, 1), midnight(2024, 1, 2));
        let capacities = FossilCapacities::from_series(
            &stamps(vec![(december, 500.0), (january, 500.0)]),
            &stamps(vec![(december, 0.0), (january, 300.0)]),
            &stamps(vec![(december, f64::NAN)]),
        );
        assert_eq!(capacities.time.len(), 2);

        let result = reconstruct_prices(&market, &srmc, &capacities).expect("valid");
        assert_eq!(result.len(), 4);
        // rl_fossil 550, 650 | 750, 850 against coal capacity 500 | 800, gas unknown
        assert_eq!(result.reconstructed.to_vec(), vec![90.0, 90.0, 60.0, 90.0]);

        let metrics = market_metrics(&result);
        assert_eq!(metrics.hours, 4);
        assert_eq!(metrics.negative_rl_fossil_hours, 0);
        assert_abs_diff_eq!(metrics.correlation_residual_load, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.r2_residual_load, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.correlation_winter, 1.0, epsilon = 1e-12);
        assert!(metrics.correlation_summer.is_nan());
        // prices 50..53 against 90, 90, 60, 90
        assert_abs_diff_eq!(metrics.mae, (40.0 + 39.0 + 8.0 + 37.0) / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn costs_starting_after_the_market_hours_are_an_error() {
        let market = align_hourly(&inputs(midnight(2024, 1, 1), 3)).expect("valid");
        let srmc = SrmcSeries {
            time: Array1::from(vec![midnight(2024, 2, 1)]),
            gas: Array1::from(vec![90.0]),
            coal: Array1::from(vec![60.0]),
        };
        let capacities = FossilCapacities::from_series(
            &hours(midnight(2024, 1, 1), vec![500.0]),
            &hours(midnight(2024, 1, 1), vec![0.0]),
            &hours(midnight(2024, 1, 1), vec![300.0]),
        );
        let err = reconstruct_prices(&market, &srmc, &capacities).expect_err("no cost");
        assert_eq!(err.stage(), Stage::Market);
    }

    #[test]
    fn fit_scores() {
        let actual = Array1::from(vec![1.0, 2.0, 3.0, 4.0]);
        let predicted = Array1::from(vec![1.0, 2.0, 3.0, 6.0]);
        // ss_res 4, ss_tot 5
        assert_abs_diff_eq!(r2_score(actual.view(), predicted.view()), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(mean_absolute_error(actual.view(), predicted.view()), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(root_mean_squared_error(actual.view(), predicted.view()), 1.0, epsilon = 1e-12);

        let constant = Array1::from(vec![2.0, 2.0]);
        assert_eq!(r2_score(constant.view(), constant.view()), 1.0);
        assert_eq!(r2_score(constant.view(), actual.slice(ndarray::s![..2])), 0.0);
        assert!(r2_score(actual.view(), constant.view()).is_nan());
    }
}
