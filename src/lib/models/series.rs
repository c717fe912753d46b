use chrono::{DateTime, Utc};
use ndarray::Array1;

use crate::error::{ClimateError, ClimateResult, Stage};
use crate::helpers::{add_months, month_start};

/// A scalar quantity sampled on a strictly increasing time axis
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub time: Array1<DateTime<Utc>>,
    pub values: Array1<f64>,
}

/// fails when the time axis is not strictly increasing
pub fn check_time_axis(time: &Array1<DateTime<Utc>>) -> ClimateResult<()> {
    if let Some(pos) = time
        .windows(2)
        .into_iter()
        .position(|w| w[1] <= w[0])
    {
        return Err(ClimateError::new(
            Stage::Input,
            format!(
                "time axis is not strictly increasing at index {} ({} -> {})",
                pos + 1,
                time[pos],
                time[pos + 1]
            ),
        ));
    }
    Ok(())
}

impl TimeSeries {
    pub fn new(time: Array1<DateTime<Utc>>, values: Array1<f64>) -> ClimateResult<Self> {
        if time.len() != values.len() {
            return Err(ClimateError::new(
                Stage::Input,
                format!(
                    "time axis has {} entries but {} values were given",
                    time.len(),
                    values.len()
                ),
            ));
        }
        check_time_axis(&time)?;
        Ok(TimeSeries { time, values })
    }

    /// Monthly series starting on the first day of `year`-`month`
    pub fn monthly(year: i32, month: u32, values: Vec<f64>) -> ClimateResult<Self> {
        let start = month_start(year, month)?;
        let time = (0..values.len())
            .map(|i| add_months(&start, i as u32))
            .collect::<ClimateResult<Array1<DateTime<Utc>>>>()?;
        TimeSeries::new(time, Array1::from(values))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mapv(&self, fun: impl Fn(f64) -> f64) -> TimeSeries {
        TimeSeries {
            time: self.time.clone(),
            values: self.values.mapv(fun),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn rejects_unordered_time() {
        let t0 = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        let result = TimeSeries::new(Array1::from(vec![t0, t1]), Array1::from(vec![1.0, 2.0]));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let t0 = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let result = TimeSeries::new(Array1::from(vec![t0]), Array1::from(vec![1.0, 2.0]));
        assert!(result.is_err());
    }

    #[test]
    fn monthly_series_crosses_year_end() {
        let series = TimeSeries::monthly(1940, 11, vec![1.0, 2.0, 3.0]).expect("valid series");
        assert_eq!(series.len(), 3);
        assert_eq!(series.time[2].year(), 1941);
        assert_eq!(series.time[2].month(), 1);
    }
}
