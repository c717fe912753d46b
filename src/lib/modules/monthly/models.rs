use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};

/// Month-to-month Pearson coefficients of a monthly series
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCorrelation {
    /// calendar months in row/column order, starting at the first month of the year grouping
    pub months: Vec<u32>,
    /// group years contributing at least one value
    pub years: Vec<i32>,
    /// 12x12, symmetric
    pub matrix: Array2<f64>,
}

impl MonthCorrelation {
    pub fn get(&self, month_a: u32, month_b: u32) -> Option<f64> {
        let i = self.months.iter().position(|m| *m == month_a)?;
        let j = self.months.iter().position(|m| *m == month_b)?;
        Some(self.matrix[[i, j]])
    }
}

/// Months where both wind and solar resources are low
#[derive(Debug, Clone, PartialEq)]
pub struct DunkelflauteResult {
    pub time: Array1<DateTime<Utc>>,
    pub flags: Array1<bool>,
    pub wind_threshold: f64,
    pub solar_threshold: f64,
    /// flagged months per calendar month, January first
    pub count_by_month: [usize; 12],
    /// share of flagged years per calendar month, NaN for months without data
    pub frequency_by_month: [f64; 12],
}

impl DunkelflauteResult {
    pub fn n_flagged(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }
}
