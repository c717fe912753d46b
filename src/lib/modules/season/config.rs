use chrono::{DateTime, Datelike, Utc};
use itertools::Itertools;
use serde_derive::{Deserialize, Serialize};

use crate::error::{ClimateError, ClimateResult, Stage};

/// Target calendar months and the month a season starts in.
/// A sample at month `m` of year `y` is labeled `y` when `m >= anchor_month`,
/// `y - 1` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSeasonSpec")]
pub struct SeasonSpec {
    months: Vec<u32>,
    anchor_month: u32,
}

#[derive(Deserialize)]
struct RawSeasonSpec {
    months: Vec<u32>,
    anchor_month: u32,
}

impl TryFrom<RawSeasonSpec> for SeasonSpec {
    type Error = ClimateError;

    fn try_from(raw: RawSeasonSpec) -> Result<Self, Self::Error> {
        SeasonSpec::new(&raw.months, raw.anchor_month)
    }
}

impl SeasonSpec {
    pub fn new(months: &[u32], anchor_month: u32) -> ClimateResult<Self> {
        if months.is_empty() {
            return Err(ClimateError::new(Stage::Season, "no target months given"));
        }
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(ClimateError::new(
                Stage::Season,
                format!("invalid month number {bad}"),
            ));
        }
        if months.iter().duplicates().next().is_some() {
            return Err(ClimateError::new(
                Stage::Season,
                format!("duplicated months in {months:?}"),
            ));
        }
        if !months.contains(&anchor_month) {
            return Err(ClimateError::new(
                Stage::Season,
                format!("anchor month {anchor_month} is not one of the target months {months:?}"),
            ));
        }
        // one run of consecutive months starting at the anchor, possibly across the year end
        let run_from_anchor = (0..months.len() as u32)
            .all(|k| months.contains(&((anchor_month - 1 + k) % 12 + 1)));
        if !run_from_anchor {
            return Err(ClimateError::new(
                Stage::Season,
                format!("months {months:?} are not consecutive starting at month {anchor_month}"),
            ));
        }
        Ok(SeasonSpec {
            months: months.to_vec(),
            anchor_month,
        })
    }

    /// December-January-February, anchored at December
    pub fn djf() -> Self {
        SeasonSpec {
            months: vec![12, 1, 2],
            anchor_month: 12,
        }
    }

    /// June-July-August, anchored at June
    pub fn jja() -> Self {
        SeasonSpec {
            months: vec![6, 7, 8],
            anchor_month: 6,
        }
    }

    pub fn months(&self) -> &[u32] {
        &self.months
    }

    pub fn anchor_month(&self) -> u32 {
        self.anchor_month
    }

    /// samples expected in a complete season of a monthly source
    pub fn expected_count(&self) -> usize {
        self.months.len()
    }

    pub fn contains(&self, month: u32) -> bool {
        self.months.contains(&month)
    }

    /// season label of a timestamp, None when its month is not targeted
    pub fn label(&self, time: &DateTime<Utc>) -> Option<i32> {
        let month = time.month();
        if !self.contains(month) {
            return None;
        }
        if month >= self.anchor_month {
            Some(time.year())
        } else {
            Some(time.year() - 1)
        }
    }
}

impl Default for SeasonSpec {
    fn default() -> Self {
        SeasonSpec::djf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn djf_labels_span_the_year_end() {
        let spec = SeasonSpec::djf();
        let dec = Utc.with_ymd_and_hms(1950, 12, 1, 0, 0, 0).unwrap();
        let jan = Utc.with_ymd_and_hms(1951, 1, 1, 0, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(1951, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(spec.label(&dec), Some(1950));
        assert_eq!(spec.label(&jan), Some(1950));
        assert_eq!(spec.label(&mar), None);
    }

    #[test]
    fn invalid_months_are_rejected() {
        assert!(SeasonSpec::new(&[12, 13], 12).is_err());
        assert!(SeasonSpec::new(&[0, 1], 1).is_err());
        assert!(SeasonSpec::new(&[], 1).is_err());
        assert!(SeasonSpec::new(&[1, 1, 2], 1).is_err());
        assert!(SeasonSpec::new(&[12, 1, 2], 3).is_err());
    }

    #[test]
    fn anchor_must_open_a_consecutive_run() {
        // March would be labelled one season before April and May
        assert!(SeasonSpec::new(&[3, 4, 5], 4).is_err());
        assert!(SeasonSpec::new(&[12, 1, 2], 1).is_err());
        assert!(SeasonSpec::new(&[1, 2, 4], 1).is_err());

        let mam = SeasonSpec::new(&[5, 3, 4], 3).expect("order does not matter");
        let labels: Vec<Option<i32>> = (3..=5)
            .map(|m| mam.label(&Utc.with_ymd_and_hms(1950, m, 1, 0, 0, 0).unwrap()))
            .collect();
        assert_eq!(labels, vec![Some(1950); 3]);

        let ndjfm = SeasonSpec::new(&[11, 12, 1, 2, 3], 11).expect("wraps the year end");
        assert_eq!(ndjfm.label(&Utc.with_ymd_and_hms(1951, 3, 1, 0, 0, 0).unwrap()), Some(1950));
        assert!(SeasonSpec::new(&(1..=12).collect::<Vec<u32>>(), 7).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<SeasonSpec, _> = serde_json::from_str(r#"{"months":[6,7,8],"anchor_month":6}"#);
        assert_eq!(ok.expect("valid spec"), SeasonSpec::jja());
        let bad: Result<SeasonSpec, _> = serde_json::from_str(r#"{"months":[6,7,8],"anchor_month":12}"#);
        assert!(bad.is_err());
    }
}
