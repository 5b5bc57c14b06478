//! Season alignment of market value histories

use crate::types::{Observation, ValuationHistory};
use chrono::{Datelike, NaiveDate};

/// Seasons are measured from 1 October
pub const SEASON_START_MONTH: u32 = 10;
pub const SEASON_START_DAY: u32 = 1;

/// Season start cutoff for a year
pub fn season_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, SEASON_START_MONTH, SEASON_START_DAY)
}

/// A player's value as of a season start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignedValue {
    pub value: Option<i64>,
    pub date: Option<NaiveDate>,
}

impl From<&Observation> for AlignedValue {
    fn from(observation: &Observation) -> Self {
        Self { value: Some(observation.value), date: Some(observation.date) }
    }
}

/// Pick the observation representing a player's value at the season start.
///
/// Returns the last observation on or before the cutoff. When every
/// observation is later than the cutoff, the earliest one is returned
/// instead. Missing or empty history gives an empty result.
pub fn align_to_season_start(history: Option<&ValuationHistory>, year: i32) -> AlignedValue {
    let (Some(history), Some(cutoff)) = (history, season_start(year)) else {
        return AlignedValue::default();
    };

    let mut candidate: Option<&Observation> = None;
    for observation in history.iter() {
        if observation.date <= cutoff {
            candidate = Some(observation);
        } else {
            return candidate.unwrap_or(observation).into();
        }
    }

    candidate.map(AlignedValue::from).unwrap_or_default()
}

/// Age on the season start cutoff of `year`
pub fn age_at_season_start(date_of_birth: NaiveDate, year: i32) -> i32 {
    let mut age = year - date_of_birth.year();
    if (SEASON_START_MONTH, SEASON_START_DAY) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(points: &[(i64, NaiveDate)]) -> ValuationHistory {
        ValuationHistory::from_unsorted(
            points.iter().map(|&(value, date)| Observation::new(value, date)).collect(),
        )
    }

    #[test]
    fn test_last_value_before_cutoff() {
        let h = history(&[(100, date(2020, 1, 15)), (200, date(2020, 11, 3))]);

        let aligned = align_to_season_start(Some(&h), 2020);
        assert_eq!(aligned, AlignedValue { value: Some(100), date: Some(date(2020, 1, 15)) });
    }

    #[test]
    fn test_observation_on_cutoff_counts_as_before() {
        let h = history(&[(100, date(2020, 1, 15)), (150, date(2020, 10, 1)), (200, date(2020, 10, 2))]);

        let aligned = align_to_season_start(Some(&h), 2020);
        assert_eq!(aligned.value, Some(150));
        assert_eq!(aligned.date, Some(date(2020, 10, 1)));
    }

    #[test]
    fn test_all_before_cutoff_uses_latest() {
        let h = history(&[(100, date(2018, 1, 1)), (300, date(2019, 7, 1))]);

        let aligned = align_to_season_start(Some(&h), 2020);
        assert_eq!(aligned.value, Some(300));
    }

    #[test]
    fn test_falls_back_to_earliest_when_all_after_cutoff() {
        let h = history(&[(150, date(2021, 12, 1)), (400, date(2022, 6, 1))]);

        let aligned = align_to_season_start(Some(&h), 2020);
        assert_eq!(aligned, AlignedValue { value: Some(150), date: Some(date(2021, 12, 1)) });
    }

    #[test]
    fn test_empty_or_missing_history_is_absent() {
        let empty = ValuationHistory::default();

        assert_eq!(align_to_season_start(Some(&empty), 2020), AlignedValue::default());
        assert_eq!(align_to_season_start(None, 2020), AlignedValue::default());
    }

    #[test]
    fn test_age_at_season_start() {
        assert_eq!(age_at_season_start(date(1995, 11, 15), 2020), 24);
        assert_eq!(age_at_season_start(date(1995, 9, 1), 2020), 25);
        assert_eq!(age_at_season_start(date(1995, 10, 1), 2020), 25);
        assert_eq!(age_at_season_start(date(1995, 10, 2), 2020), 24);
    }
}
