use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Site-relative player profile link, e.g. `/harry-kane/profil/spieler/132098`
pub type EntityLink = String;

/// Absolute club roster link for one season
pub type UnitLink = String;

/// Descriptive attributes scraped from a player profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Player name derived from the profile link slug
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Height in centimeters as scraped (e.g. "188")
    pub height_cm: Option<String>,
    pub foot: Option<String>,
    pub citizenship: Option<String>,
    pub position: Option<String>,
}

/// One market value observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Market value in whole currency units
    pub value: i64,
    pub date: NaiveDate,
}

impl Observation {
    pub fn new(value: i64, date: NaiveDate) -> Self {
        Self { value, date }
    }
}

/// Market value history of one player, always ascending by date.
///
/// Construction sorts (stably) so every consumer can rely on the ordering,
/// including histories decoded from a cache file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct ValuationHistory {
    observations: Vec<Observation>,
}

impl ValuationHistory {
    pub fn from_unsorted(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl From<Vec<Observation>> for ValuationHistory {
    fn from(observations: Vec<Observation>) -> Self {
        Self::from_unsorted(observations)
    }
}

impl From<ValuationHistory> for Vec<Observation> {
    fn from(history: ValuationHistory) -> Self {
        history.observations
    }
}

/// Cached links for one season.
///
/// The two halves are resolved and cached separately; a season is complete
/// only when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonLinks {
    pub units: Option<BTreeSet<UnitLink>>,
    /// Club name -> player links
    pub rosters: Option<BTreeMap<String, BTreeSet<EntityLink>>>,
}

impl SeasonLinks {
    pub fn is_complete(&self) -> bool {
        self.units.is_some() && self.rosters.is_some()
    }
}

/// Outcome of a cached extraction.
///
/// `Absent` is a legitimate result and is cached; `Failed` is never cached so
/// the next run retries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Present(T),
    Absent,
    Failed(String),
}

impl<T> Lookup<T> {
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Lookup::Failed(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Present(value) => Some(value),
            Lookup::Absent | Lookup::Failed(_) => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Present(value),
            None => Lookup::Absent,
        }
    }
}

/// One output row: a player's attributes and value as of a season start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSnapshot {
    pub year: i32,
    /// Club name for this season
    pub unit: String,
    pub entity: EntityLink,
    pub attributes: AttributeRecord,
    pub value: Option<i64>,
    pub value_date: Option<NaiveDate>,
    /// Age at the season start cutoff
    pub age: Option<i32>,
}

/// Counters for one processed season
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeasonReport {
    pub year: i32,
    pub units: usize,
    pub entities: usize,
    pub rows: usize,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_history_sorted_on_construction() {
        let history = ValuationHistory::from_unsorted(vec![
            Observation::new(300, date(2021, 3, 1)),
            Observation::new(100, date(2019, 6, 1)),
            Observation::new(200, date(2020, 1, 1)),
        ]);

        let dates: Vec<_> = history.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![date(2019, 6, 1), date(2020, 1, 1), date(2021, 3, 1)]);
    }

    #[test]
    fn test_history_sort_is_stable_for_equal_dates() {
        let history = ValuationHistory::from_unsorted(vec![
            Observation::new(2, date(2020, 5, 1)),
            Observation::new(1, date(2019, 5, 1)),
            Observation::new(3, date(2020, 5, 1)),
        ]);

        let values: Vec<_> = history.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_sorting_sorted_history_is_identity() {
        let sorted = vec![
            Observation::new(1, date(2019, 5, 1)),
            Observation::new(2, date(2020, 5, 1)),
            Observation::new(3, date(2020, 5, 1)),
            Observation::new(4, date(2022, 1, 9)),
        ];

        let once = ValuationHistory::from_unsorted(sorted.clone());
        assert_eq!(once.observations(), sorted.as_slice());

        let twice = ValuationHistory::from_unsorted(once.observations().to_vec());
        assert_eq!(twice, once);
    }

    #[test]
    fn test_lookup_cacheability() {
        assert!(Lookup::Present(1).is_cacheable());
        assert!(Lookup::<i32>::Absent.is_cacheable());
        assert!(!Lookup::<i32>::Failed("timeout".to_string()).is_cacheable());
        assert_eq!(Lookup::from(Some(5)), Lookup::Present(5));
        assert_eq!(Lookup::<i32>::from(None), Lookup::Absent);
    }

    #[test]
    fn test_season_links_completeness() {
        let mut links = SeasonLinks::default();
        assert!(!links.is_complete());

        links.units = Some(BTreeSet::new());
        assert!(!links.is_complete());

        links.rosters = Some(BTreeMap::new());
        assert!(links.is_complete());
    }
}
