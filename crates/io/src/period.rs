// Calendar periods and period-keyed series

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

/// A calendar month, the shared key space of both sources.
///
/// Displayed and parsed as `YYYY-MM`. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months elapsed since January of year 0. Used as a chart x coordinate.
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a YYYY-MM period: '{0}'")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|_| ParsePeriodError(s.to_string()))?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Ordered `Period -> value` observations for one region and one metric.
///
/// Missing observations are simply absent; there is no NaN placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: BTreeMap<Period, f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, period: Period, value: f64) {
        self.points.insert(period, value);
    }

    pub fn get(&self, period: Period) -> Option<f64> {
        self.points.get(&period).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        self.points.iter().map(|(p, v)| (*p, *v))
    }

    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.points.keys().copied()
    }

    pub fn first_period(&self) -> Option<Period> {
        self.points.keys().next().copied()
    }

    pub fn last_period(&self) -> Option<Period> {
        self.points.keys().next_back().copied()
    }

    /// (min, max) over all values, `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.values().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl FromIterator<(Period, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (Period, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Period {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display() {
        let period = p("2021-12");
        assert_eq!(period.year(), 2021);
        assert_eq!(period.month(), 12);
        assert_eq!(period.to_string(), "2021-12");
        assert_eq!(p("2000-1").to_string(), "2000-01");
    }

    #[test]
    fn rejects_full_dates_and_garbage() {
        assert!("2021-12-31".parse::<Period>().is_err());
        assert!("2021-13".parse::<Period>().is_err());
        assert!("Msa".parse::<Period>().is_err());
        assert!("".parse::<Period>().is_err());
    }

    #[test]
    fn ordering_is_chronological() {
        assert!(p("2020-12") < p("2021-01"));
        assert!(p("2021-02") < p("2021-10"));
    }

    #[test]
    fn ordinal_roundtrip_across_year_boundary() {
        let dec = p("2021-12");
        let jan = Period::from_ordinal(dec.ordinal() + 1);
        assert_eq!(jan, p("2022-01"));
        assert_eq!(Period::from_ordinal(dec.ordinal()), dec);
    }

    #[test]
    fn series_range_and_bounds() {
        let s: Series = [(p("2021-02"), 3.0), (p("2021-01"), 5.0), (p("2021-03"), -1.0)]
            .into_iter()
            .collect();
        assert_eq!(s.first_period(), Some(p("2021-01")));
        assert_eq!(s.last_period(), Some(p("2021-03")));
        assert_eq!(s.value_range(), Some((-1.0, 5.0)));
        assert_eq!(Series::new().value_range(), None);
    }
}
