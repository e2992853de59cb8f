//! Derived metrics layered on top of the two source series.

use rentratio_io::Series;

/// Annual value against a monthly rent.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Price-to-rent ratio: `primary / secondary / 12` per period.
///
/// Absent when either input is absent. Periods missing from either side, or
/// with a zero rent, are left out rather than reported as errors.
pub fn price_to_rent(primary: Option<&Series>, secondary: Option<&Series>) -> Option<Series> {
    Some(ratio_series(primary?, secondary?))
}

pub fn ratio_series(primary: &Series, secondary: &Series) -> Series {
    primary
        .iter()
        .filter_map(|(period, value)| {
            let rent = secondary.get(period)?;
            let ratio = value / rent / MONTHS_PER_YEAR;
            ratio.is_finite().then_some((period, ratio))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentratio_io::Period;

    fn p(s: &str) -> Period {
        s.parse().unwrap()
    }

    fn series(points: &[(&str, f64)]) -> Series {
        points.iter().map(|(k, v)| (p(k), *v)).collect()
    }

    #[test]
    fn ratio_per_period() {
        let zhvi = series(&[("2021-11", 480000.0), ("2021-12", 540000.0)]);
        let zori = series(&[("2021-11", 2000.0), ("2021-12", 2250.0)]);
        let ratio = ratio_series(&zhvi, &zori);
        assert_eq!(ratio.len(), 2);
        assert!((ratio.get(p("2021-11")).unwrap() - 20.0).abs() < 1e-9);
        assert!((ratio.get(p("2021-12")).unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn one_sided_periods_are_excluded() {
        let zhvi = series(&[("2014-01", 200000.0), ("2021-12", 300000.0)]);
        let zori = series(&[("2021-12", 1250.0), ("2022-01", 1300.0)]);
        let ratio = ratio_series(&zhvi, &zori);
        assert_eq!(ratio.periods().collect::<Vec<_>>(), vec![p("2021-12")]);
    }

    #[test]
    fn zero_rent_is_unavailable() {
        let zhvi = series(&[("2021-12", 300000.0)]);
        let zori = series(&[("2021-12", 0.0)]);
        assert!(ratio_series(&zhvi, &zori).is_empty());
    }

    #[test]
    fn absent_input_means_absent_output() {
        let s = series(&[("2021-12", 1.0)]);
        assert!(price_to_rent(Some(&s), None).is_none());
        assert!(price_to_rent(None, Some(&s)).is_none());
        assert!(price_to_rent(Some(&s), Some(&s)).is_some());
    }
}
