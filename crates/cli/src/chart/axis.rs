//! Axis bounds and tick labels for the panel grid.

use rentratio_config::PanelsConfig;
use rentratio_io::Period;

use super::{Panel, PlottedSeries};
use crate::util::format_tick;

/// Y tick step per panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelTicks {
    pub value: f64,
    pub rent: f64,
    pub ratio: f64,
}

impl Default for PanelTicks {
    fn default() -> Self {
        Self::from(&PanelsConfig::default())
    }
}

impl From<&PanelsConfig> for PanelTicks {
    fn from(cfg: &PanelsConfig) -> Self {
        Self {
            value: cfg.value_tick,
            rent: cfg.rent_tick,
            ratio: cfg.ratio_tick,
        }
    }
}

impl PanelTicks {
    pub fn step(&self, panel: Panel) -> f64 {
        match panel {
            Panel::HomeValue => self.value,
            Panel::Rent => self.rent,
            Panel::PriceToRent => self.ratio,
        }
    }
}

/// Expand `[min, max]` outward to multiples of `step`. A flat range still
/// gets one step of height.
pub fn snap_bounds(min: f64, max: f64, step: f64) -> [f64; 2] {
    let lo = (min / step).floor() * step;
    let mut hi = (max / step).ceil() * step;
    if hi <= lo {
        hi = lo + step;
    }
    [lo, hi]
}

/// Tick labels from `lo` to `hi`. When more than `max_labels` multiples of
/// `step` fit, every n-th multiple is used instead.
pub fn tick_labels(bounds: [f64; 2], step: f64, max_labels: usize) -> Vec<String> {
    let [lo, hi] = bounds;
    let count = ((hi - lo) / step).round() as usize + 1;
    let max_labels = max_labels.max(2);
    let stride = count.div_ceil(max_labels).max(1);

    let mut labels: Vec<String> = (0..count)
        .step_by(stride)
        .map(|i| format_tick(lo + i as f64 * step))
        .collect();
    // ratatui spreads labels evenly, so the top one must be the bound itself.
    if (count - 1) % stride != 0 {
        labels.pop();
        labels.push(format_tick(hi));
    }
    labels
}

/// Y range across everything on one panel.
pub fn value_bounds(plotted: &[PlottedSeries], step: f64) -> Option<[f64; 2]> {
    let (min, max) = plotted
        .iter()
        .filter_map(|p| p.series.value_range())
        .reduce(|(a_min, a_max), (b_min, b_max)| (a_min.min(b_min), a_max.max(b_max)))?;
    Some(snap_bounds(min, max, step))
}

/// Earliest and latest period across everything on one panel.
pub fn period_bounds(plotted: &[PlottedSeries]) -> Option<(Period, Period)> {
    let first = plotted.iter().filter_map(|p| p.series.first_period()).min()?;
    let last = plotted.iter().filter_map(|p| p.series.last_period()).max()?;
    Some((first, last))
}

/// X axis numeric bounds plus `YYYY-MM` labels at both ends and the middle.
pub fn period_axis(first: Period, last: Period) -> ([f64; 2], Vec<String>) {
    let lo = first.ordinal();
    let hi = last.ordinal().max(lo + 1);
    let mut labels = vec![first.to_string()];
    if hi - lo >= 2 {
        labels.push(Period::from_ordinal(lo + (hi - lo) / 2).to_string());
    }
    labels.push(Period::from_ordinal(hi).to_string());
    ([lo as f64, hi as f64], labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentratio_io::Series;

    fn p(s: &str) -> Period {
        s.parse().unwrap()
    }

    #[test]
    fn snaps_to_steps() {
        assert_eq!(snap_bounds(480_000.0, 540_000.0, 25_000.0), [475_000.0, 550_000.0]);
        assert_eq!(snap_bounds(2000.0, 2250.0, 125.0), [2000.0, 2250.0]);
        assert_eq!(snap_bounds(17.4, 20.0, 2.5), [15.0, 20.0]);
        assert_eq!(snap_bounds(20.0, 20.0, 2.5), [20.0, 22.5]);
    }

    #[test]
    fn tick_labels_thin_out() {
        assert_eq!(tick_labels([15.0, 20.0], 2.5, 10), vec!["15", "17.5", "20"]);
        let labels = tick_labels([0.0, 1_000_000.0], 25_000.0, 5);
        assert!(labels.len() <= 6);
        assert_eq!(labels.first().unwrap(), "0");
        assert_eq!(labels.last().unwrap(), "1M");
    }

    #[test]
    fn bounds_span_all_series() {
        let a: Series = [(p("2021-10"), 500_000.0), (p("2021-12"), 540_000.0)].into_iter().collect();
        let b: Series = [(p("2021-11"), 210_000.0)].into_iter().collect();
        let plotted = vec![
            PlottedSeries { label: "austin".into(), series: a },
            PlottedSeries { label: "dayton".into(), series: b },
        ];
        assert_eq!(value_bounds(&plotted, 25_000.0), Some([200_000.0, 550_000.0]));
        assert_eq!(period_bounds(&plotted), Some((p("2021-10"), p("2021-12"))));
        assert_eq!(value_bounds(&[], 25_000.0), None);
    }

    #[test]
    fn period_axis_labels() {
        let (bounds, labels) = period_axis(p("2021-01"), p("2021-12"));
        assert_eq!(bounds, [p("2021-01").ordinal() as f64, p("2021-12").ordinal() as f64]);
        assert_eq!(labels, vec!["2021-01", "2021-06", "2021-12"]);

        let (_, single) = period_axis(p("2021-12"), p("2021-12"));
        assert_eq!(single, vec!["2021-12", "2022-01"]);
    }
}
