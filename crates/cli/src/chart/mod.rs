//! Chart seam: the fixed panel set and the sink the session draws into.
//!
//! The session only ever talks to [`ChartSink`]. [`terminal::TerminalChart`]
//! is the interactive renderer; [`recording::RecordingChart`] keeps calls in
//! memory for tests and headless runs.

pub mod axis;
pub mod recording;
pub mod terminal;

use std::io;

use rentratio_io::Series;
use rentratio_recon::{CanonicalRegion, SeriesKind};

pub use axis::PanelTicks;
pub use recording::RecordingChart;
pub use terminal::TerminalChart;

/// One chart area. Each accumulates one metric's series across regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
    HomeValue,
    Rent,
    PriceToRent,
}

impl Panel {
    /// Plot order within one region.
    pub const ALL: [Panel; 3] = [Panel::HomeValue, Panel::Rent, Panel::PriceToRent];

    pub fn title(self) -> &'static str {
        match self {
            Panel::HomeValue => "Home value index",
            Panel::Rent => "Rental index",
            Panel::PriceToRent => "Price-to-rent",
        }
    }

    pub fn kind(self) -> SeriesKind {
        match self {
            Panel::HomeValue => SeriesKind::Primary,
            Panel::Rent => SeriesKind::Secondary,
            Panel::PriceToRent => SeriesKind::Derived,
        }
    }

    /// The region's series for this panel, if it has one.
    pub fn series_of(self, region: &CanonicalRegion) -> Option<&Series> {
        region.series(self.kind())
    }

    pub fn index(self) -> usize {
        match self {
            Panel::HomeValue => 0,
            Panel::Rent => 1,
            Panel::PriceToRent => 2,
        }
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// A labelled series held by a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedSeries {
    pub label: String,
    pub series: Series,
}

/// Rendering backend.
///
/// Calls arrive in order: any number of `plot_series` / `set_legend`, then a
/// single `flush_frame` per command. `clear` may arrive at any time.
pub trait ChartSink {
    fn plot_series(&mut self, series: &Series, panel: Panel, label: &str);
    fn set_legend(&mut self, labels: &[String]);
    fn clear(&mut self);
    fn flush_frame(&mut self) -> io::Result<()>;
}

impl<S: ChartSink + ?Sized> ChartSink for &mut S {
    fn plot_series(&mut self, series: &Series, panel: Panel, label: &str) {
        (**self).plot_series(series, panel, label)
    }

    fn set_legend(&mut self, labels: &[String]) {
        (**self).set_legend(labels)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        (**self).flush_frame()
    }
}
