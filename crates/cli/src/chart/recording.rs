//! In-memory sink: keeps panel contents, the legend and a call log.

use std::io;

use rentratio_io::Series;

use super::{ChartSink, Panel, PlottedSeries};

/// One observed sink call, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Plot { panel: Panel, label: String },
    Legend(Vec<String>),
    Clear,
    Flush,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingChart {
    panels: [Vec<PlottedSeries>; 3],
    legend: Vec<String>,
    frames: usize,
    calls: Vec<SinkCall>,
}

impl RecordingChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, panel: Panel) -> &[PlottedSeries] {
        &self.panels[panel.index()]
    }

    /// Labels plotted on a panel, in plot order.
    pub fn labels(&self, panel: Panel) -> Vec<&str> {
        self.panel(panel).iter().map(|p| p.label.as_str()).collect()
    }

    pub fn legend(&self) -> &[String] {
        &self.legend
    }

    /// Number of `flush_frame` calls so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Panel contents and legend, ignoring frame and call history.
    pub fn snapshot(&self) -> (Vec<Vec<PlottedSeries>>, Vec<String>) {
        (self.panels.to_vec(), self.legend.clone())
    }
}

impl ChartSink for RecordingChart {
    fn plot_series(&mut self, series: &Series, panel: Panel, label: &str) {
        self.panels[panel.index()].push(PlottedSeries {
            label: label.to_string(),
            series: series.clone(),
        });
        self.calls.push(SinkCall::Plot {
            panel,
            label: label.to_string(),
        });
    }

    fn set_legend(&mut self, labels: &[String]) {
        self.legend = labels.to_vec();
        self.calls.push(SinkCall::Legend(labels.to_vec()));
    }

    fn clear(&mut self) {
        for panel in &mut self.panels {
            panel.clear();
        }
        self.legend.clear();
        self.calls.push(SinkCall::Clear);
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        self.frames += 1;
        self.calls.push(SinkCall::Flush);
        Ok(())
    }
}
