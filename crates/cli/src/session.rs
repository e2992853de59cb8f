//! Interactive session: read a line, dispatch it, draw into the chart sink.
//!
//! The controller borrows the reconciled dataset for its whole lifetime and
//! owns the only mutable state: the legend and the per-panel plot history.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use log::{info, warn};
use rentratio_recon::ReconciliationResult;

use crate::chart::{ChartSink, Panel, PlottedSeries};
use crate::command::Command;

pub const PROMPT: &str = "Cities or q?";

// ============================================================================
// State
// ============================================================================

/// Mutable, process-lifetime session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    duplicate_keys: BTreeSet<String>,
    displayed_regions: Vec<String>,
    panels: [Vec<PlottedSeries>; 3],
}

impl SessionState {
    pub fn new(duplicate_keys: BTreeSet<String>) -> Self {
        Self {
            duplicate_keys,
            ..Self::default()
        }
    }

    pub fn is_duplicate(&self, key: &str) -> bool {
        self.duplicate_keys.contains(key)
    }

    /// Keys drawn since the last clear, in draw order. This is the legend.
    pub fn displayed_regions(&self) -> &[String] {
        &self.displayed_regions
    }

    pub fn panel(&self, panel: Panel) -> &[PlottedSeries] {
        &self.panels[panel.index()]
    }

    fn reset(&mut self) {
        self.displayed_regions.clear();
        for panel in &mut self.panels {
            panel.clear();
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// What one command did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Keys added to the legend, in order.
    pub plotted: Vec<String>,
    /// Tokens with no matching region, as typed.
    pub unknown: Vec<String>,
    /// Plotted keys that were flagged as duplicate-affected.
    pub duplicates: Vec<String>,
}

impl DispatchReport {
    pub fn is_empty(&self) -> bool {
        self.plotted.is_empty() && self.unknown.is_empty() && self.duplicates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(DispatchReport),
    Quit,
}

/// How [`SessionController::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// The user typed `q`.
    Quit,
    /// The input channel closed.
    EndOfInput,
}

pub struct SessionController<'a, S: ChartSink> {
    data: &'a ReconciliationResult,
    defaults: Vec<String>,
    sink: S,
    state: SessionState,
}

impl<'a, S: ChartSink> SessionController<'a, S> {
    pub fn new(data: &'a ReconciliationResult, defaults: Vec<String>, sink: S) -> Self {
        Self {
            data,
            defaults,
            sink,
            state: SessionState::new(data.duplicate_keys.clone()),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Parse and dispatch one input line.
    pub fn handle_line(&mut self, line: &str) -> Step {
        self.execute(Command::parse(line))
    }

    pub fn execute(&mut self, command: Command) -> Step {
        match command {
            Command::Quit => {
                info!("Bye");
                Step::Quit
            }
            Command::Clear => {
                self.state.reset();
                self.sink.clear();
                Step::Continue(DispatchReport::default())
            }
            Command::Noop => Step::Continue(DispatchReport::default()),
            Command::Defaults => {
                let defaults = self.defaults.clone();
                Step::Continue(self.plot_regions(&defaults))
            }
            Command::Regions(tokens) => Step::Continue(self.plot_regions(&tokens)),
        }
    }

    /// Resolve each token and draw every known region onto all panels it has
    /// data for. Unknown tokens are skipped; the batch continues.
    pub fn plot_regions(&mut self, tokens: &[String]) -> DispatchReport {
        info!("Plotting data...");
        let data = self.data;
        let mut report = DispatchReport::default();

        for token in tokens {
            let Some(region) = data.get(token) else {
                warn!("{} does not exist in data.", token);
                report.unknown.push(token.clone());
                continue;
            };
            let key = region.key.clone();
            if self.state.is_duplicate(&key) {
                warn!("{} has duplicate entries in dataset.", token);
                report.duplicates.push(key.clone());
            }

            for panel in Panel::ALL {
                if let Some(series) = panel.series_of(region) {
                    self.sink.plot_series(series, panel, &key);
                    self.state.panels[panel.index()].push(PlottedSeries {
                        label: key.clone(),
                        series: series.clone(),
                    });
                }
            }

            self.state.displayed_regions.push(key.clone());
            self.sink.set_legend(&self.state.displayed_regions);
            report.plotted.push(key);
        }

        if !report.plotted.is_empty() {
            if let Err(e) = self.sink.flush_frame() {
                warn!("failed to draw chart: {}", e);
            }
        }
        report
    }

    /// Prompt, read and dispatch until `q` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut prompt: W) -> io::Result<SessionExit> {
        info!("Starting interactive loop...");
        let mut buf = Vec::new();
        loop {
            writeln!(prompt, "{}", PROMPT)?;
            prompt.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                info!("Bye");
                return Ok(SessionExit::EndOfInput);
            }
            // A mis-encoded line is just another unknown token.
            let line = String::from_utf8_lossy(&buf);
            if self.handle_line(&line) == Step::Quit {
                return Ok(SessionExit::Quit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RecordingChart;
    use rentratio_io::{Period, Series};
    use rentratio_recon::CanonicalRegion;

    fn region(key: &str, state: &str, with_rent: bool) -> CanonicalRegion {
        let dec: Period = "2021-12".parse().unwrap();
        let value: Series = [(dec, 540_000.0)].into_iter().collect();
        let rent: Series = [(dec, 2250.0)].into_iter().collect();
        let ratio: Series = [(dec, 20.0)].into_iter().collect();
        CanonicalRegion {
            key: key.into(),
            state: state.into(),
            size_rank: 1,
            region_id: 1,
            row_index: 1,
            primary_series: value,
            secondary_series: with_rent.then(|| rent),
            derived_series: with_rent.then(|| ratio),
        }
    }

    fn dataset() -> ReconciliationResult {
        let mut result = ReconciliationResult::default();
        for r in [region("austin", "TX", true), region("dayton", "OH", false)] {
            result.order.push(r.key.clone());
            result.regions.insert(r.key.clone(), r);
        }
        result.duplicate_keys.insert("austin".into());
        result
    }

    #[test]
    fn plots_every_available_panel() {
        let data = dataset();
        let mut session = SessionController::new(&data, vec![], RecordingChart::new());
        let step = session.handle_line("Dayton, AUSTIN");
        let Step::Continue(report) = step else { panic!("expected continue") };
        assert_eq!(report.plotted, vec!["dayton", "austin"]);
        assert_eq!(report.duplicates, vec!["austin"]);

        let sink = session.sink();
        assert_eq!(sink.labels(Panel::HomeValue), vec!["dayton", "austin"]);
        assert_eq!(sink.labels(Panel::Rent), vec!["austin"]);
        assert_eq!(sink.labels(Panel::PriceToRent), vec!["austin"]);
        assert_eq!(sink.legend(), ["dayton", "austin"]);
        assert_eq!(sink.frames(), 1);
    }

    #[test]
    fn all_unknown_does_not_flush() {
        let data = dataset();
        let mut session = SessionController::new(&data, vec![], RecordingChart::new());
        let Step::Continue(report) = session.handle_line("atlantis") else { panic!() };
        assert_eq!(report.unknown, vec!["atlantis"]);
        assert_eq!(session.sink().frames(), 0);
        assert!(session.state().displayed_regions().is_empty());
    }

    #[test]
    fn quit_step() {
        let data = dataset();
        let mut session = SessionController::new(&data, vec![], RecordingChart::new());
        assert_eq!(session.handle_line("q\n"), Step::Quit);
    }

    #[test]
    fn state_mirrors_sink() {
        let data = dataset();
        let mut session = SessionController::new(&data, vec!["austin".into()], RecordingChart::new());
        session.handle_line("D");
        assert_eq!(session.state().panel(Panel::Rent).len(), 1);
        assert_eq!(session.state().panel(Panel::Rent), session.sink().panel(Panel::Rent));
        session.handle_line("clear");
        assert!(session.state().panel(Panel::HomeValue).is_empty());
        assert!(session.state().is_duplicate("austin"));
    }
}
