//! Terminal renderer: a 2x2 panel grid drawn with ratatui into an off-screen
//! buffer, then written out line by line.
//!
//! ```text
//! ┌Home value index──┐┌Rental index──────┐
//! │                  ││                  │
//! └──────────────────┘└──────────────────┘
//! ┌Price-to-rent─────┐┌Legend────────────┐
//! │                  ││━━ austin         │
//! └──────────────────┘└──────────────────┘
//! ```

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color as TermColor, Print, ResetColor, SetForegroundColor};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, List, ListItem, Widget};

use rentratio_io::Series;

use super::axis::{period_axis, period_bounds, tick_labels, value_bounds, PanelTicks};
use super::{ChartSink, Panel, PlottedSeries};
use crate::util;

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 12;

const PALETTE: [Color; 10] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::LightCyan,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightGreen,
];

pub struct TerminalChart<W: Write> {
    out: W,
    width: u16,
    height: u16,
    colored: bool,
    ticks: PanelTicks,
    panels: [Vec<PlottedSeries>; 3],
    legend: Vec<String>,
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            width: width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
            colored: false,
            ticks: PanelTicks::default(),
            panels: Default::default(),
            legend: Vec::new(),
        }
    }

    /// Emit ANSI colors. Off by default so piped output stays plain text.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn with_ticks(mut self, ticks: PanelTicks) -> Self {
        self.ticks = ticks;
        self
    }

    /// Draw the current state into a fresh buffer.
    pub fn render(&self) -> Buffer {
        let area = Rect::new(0, 0, self.width, self.height);
        let mut buf = Buffer::empty(area);

        let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
        let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[0]);
        let bottom =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(rows[1]);

        self.render_panel(Panel::HomeValue, top[0], &mut buf);
        self.render_panel(Panel::Rent, top[1], &mut buf);
        self.render_panel(Panel::PriceToRent, bottom[0], &mut buf);
        self.render_legend(bottom[1], &mut buf);
        buf
    }

    fn color_for(&self, label: &str) -> Color {
        let slot = self
            .legend
            .iter()
            .position(|l| l == label)
            .unwrap_or_else(|| label.bytes().map(usize::from).sum());
        PALETTE[slot % PALETTE.len()]
    }

    fn render_panel(&self, panel: Panel, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(panel.title());
        let plotted = &self.panels[panel.index()];
        let step = self.ticks.step(panel);

        let (Some(y_bounds), Some((first, last))) = (value_bounds(plotted, step), period_bounds(plotted))
        else {
            block.render(area, buf);
            return;
        };
        let (x_bounds, x_labels) = period_axis(first, last);
        let max_y_labels = usize::from(area.height.saturating_sub(4) / 2);
        let y_labels = tick_labels(y_bounds, step, max_y_labels);

        let points: Vec<Vec<(f64, f64)>> = plotted.iter().map(|p| series_points(&p.series)).collect();
        let datasets: Vec<Dataset> = plotted
            .iter()
            .zip(&points)
            .map(|(p, data)| {
                Dataset::default()
                    .name(p.label.clone())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.color_for(&p.label)))
                    .data(data)
            })
            .collect();

        Chart::new(datasets)
            .block(block)
            .legend_position(None)
            .x_axis(Axis::default().bounds(x_bounds).labels(x_labels))
            .y_axis(Axis::default().bounds(y_bounds).labels(y_labels))
            .render(area, buf);
    }

    fn render_legend(&self, area: Rect, buf: &mut Buffer) {
        let inner_width = usize::from(area.width.saturating_sub(2));
        let mut seen: Vec<&str> = Vec::new();
        let items: Vec<ListItem> = self
            .legend
            .iter()
            .filter(|label| {
                if seen.contains(&label.as_str()) {
                    false
                } else {
                    seen.push(label.as_str());
                    true
                }
            })
            .map(|label| {
                let color = self.color_for(label);
                let text = util::pad_right(label, inner_width.saturating_sub(3));
                ListItem::new(Line::from(vec![
                    Span::styled("━━ ", Style::default().fg(color)),
                    Span::raw(text),
                ]))
            })
            .collect();

        List::new(items).block(Block::bordered().title("Legend")).render(area, buf);
    }

    fn write_buffer(&mut self, buf: &Buffer) -> io::Result<()> {
        let area = buf.area;
        for y in area.top()..area.bottom() {
            let mut current: Option<Color> = None;
            let mut skip = 0;
            for x in area.left()..area.right() {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let Some(cell) = buf.cell((x, y)) else {
                    continue;
                };
                let symbol = cell.symbol();
                skip = util::display_width(symbol).saturating_sub(1);
                if self.colored && current != Some(cell.fg) {
                    match to_term_color(cell.fg) {
                        Some(c) => queue!(self.out, SetForegroundColor(c))?,
                        None => queue!(self.out, ResetColor)?,
                    }
                    current = Some(cell.fg);
                }
                queue!(self.out, Print(symbol))?;
            }
            if self.colored {
                queue!(self.out, ResetColor)?;
            }
            queue!(self.out, Print("\n"))?;
        }
        Ok(())
    }
}

impl<W: Write> ChartSink for TerminalChart<W> {
    fn plot_series(&mut self, series: &Series, panel: Panel, label: &str) {
        self.panels[panel.index()].push(PlottedSeries {
            label: label.to_string(),
            series: series.clone(),
        });
    }

    fn set_legend(&mut self, labels: &[String]) {
        self.legend = labels.to_vec();
    }

    fn clear(&mut self) {
        for panel in &mut self.panels {
            panel.clear();
        }
        self.legend.clear();
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        let buf = self.render();
        self.write_buffer(&buf)?;
        self.out.flush()
    }
}

fn series_points(series: &Series) -> Vec<(f64, f64)> {
    series.iter().map(|(p, v)| (p.ordinal() as f64, v)).collect()
}

fn to_term_color(color: Color) -> Option<TermColor> {
    Some(match color {
        Color::Reset => return None,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    })
}
