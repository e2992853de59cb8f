//! `rentratio` interactive explorer.
//!
//! The binary is thin: it loads configuration, runs [`pipeline::load_dataset`]
//! once and hands the result to a [`session::SessionController`] drawing into
//! a [`chart::TerminalChart`].

pub mod chart;
pub mod command;
pub mod pipeline;
pub mod session;

pub(crate) mod util;

pub use chart::{ChartSink, Panel, RecordingChart, TerminalChart};
pub use command::Command;
pub use pipeline::load_dataset;
pub use session::{DispatchReport, SessionController, SessionExit, SessionState, Step, PROMPT};
