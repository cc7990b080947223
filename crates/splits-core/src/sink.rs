//! Destinations for `log()` output
//!
//! The registry hands its rendered report to a [`ReportSink`]; where the text
//! ends up is the sink's business.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use tracing::{info, warn};

/// Receives rendered reports
pub trait ReportSink {
    fn emit(&mut self, report: &str);
}

/// Writes reports to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&mut self, report: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(err) = writeln!(out, "{report}") {
            warn!(error = %err, "failed to write timer report to stdout");
        }
    }
}

/// Writes reports to standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl ReportSink for StderrSink {
    fn emit(&mut self, report: &str) {
        let mut out = std::io::stderr().lock();
        if let Err(err) = writeln!(out, "{report}") {
            warn!(error = %err, "failed to write timer report to stderr");
        }
    }
}

/// Emits reports as `info` events on the `splits::report` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&mut self, report: &str) {
        info!(target: "splits::report", "{report}");
    }
}

/// Collects reports in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    reports: Rc<RefCell<Vec<String>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports emitted so far, oldest first
    pub fn reports(&self) -> Vec<String> {
        self.reports.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.reports.borrow().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }
}

impl ReportSink for BufferSink {
    fn emit(&mut self, report: &str) {
        self.reports.borrow_mut().push(report.to_string());
    }
}

/// Sink selection for configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Stdout,
    Stderr,
    Tracing,
}

impl SinkKind {
    pub fn build(self) -> Box<dyn ReportSink> {
        match self {
            SinkKind::Stdout => Box::new(StdoutSink),
            SinkKind::Stderr => Box::new(StderrSink),
            SinkKind::Tracing => Box::new(TracingSink),
        }
    }
}
