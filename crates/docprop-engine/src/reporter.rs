//! Run reporting
//!
//! Traversal, propagation and impact reporting talk to a [`Reporter`]
//! handed in by the caller instead of a process-wide logger. One reporter
//! lives for exactly one propagation run.

use docprop_core::ColumnIdentity;

/// Receives what happens during a propagation run
pub trait Reporter {
    /// A column was linked to a same-named column in an upstream node
    fn matched(&mut self, _column: &ColumnIdentity, _upstream: &ColumnIdentity) {}

    /// An undocumented column with documented ancestors is on the ignore-list
    fn ignored(&mut self, _column: &ColumnIdentity) {}

    /// A synthesized description is about to be written
    fn propagated(&mut self, _column: &ColumnIdentity, _sources: &[String]) {}

    /// One line of the textual impact report
    fn report_line(&mut self, line: &str);
}

/// Forwards everything to `tracing`
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn matched(&mut self, column: &ColumnIdentity, upstream: &ColumnIdentity) {
        tracing::trace!(%column, %upstream, "upstream match");
    }

    fn ignored(&mut self, column: &ColumnIdentity) {
        tracing::info!(%column, "ignoring column");
    }

    fn propagated(&mut self, column: &ColumnIdentity, sources: &[String]) {
        tracing::info!(%column, candidates = sources.len(), ?sources, "propagating documentation");
    }

    fn report_line(&mut self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// A recorded reporter event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Matched { column: ColumnIdentity, upstream: ColumnIdentity },
    Ignored(ColumnIdentity),
    Propagated { column: ColumnIdentity, sources: Vec<String> },
    Line(String),
}

/// Keeps every event in memory, in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report lines only
    pub fn lines(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Line(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Columns that were skipped because of the ignore-list
    pub fn ignored_columns(&self) -> Vec<&ColumnIdentity> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Ignored(column) => Some(column),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn matched(&mut self, column: &ColumnIdentity, upstream: &ColumnIdentity) {
        self.events.push(ReportEvent::Matched {
            column: column.clone(),
            upstream: upstream.clone(),
        });
    }

    fn ignored(&mut self, column: &ColumnIdentity) {
        self.events.push(ReportEvent::Ignored(column.clone()));
    }

    fn propagated(&mut self, column: &ColumnIdentity, sources: &[String]) {
        self.events.push(ReportEvent::Propagated {
            column: column.clone(),
            sources: sources.to_vec(),
        });
    }

    fn report_line(&mut self, line: &str) {
        self.events.push(ReportEvent::Line(line.to_string()));
    }
}
