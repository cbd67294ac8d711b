//! Report envelopes produced by the collector.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Interval, StashError, Symbol};

/// One series file written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesArtifact {
    /// Interval of the written series.
    pub interval: Interval,
    /// Number of bars written.
    pub bars: usize,
    /// Final path of the file.
    pub path: PathBuf,
}

/// Outcome of collecting one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolReport {
    /// Symbol processed.
    pub symbol: Symbol,
    /// Series artifacts written, in interval order.
    pub series: Vec<SeriesArtifact>,
    /// Depth artifact, if a snapshot was fetched and written.
    pub depth: Option<PathBuf>,
    /// Non-fatal issues encountered for this symbol.
    pub warnings: Vec<StashError>,
}

impl SymbolReport {
    /// Start an empty report for `symbol`.
    #[must_use]
    pub const fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            series: Vec::new(),
            depth: None,
            warnings: Vec::new(),
        }
    }
}

/// Summary of a completed collection run.
///
/// A run that returns a report finished every symbol; fatal problems are
/// returned as errors instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunReport {
    /// Per-symbol outcomes in processing order.
    pub symbols: Vec<SymbolReport>,
    /// Total number of series artifacts written.
    pub series_written: usize,
    /// Total number of depth artifacts written.
    pub depth_written: usize,
    /// Run-level warnings (e.g. depth unsupported by the exchange).
    pub warnings: Vec<StashError>,
}

impl RunReport {
    /// Fold a finished symbol into the totals.
    pub fn push(&mut self, symbol: SymbolReport) {
        self.series_written += symbol.series.len();
        self.depth_written += usize::from(symbol.depth.is_some());
        self.symbols.push(symbol);
    }

    /// Every warning, run-level first then per symbol.
    pub fn all_warnings(&self) -> impl Iterator<Item = &StashError> + '_ {
        self.warnings
            .iter()
            .chain(self.symbols.iter().flat_map(|s| s.warnings.iter()))
    }
}
