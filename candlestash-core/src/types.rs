//! Re-export of foundational types from `candlestash-types`.
// Consolidated so connectors and the collector can depend on `candlestash-core` only

pub use candlestash_types::{
    BackoffConfig, Bar, Capabilities, Capability, CollectorConfig, ConnectorKey, Decimal,
    DepthSnapshot, Interval, Level, OutputFormat, RunReport, Series, SeriesArtifact, StashError,
    Symbol, SymbolReport,
};
