//! Candlestash-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod bar;
mod capability;
mod config;
mod connector;
mod depth;
mod error;
mod interval;
mod reports;
mod symbol;

pub use bar::{Bar, Series};
pub use capability::{Capabilities, Capability};
pub use config::{BackoffConfig, CollectorConfig, OutputFormat};
pub use connector::ConnectorKey;
pub use depth::{DepthSnapshot, Level};
pub use error::StashError;
pub use interval::Interval;
pub use reports::{RunReport, SeriesArtifact, SymbolReport};
pub use symbol::Symbol;

/// Re-exported so downstream crates agree on the numeric type of prices and volumes.
pub use rust_decimal::Decimal;
