//! Network side of a collection run: paged OHLCV downloads and depth snapshots.

pub mod backoff;
mod depth;
mod ohlcv;

pub use depth::{DepthFetch, fetch_depth};
pub use ohlcv::{FetchOptions, PagedFetch, fetch_series};
