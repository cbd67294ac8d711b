pub mod depth;
pub mod ohlcv;
