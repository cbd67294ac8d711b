use std::collections::BTreeMap;

use crate::Bar;

/// Merge paged bars into one clean series.
///
/// Pages are consumed in the order given. When two bars share a timestamp the
/// one seen last replaces the earlier one, so a later page corrects an earlier
/// page's still-forming candle. The result is strictly ascending by timestamp.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "candlestash::core::normalize_bars", level = "debug", skip(pages))
)]
pub fn normalize_bars<I>(pages: I) -> Vec<Bar>
where
    I: IntoIterator<Item = Vec<Bar>>,
{
    let mut map: BTreeMap<i64, Bar> = BTreeMap::new();
    for page in pages {
        for bar in page {
            map.insert(bar.timestamp, bar);
        }
    }
    map.into_values().collect()
}

/// Whether `bars` is strictly ascending by timestamp (which implies unique timestamps).
#[must_use]
pub fn is_normalized(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
}
