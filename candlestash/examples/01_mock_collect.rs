use std::sync::Arc;
use std::time::Duration;

use candlestash::{Collector, Interval, OutputFormat, Symbol};
use candlestash_mock::MockConnector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out = std::env::temp_dir().join("candlestash-demo");

    let collector = Collector::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .symbols([Symbol::new("BTC/USDT")?, Symbol::new("TON/USDT")?])
        .intervals([Interval::H1, Interval::D1])
        .output_dir(&out)
        .output_format(OutputFormat::Csv)
        .symbol_delay(Duration::ZERO)
        .build()?;

    let report = collector.run().await?;
    for s in &report.symbols {
        println!("{}:", s.symbol);
        for a in &s.series {
            println!("  {} -> {} bars in {}", a.interval, a.bars, a.path.display());
        }
        if let Some(p) = &s.depth {
            println!("  depth -> {}", p.display());
        }
    }
    Ok(())
}
