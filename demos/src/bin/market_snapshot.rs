//! Demo 1: Market Snapshot
//!
//! Showcases: public endpoints, server clock skew, level-1 tickers, candles
//!
//! Run: cargo run --bin market_snapshot -- BTC-USDT ETH-USDT

use colored::*;
use kucoin_rest::KucoinRestClient;
use kucoin_types::CandleInterval;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut symbols: Vec<String> = std::env::args().skip(1).collect();
    if symbols.is_empty() {
        symbols = vec!["BTC-USDT".to_string(), "ETH-USDT".to_string()];
    }

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  MARKET SNAPSHOT".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let client = KucoinRestClient::new()?;

    let server_time = client.get_server_time().await?;
    let skew = server_time - chrono::Utc::now().timestamp_millis();
    println!("{} Server clock skew: {} ms\n", "✓".green(), skew);

    println!(
        "  {:<12}  {:>14}  {:>14}  {:>14}  {:>8}",
        "SYMBOL".white().bold(),
        "BID".white().bold(),
        "ASK".white().bold(),
        "LAST".white().bold(),
        "BPS".white().bold()
    );
    println!("  {}", "─".repeat(70));

    for symbol in &symbols {
        match client.get_ticker(symbol).await {
            Ok(ticker) => {
                let bps = ticker
                    .spread_bps()
                    .map(|b| format!("{:.2}", b))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {:<12}  {:>14}  {:>14}  {:>14}  {:>8}",
                    symbol,
                    ticker.best_bid.to_string().green(),
                    ticker.best_ask.to_string().red(),
                    ticker.price,
                    bps
                );
            }
            Err(e) => println!("  {:<12}  {}", symbol, e.to_string().red()),
        }
    }
    println!();

    let symbol = &symbols[0];
    let candles = client
        .market()
        .get_candles(symbol, CandleInterval::H1, None, None)
        .await?;
    println!("{} Last hourly candles for {}:", "✓".green(), symbol.bold());
    for candle in candles.iter().take(5) {
        let time = chrono::DateTime::from_timestamp(candle.time, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let close = if candle.close >= candle.open {
            candle.close.to_string().green()
        } else {
            candle.close.to_string().red()
        };
        println!(
            "  {}  O {:>12}  H {:>12}  L {:>12}  C {:>12}",
            time, candle.open, candle.high, candle.low, close
        );
    }

    Ok(())
}
