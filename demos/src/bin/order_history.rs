//! Demo 3: Order History
//!
//! Showcases: streaming pagination with per-page retry, fill aggregation
//!
//! Run: cargo run --bin order_history -- BTC-USDT

use colored::*;
use futures::StreamExt;
use kucoin_rest::{
    Credentials, FillFilter, KucoinRestClient, OrderFilter, PageState, PaginationConfig,
    RetryPolicy,
};
use kucoin_types::Side;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "BTC-USDT".to_string());

    println!("{}", "═".repeat(65).cyan());
    println!("{}", format!("  ORDER HISTORY: {}", symbol).cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let client = KucoinRestClient::with_credentials(Credentials::from_env()?)?;
    let trading = client.trading()?;

    let config = PaginationConfig::new()
        .with_page_size(100)
        .with_max_pages(5)
        .with_retry(RetryPolicy::fixed(2, Duration::from_millis(500)));

    // Stream completed orders page by page
    let mut pages = Box::pin(
        trading
            .orders(OrderFilter::done().symbol(symbol.as_str()), config)
            .into_stream(),
    );
    let mut order_count = 0usize;
    while let Some(page) = pages.next().await {
        let page = page?;
        println!(
            "{} Page {}/{} ({} orders)",
            "✓".green(),
            page.current_page,
            page.total_page,
            page.items.len()
        );
        for order in &page.items {
            order_count += 1;
            let side = match order.side {
                Side::Buy => "BUY ".green(),
                Side::Sell => "SELL".red(),
            };
            println!(
                "  {}  {:<6}  {:>14} @ {:<14}  filled {}",
                side,
                order.order_type,
                order.size,
                order.price,
                order.deal_size
            );
        }
    }
    println!("\n{} {} orders listed", "✓".green(), order_count);

    let fills = trading
        .fills(FillFilter::new().symbol(symbol.as_str()), config)
        .collect()
        .await;
    let has_more = fills.state == PageState::HasMore;
    let error = fills.error.as_ref().map(|e| e.to_string());
    let fills = fills.items();

    let (bought, sold) = fills.iter().fold((Decimal::ZERO, Decimal::ZERO), |(b, s), f| match f.side {
        Side::Buy => (b + f.size, s),
        Side::Sell => (b, s + f.size),
    });
    let fees: Decimal = fills.iter().map(|f| f.fee).sum();

    println!("\n{} {} fills", "✓".green(), fills.len());
    println!("  Bought: {}", bought.to_string().green());
    println!("  Sold:   {}", sold.to_string().red());
    println!("  Fees:   {}", fees);
    if has_more {
        println!("  {}", "(more fills exist beyond the page limit)".yellow());
    }
    if let Some(e) = error {
        println!("  {}", e.red());
    }

    Ok(())
}
