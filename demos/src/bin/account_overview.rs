//! Demo 2: Account Overview
//!
//! Showcases: credentials from the environment, signed requests, sub-accounts,
//! paginated ledgers, typed API error handling
//!
//! Run: KUCOIN_API_KEY=... KUCOIN_API_SECRET=... KUCOIN_API_PASSPHRASE=... \
//!      cargo run --bin account_overview

use colored::*;
use kucoin_rest::{Credentials, KucoinRestClient, LedgerFilter, PaginationConfig, RestError};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  ACCOUNT OVERVIEW".cyan().bold());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let creds = Credentials::from_env()?;
    println!(
        "{} Using key {} (version {}) against {}",
        "✓".green(),
        creds.api_key(),
        creds.key_version(),
        creds.base_url()
    );
    let client = KucoinRestClient::with_credentials(creds)?;

    let accounts = match client.get_accounts().await {
        Ok(accounts) => accounts,
        Err(RestError::Api { error, .. }) if error.requires_reauth() => {
            println!("{} {}", "✗".red(), error);
            println!("  Check the API key, secret, passphrase and the local clock.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "\n  {:<10}  {:<10}  {:>18}  {:>18}",
        "CURRENCY".white().bold(),
        "TYPE".white().bold(),
        "AVAILABLE".white().bold(),
        "HOLDS".white().bold()
    );
    println!("  {}", "─".repeat(62));
    for account in accounts.iter().filter(|a| a.balance > Decimal::ZERO) {
        println!(
            "  {:<10}  {:<10}  {:>18}  {:>18}",
            account.currency,
            account.account_type,
            account.available.to_string().green(),
            account.holds.to_string().yellow()
        );
    }

    match client.sub_accounts()?.list_balances().await {
        Ok(subs) => {
            println!("\n{} {} sub-accounts", "✓".green(), subs.len());
            for sub in &subs {
                let funded = sub.entries().filter(|e| e.balance > Decimal::ZERO).count();
                println!("  {:<24} {} funded currencies", sub.sub_name, funded);
            }
        }
        // Sub-account access needs a master key
        Err(e) => println!("\n{} Sub-accounts unavailable: {}", "!".yellow(), e),
    }

    let recent = client
        .account()?
        .ledgers(LedgerFilter::new(), PaginationConfig::new().with_max_pages(1))
        .collect()
        .await;
    println!("\n{} Latest ledger entries:", "✓".green());
    if let Some(e) = &recent.error {
        println!("  {}", e.to_string().red());
    }
    for entry in recent.items().iter().take(10) {
        let when = chrono::DateTime::from_timestamp_millis(entry.created_at)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let amount = if entry.direction == "in" {
            format!("+{}", entry.amount).green()
        } else {
            format!("-{}", entry.amount).red()
        };
        println!("  {}  {:<6} {:>18}  {}", when, entry.currency, amount, entry.biz_type);
    }

    Ok(())
}
