mod anchor;
mod calendar;
mod config;
mod error;
mod expiry;
mod holidays;
mod logging;
mod nse_client;

use std::path::Path;

use anyhow::Result;
use calendar::TradingCalendar;
use colored::Colorize;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    println!("{}", "=".repeat(60).blue());
    println!("{}", "NSE Trading Calendar".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    let now = anchor::now_ist();
    let today = now.date_naive();

    // Step 1: Holiday snapshot (yearly cache, NSE on a miss)
    println!("{}", "Step 1: Loading holiday snapshot...".cyan());
    let client = nse_client::NSEClient::new()?;
    let holidays = nse_client::current_holiday_set(
        &client,
        Path::new(config::HOLIDAY_CACHE_FILE),
        today,
    )
    .await?;
    println!(
        "{} {} holidays on record for {}",
        "✓".green(),
        holidays.len(),
        today.format("%Y")
    );
    println!();

    let cal = TradingCalendar::new(holidays);

    // Step 2: Resolve the session anchor
    println!("{}", "Step 2: Resolving trading anchor...".cyan());
    let anchor_date = cal.resolve_anchor(now, None)?;
    println!(
        "{} Effective trading date: {}",
        "✓".green(),
        anchor_date.format(config::DATE_FMT).to_string().yellow()
    );
    println!(
        "  {} next: {}   previous: {}",
        "ℹ".blue(),
        cal.next_trading_day(anchor_date).format(config::DATE_FMT),
        cal.previous_trading_day(anchor_date).format(config::DATE_FMT),
    );
    println!();

    // Step 3: Upcoming expiries per index
    println!("{}", "Step 3: Upcoming weekly expiries...".cyan());
    let weekly_anchor = cal.next_trading_day(anchor_date);
    for &symbol in config::NSE_INDICES {
        let expiries: Vec<String> = cal
            .weekly_expiries(symbol, weekly_anchor)?
            .take(4)
            .map(|d| d.format(config::DATE_FMT).to_string())
            .collect();
        println!("  {} {:<10} {}", "✓".green(), symbol.yellow(), expiries.join(", "));
    }
    println!();

    println!("{}", "Step 4: Upcoming monthly expiries...".cyan());
    let monthly: Vec<String> = cal
        .monthly_expiries(anchor_date)
        .take(3)
        .map(|d| d.format(config::DATE_FMT).to_string())
        .collect();
    println!("  {} {}", "✓".green(), monthly.join(", "));
    println!();

    // Step 5: Derived counts
    println!("{}", "Step 5: Trading-day counts...".cyan());
    println!(
        "  {} Days until NIFTY expiry: {}",
        "✓".green(),
        cal.trading_days_until_expiry("NIFTY", anchor_date)?
    );
    println!(
        "  {} Trading days left this year: {}",
        "✓".green(),
        cal.trading_days_until_year_end(anchor_date)
    );
    println!(
        "  {} Working days next month: {}",
        "✓".green(),
        cal.working_days_in_month(anchor_date)
    );

    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Done!".green().bold());
    println!("{}", "=".repeat(60).blue());

    Ok(())
}
