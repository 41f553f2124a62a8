//! Trading venue simulation.
//!
//! Registers a few traders and an operator, runs a scripted session (spot buys,
//! a leveraged futures open, a deposit, operator news) and then lets the price
//! and news timers run until ctrl-c or `VENUE_DEMO_SECS` elapses.

use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use venue_core::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "venue_core=info,venue_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VenueConfig::from_env()?;
    let run_for = std::env::var("VENUE_DEMO_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(5);

    let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let venue = Venue::new(config, store)?;
    info!(
        spot_ms = venue.config().durations.spot_position_ms,
        futures_ms = venue.config().durations.futures_position_ms,
        "venue up"
    );

    let admin = venue.register("operator", Role::Admin).await?;
    let alice = venue.register("alice", Role::User).await?;
    let bob = venue.register("bob", Role::User).await?;
    let operator = Actor::admin(admin.id);

    scripted_session(&venue, operator, Actor::user(alice.id), Actor::user(bob.id)).await?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let timers = venue.spawn_timers(stop_rx);

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(run_for)) => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                warn!(%err, "ctrl-c handler failed");
            }
        }
    }

    stop_tx.send(true)?;
    for handle in timers {
        handle.await?;
    }

    print_leaderboard(&venue).await?;
    for headline in venue.news_feed(5).await {
        println!("  [{:?}] {} ({})", headline.sentiment, headline.title, headline.target.symbol());
    }
    info!("venue shut down");
    Ok(())
}

async fn scripted_session(venue: &Venue, operator: Actor, alice: Actor, bob: Actor) -> anyhow::Result<()> {
    let nvda = Symbol::new("NVDA");
    let tsla = Symbol::new("TSLA");

    let quotes = venue.quotes().await;
    let nvda_px = quote_for(&quotes, &nvda)?;
    let tsla_px = quote_for(&quotes, &tsla)?;

    let fill = venue
        .place_spot_order(
            alice,
            SpotOrder {
                symbol: nvda.clone(),
                shares: dec!(10),
                price: nvda_px,
                action: TradeAction::Buy,
                direction: Direction::Long,
            },
        )
        .await?;
    println!("alice bought {} {} @ {}, cash {}", fill.shares, fill.symbol, fill.price, fill.cash_balance);

    let order = venue
        .open_futures(
            bob,
            FuturesTicket {
                symbol: tsla.clone(),
                shares: dec!(20),
                price: tsla_px,
                leverage: 5,
                direction: Direction::Short,
            },
        )
        .await?;
    println!(
        "bob opened {} {} {} @ {} ({}), margin {}",
        order.direction,
        order.shares,
        order.symbol,
        order.entry_price,
        order.leverage,
        order.reserved_margin(venue.config().futures.contract_multiplier)
    );

    let deposit = venue.open_deposit(bob, dec!(5000)).await?;
    println!("bob deposited {} at {} until {}", deposit.amount, deposit.interest_rate, deposit.due_at);

    // rejected: impact above the cap
    let oversized = HeadlineInput {
        title: "Tesla unveils robotaxi fleet".into(),
        summary: "Fleet rollout across three cities.".into(),
        symbol: tsla.clone(),
        sentiment: Sentiment::Bullish,
        impact: dec!(40),
        rate_impact: dec!(0),
        source: None,
        age_label: None,
    };
    if let Err(err) = venue.submit_news(operator, oversized.clone()).await {
        println!("operator news rejected: {err}");
    }
    let headline = venue
        .submit_news(operator, HeadlineInput { impact: dec!(12), ..oversized })
        .await?;
    println!("operator news published: {} ({}%)", headline.title, headline.impact);

    let state = venue.set_interest_rate(operator, dec!(0.05)).await?;
    println!("benchmark rate now {}", state.interest_rate);

    let view = venue.portfolio(bob).await?;
    println!("bob total value {} (cash {})", view.total_value, view.metrics.cash_balance);

    let cash = venue.adjust_cash(operator, alice.user_id, CashAdjustment::Delta(dec!(250))).await?;
    println!("operator topped alice up to {cash}");
    for row in venue.admin_users(operator).await? {
        println!(
            "  #{} {:<8} {:?} cash {} deposit {} holdings {}",
            row.user_id,
            row.name,
            row.role,
            row.cash_balance,
            row.deposit_amount,
            row.holdings.len()
        );
    }
    Ok(())
}

fn quote_for(quotes: &[PriceQuote], symbol: &Symbol) -> anyhow::Result<rust_decimal::Decimal> {
    quotes
        .iter()
        .find(|q| &q.symbol == symbol)
        .map(|q| q.price.value())
        .ok_or_else(|| anyhow::anyhow!("no quote for {symbol}"))
}

async fn print_leaderboard(venue: &Venue) -> anyhow::Result<()> {
    println!("\nleaderboard:");
    for entry in venue.leaderboard().await? {
        println!(
            "  {:>2}. {:<8} total {:>12}  cash {:>12}  holdings {:>10}  deposit {:>10}  futures {:>10}",
            entry.rank, entry.name, entry.total_value, entry.cash, entry.holdings_value, entry.deposit, entry.futures_pnl
        );
    }
    Ok(())
}
