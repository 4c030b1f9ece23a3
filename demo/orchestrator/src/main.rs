// Demo orchestrator - walks one table's bill from scan to settled payment
// against in-memory collaborators (signer, network, rate source).

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use rust_decimal_macros::dec;
use settlement::{Config, FixedRateSource, InMemorySigner, MockNetwork, SettlementEngine};
use split_core::loyalty::{self, StaticBalanceSource, TokenBalanceSource};
use split_core::types::{Currency, ItemId, SettlementRecord, SettlementStatus, TxReference};
use split_core::{FixedDecoder, ParticipantId, PaymentHistory, SplitSession};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

fn past_payment(restaurant: &str, amount: rust_decimal::Decimal, tx: &str) -> SettlementRecord {
    SettlementRecord {
        record_id: Uuid::new_v4(),
        settled_at: Utc::now(),
        restaurant: restaurant.to_string(),
        fiat_amount: amount,
        currency: Currency::USD,
        participants: 1,
        status: SettlementStatus::Completed,
        tx_reference: Some(TxReference::new(tx)),
    }
}

fn seed_history(history: &mut PaymentHistory) {
    // Oldest first, so the newest demo payment ends up at the head.
    history.append(past_payment(
        "Blockchain Bistro",
        dec!(67.50),
        "9JmN4zXqLpS7vBtHgK2rDyWmP1Zx8p",
    ));
    history.append(past_payment(
        "Web3 Diner",
        dec!(42.20),
        "2KpL8nQxRfP9BzTw5H3mVJyDcL7Rt3v",
    ));
    history.append(past_payment(
        "Crypto Cafe",
        dec!(35.75),
        "5UxV7KpDLM8HG6vJ2CwbWCsR4QvMFY3Qe9h",
    ));
}

fn print_receipt(session: &SplitSession) {
    let receipt = session.receipt().expect("receipt loaded");
    println!("  {:<3} {:<20} {:>8} {:>8}", "QTY", "ITEM", "UNIT", "PRICE");
    for item in receipt.items() {
        println!(
            "  {:<3} {:<20} {:>8} {:>8}",
            item.quantity,
            item.name,
            format!("${}", item.unit_price),
            format!("${}", item.line_total()),
        );
    }
    println!("  {:<24} {:>16}", "TOTAL", format!("${}", receipt.grand_total()));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("\n{}", "SplitRail - bill split settlement demo".bold());
    println!("{}\n", "=======================================".dimmed());

    let mut engine = SettlementEngine::new(
        Config::default(),
        Arc::new(InMemorySigner::with_delay(Duration::from_millis(400))),
        Arc::new(MockNetwork::new().with_finality_delay(Duration::from_millis(600))),
        Arc::new(FixedRateSource::default()),
    );
    seed_history(&mut engine.history().write());

    println!("{}", "Past payments".cyan());
    for record in engine.recent_history() {
        let tx = record
            .tx_reference
            .as_ref()
            .map(|tx| tx.short())
            .unwrap_or_default();
        println!(
            "  {:<20} ${:>7}  {}  tx {}",
            record.restaurant, record.fiat_amount, record.status, tx
        );
    }

    // Loyalty standing before dinner.
    let wallet = "demo-wallet";
    let balance_source = StaticBalanceSource::new(18);
    let tokens = balance_source.token_balance(wallet)?;
    println!(
        "\n{} {} tokens, {}% discount, {} to the next tier",
        "Loyalty:".cyan(),
        tokens,
        loyalty::discount_percent(tokens),
        loyalty::next_tier_gap(tokens),
    );

    // Scan the table's receipt.
    println!("\n{}", "Scanning receipt...".cyan());
    sleep(Duration::from_millis(300)).await;
    let mut session = SplitSession::new(1)?;
    session.load_from_scan(&FixedDecoder::new(), "demo-qr-payload")?;
    print_receipt(&session);

    // One diner takes the whole bill.
    let diner = ParticipantId::new(wallet);
    println!("\n{}", "Claiming items...".cyan());
    for item in [1u32, 2, 3, 4] {
        let id = ItemId::new(item);
        let quantity = session
            .receipt()
            .expect("receipt loaded")
            .item(id)
            .expect("demo item")
            .remaining();
        session.claim(&diner, id, quantity)?;
        sleep(Duration::from_millis(150)).await;
    }
    println!(
        "  plate total ${} ({} of {} units claimed)",
        session.cart_total(&diner),
        session.cart(&diner).iter().map(|e| e.quantity).sum::<u32>(),
        7,
    );

    println!("\n{}", "Confirming split...".cyan());
    session.confirm(&diner)?;
    println!(
        "  {} of {} confirmed, session ready",
        session.confirmed_count(),
        session.required()
    );

    println!("\n{}", "Settling on-chain...".cyan());
    let outcome = engine.settle(&mut session, &diner).await?;
    let record = &outcome.record;
    println!(
        "  {} ${} at {}",
        "settled".green().bold(),
        record.fiat_amount,
        record.restaurant
    );
    if let Some(tx) = &record.tx_reference {
        println!("  tx {}", tx.short());
    }
    println!("\n{}", serde_json::to_string_pretty(record)?);

    println!(
        "\n{} earned {} token(s); {} tokens would leave {} to the next tier",
        "Reward:".cyan(),
        outcome.reward.tokens,
        tokens + outcome.reward.tokens,
        loyalty::next_tier_gap(tokens + outcome.reward.tokens),
    );

    println!("\n{}", "Payment history now".cyan());
    for record in engine.recent_history() {
        println!("  {:<20} ${:>7}  {}", record.restaurant, record.fiat_amount, record.status);
    }
    println!();

    Ok(())
}
