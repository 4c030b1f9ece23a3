//! Bill split coordinator core
//!
//! Tracks an itemized restaurant receipt, per-participant item claims,
//! and the confirmation quorum that gates settlement of the group's
//! portion as a single on-chain payment.
//!
//! # Architecture
//!
//! - **Receipt Parser / Decoder**: raw scan payload → ordered line items
//! - **Item Ledger**: quantity conservation between the unclaimed pool
//!   and participant carts
//! - **Confirmation Tracker**: quorum of distinct confirmations,
//!   invalidated by cart mutations
//! - **Rate Converter**: pure fiat → crypto arithmetic, rounds down
//! - **Payment History**: append-only, most-recent-first records
//! - **Loyalty Tiers**: pure token-count → discount step function
//!
//! # Invariants
//!
//! - Quantity conservation: per item, claims across carts never exceed
//!   the receipt quantity
//! - Confirmation honesty: confirmed count always equals the number of
//!   set flags; any cart mutation clears the actor's flag
//! - Conversion never rounds up: a settlement cannot overcharge

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod confirm;
pub mod decoder;
pub mod error;
pub mod history;
pub mod ledger;
pub mod loyalty;
pub mod parser;
pub mod rates;
pub mod session;
pub mod types;

// Re-exports
pub use confirm::ConfirmationTracker;
pub use decoder::{Decoder, FixedDecoder, TextDecoder};
pub use error::{Error, Result};
pub use history::PaymentHistory;
pub use ledger::ItemLedger;
pub use session::{SessionPhase, SplitSession};
pub use types::{
    CartEntry, Currency, ItemId, LineItem, ParticipantId, Receipt, SettlementRecord,
    SettlementStatus, TxReference,
};
