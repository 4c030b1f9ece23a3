//! Core types for the bill split coordinator
//!
//! All amounts are exact decimals; quantities are whole units that move
//! between the receipt's unclaimed pool and participant carts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Participant identifier (wallet address, device id, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Line item identifier, unique within a single receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u32);

impl ItemId {
    /// Create new item ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// ISO 4217 currency code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }

    /// Smallest-unit precision (decimal places)
    pub fn precision(&self) -> u32 {
        2
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One line of an itemized receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Identifier, unique within the receipt
    pub id: ItemId,

    /// Item name as printed on the receipt
    pub name: String,

    /// Unit price (non-negative, currency precision)
    pub unit_price: Decimal,

    /// Total quantity printed on the receipt
    pub quantity: u32,

    /// Quantity claimed across all participant carts
    pub claimed: u32,
}

impl LineItem {
    /// Create a fresh, unclaimed line item
    pub fn new(id: ItemId, name: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            quantity,
            claimed: 0,
        }
    }

    /// Quantity still in the unclaimed pool
    pub fn remaining(&self) -> u32 {
        self.quantity - self.claimed
    }

    /// Unit price times total quantity
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// An itemized receipt, created once per scan
///
/// Items are ordered as printed. Quantities only move via the item
/// ledger's claim/unclaim operations; the receipt is discarded when the
/// flow returns to idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Ordered line items
    items: Vec<LineItem>,

    /// Scan timestamp
    pub scanned_at: DateTime<Utc>,
}

impl Receipt {
    /// Create a receipt from ordered line items
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            items,
            scanned_at: Utc::now(),
        }
    }

    /// Ordered line items
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up a line item by id
    pub fn item(&self, id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Sum of unclaimed quantities across all items
    pub fn remaining_total(&self) -> u32 {
        self.items.iter().map(|i| i.remaining()).sum()
    }

    /// Grand total of the receipt (unit price times quantity, all items)
    pub fn grand_total(&self) -> Decimal {
        self.items.iter().map(|i| i.line_total()).sum()
    }
}

/// One entry of a participant's cart, joined with receipt data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEntry {
    /// Item id
    pub item: ItemId,

    /// Item name
    pub name: String,

    /// Unit price
    pub unit_price: Decimal,

    /// Quantity held by the participant
    pub quantity: u32,
}

impl CartEntry {
    /// Unit price times held quantity
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Terminal status of a settlement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettlementStatus {
    /// Transfer finalized on the network
    Completed = 1,
    /// Attempt failed after leaving the orchestrator
    Failed = 2,
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementStatus::Completed => write!(f, "completed"),
            SettlementStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Opaque network transaction reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxReference(String);

impl TxReference {
    /// Create from the network's reference string
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated display form: first five and last five characters
    pub fn short(&self) -> String {
        if self.0.len() <= 10 {
            return self.0.clone();
        }
        format!("{}...{}", &self.0[..5], &self.0[self.0.len() - 5..])
    }
}

impl fmt::Display for TxReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable record of a completed settlement attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Record ID
    pub record_id: Uuid,

    /// Settlement timestamp
    pub settled_at: DateTime<Utc>,

    /// Counterparty / restaurant label
    pub restaurant: String,

    /// Fiat amount settled
    pub fiat_amount: Decimal,

    /// Currency of the fiat amount
    pub currency: Currency,

    /// Number of participants in the split
    pub participants: u32,

    /// Terminal status
    pub status: SettlementStatus,

    /// Transaction reference, present only if broadcast occurred
    pub tx_reference: Option<TxReference>,
}
