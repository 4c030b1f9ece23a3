//! Item ledger
//!
//! Owns the canonical quantity-per-item inventory and each participant's
//! claimed subset. Claim and unclaim move whole units between the
//! receipt's unclaimed pool and a participant's cart; quantity is
//! conserved at all times.
//!
//! # Invariants
//!
//! - For every item, claimed quantity across all carts never exceeds the
//!   quantity printed on the receipt.
//! - `remaining = quantity - claimed` is always >= 0.
//! - Cart entries with quantity 0 are removed, not retained.

use crate::types::{CartEntry, ItemId, LineItem, ParticipantId, Receipt};
use crate::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Quantity-per-item inventory with per-participant carts
#[derive(Debug, Default)]
pub struct ItemLedger {
    /// Current receipt, if a split is in progress
    receipt: Option<Receipt>,

    /// Claimed quantities per participant, keyed by item id
    carts: HashMap<ParticipantId, BTreeMap<ItemId, u32>>,
}

impl ItemLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current receipt with the given ordered line items
    ///
    /// All claimed quantities reset to 0 and every cart is emptied. An
    /// empty item list is legal (it yields no actionable split); any
    /// non-empty receipt must have unique ids, non-negative prices, and
    /// positive quantities.
    pub fn load_receipt(&mut self, items: Vec<LineItem>) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.unit_price < Decimal::ZERO {
                return Err(Error::InvalidReceipt(format!(
                    "item {} has negative price {}",
                    item.id, item.unit_price
                )));
            }
            if item.quantity == 0 {
                return Err(Error::InvalidReceipt(format!(
                    "item {} has zero quantity",
                    item.id
                )));
            }
            if !seen.insert(item.id) {
                return Err(Error::InvalidReceipt(format!("duplicate item id {}", item.id)));
            }
        }

        let mut items = items;
        for item in &mut items {
            item.claimed = 0;
        }

        tracing::info!(items = items.len(), "receipt loaded");
        self.receipt = Some(Receipt::new(items));
        self.carts.clear();
        Ok(())
    }

    /// Discard the current receipt and all carts
    pub fn discard(&mut self) {
        if self.receipt.take().is_some() {
            tracing::info!("receipt discarded");
        }
        self.carts.clear();
    }

    /// Current receipt, if any
    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Move `count` units of an item from the unclaimed pool into the
    /// participant's cart
    ///
    /// A zero count is a no-op. Claiming more than the remaining quantity
    /// is rejected, never clamped.
    pub fn claim(&mut self, participant: &ParticipantId, item: ItemId, count: u32) -> Result<()> {
        let receipt = self.receipt.as_mut().ok_or(Error::NoReceipt)?;
        let line = receipt.item_mut(item).ok_or(Error::ItemNotFound(item))?;

        if count == 0 {
            return Ok(());
        }

        let remaining = line.remaining();
        if count > remaining {
            return Err(Error::InsufficientQuantity {
                item,
                requested: count,
                remaining,
            });
        }

        line.claimed += count;
        *self
            .carts
            .entry(participant.clone())
            .or_default()
            .entry(item)
            .or_insert(0) += count;

        tracing::debug!(%participant, %item, count, "claimed");
        Ok(())
    }

    /// Move `count` units of an item from the participant's cart back to
    /// the unclaimed pool
    ///
    /// A zero count is a no-op. Returning more than the cart holds is
    /// rejected.
    pub fn unclaim(&mut self, participant: &ParticipantId, item: ItemId, count: u32) -> Result<()> {
        let receipt = self.receipt.as_mut().ok_or(Error::NoReceipt)?;
        let line = receipt.item_mut(item).ok_or(Error::ItemNotFound(item))?;

        if count == 0 {
            return Ok(());
        }

        let held = self
            .carts
            .get(participant)
            .and_then(|cart| cart.get(&item))
            .copied()
            .unwrap_or(0);
        if count > held {
            return Err(Error::NothingToUnclaim {
                item,
                requested: count,
                held,
            });
        }

        line.claimed -= count;

        let cart = self
            .carts
            .get_mut(participant)
            .expect("held > 0 implies cart exists");
        if held == count {
            cart.remove(&item);
            if cart.is_empty() {
                self.carts.remove(participant);
            }
        } else {
            cart.insert(item, held - count);
        }

        tracing::debug!(%participant, %item, count, "unclaimed");
        Ok(())
    }

    /// True iff every unit of every item has been claimed
    ///
    /// This is the gating condition for confirmation. Returns false while
    /// no receipt is loaded.
    pub fn is_fully_allocated(&self) -> bool {
        match &self.receipt {
            Some(receipt) => receipt.remaining_total() == 0,
            None => false,
        }
    }

    /// Sum of unclaimed quantities across all items
    pub fn remaining_total(&self) -> u32 {
        self.receipt
            .as_ref()
            .map(|r| r.remaining_total())
            .unwrap_or(0)
    }

    /// The participant's cart, joined with receipt item data
    pub fn cart(&self, participant: &ParticipantId) -> Vec<CartEntry> {
        let Some(receipt) = &self.receipt else {
            return Vec::new();
        };
        let Some(cart) = self.carts.get(participant) else {
            return Vec::new();
        };

        cart.iter()
            .filter_map(|(&item, &quantity)| {
                receipt.item(item).map(|line| CartEntry {
                    item,
                    name: line.name.clone(),
                    unit_price: line.unit_price,
                    quantity,
                })
            })
            .collect()
    }

    /// True iff the participant's cart holds no items
    pub fn cart_is_empty(&self, participant: &ParticipantId) -> bool {
        self.carts
            .get(participant)
            .map(|cart| cart.is_empty())
            .unwrap_or(true)
    }

    /// Sum of unit price times claimed quantity over the participant's
    /// cart, rounded half-up at the smallest currency unit
    pub fn cart_total(&self, participant: &ParticipantId) -> Decimal {
        let total: Decimal = self
            .cart(participant)
            .iter()
            .map(|entry| entry.line_total())
            .sum();
        total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Total units of an item claimed across all carts
    ///
    /// Always equals the item's own claimed counter; exposed so callers
    /// and tests can check conservation from the outside.
    pub fn claimed_across_carts(&self, item: ItemId) -> u32 {
        self.carts
            .values()
            .filter_map(|cart| cart.get(&item))
            .sum()
    }
}
