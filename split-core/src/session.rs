//! Split session facade
//!
//! Ties the item ledger and the confirmation tracker into the
//! single-writer surface the rest of the system talks to. Exactly one
//! session is active at a time and every mutation goes through `&mut
//! self`, so ledger and confirmation state can never race: callers that
//! need concurrent access must serialize externally (a mutex or a
//! single-threaded event queue), as the exclusive borrow demands.

use crate::confirm::ConfirmationTracker;
use crate::decoder::Decoder;
use crate::ledger::ItemLedger;
use crate::types::{CartEntry, ItemId, LineItem, ParticipantId, Receipt};
use crate::{Error, Result};
use rust_decimal::Decimal;

/// Phase of a split session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No receipt loaded
    Idle,
    /// Receipt loaded, quorum not yet complete
    Open,
    /// Every required participant has confirmed
    Ready,
}

/// One bill split from scan to settlement hand-off
#[derive(Debug)]
pub struct SplitSession {
    /// Item inventory and carts
    ledger: ItemLedger,

    /// Confirmation quorum
    tracker: ConfirmationTracker,
}

impl SplitSession {
    /// Create a session requiring `required` confirmations (>= 1)
    pub fn new(required: u32) -> Result<Self> {
        Ok(Self {
            ledger: ItemLedger::new(),
            tracker: ConfirmationTracker::new(required)?,
        })
    }

    /// Load a receipt from already-structured line items
    ///
    /// Replaces any receipt in progress; all carts and confirmations
    /// reset.
    pub fn load_receipt(&mut self, items: Vec<LineItem>) -> Result<()> {
        self.ledger.load_receipt(items)?;
        self.tracker.reset();
        Ok(())
    }

    /// Decode a scanned payload and load the resulting receipt
    pub fn load_from_scan(&mut self, decoder: &dyn Decoder, raw: &str) -> Result<()> {
        let items = decoder.decode(raw)?;
        self.load_receipt(items)
    }

    /// Discard the receipt and return the session to idle
    pub fn discard(&mut self) {
        self.ledger.discard();
        self.tracker.reset();
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        if self.ledger.receipt().is_none() {
            SessionPhase::Idle
        } else if self.tracker.is_ready() {
            SessionPhase::Ready
        } else {
            SessionPhase::Open
        }
    }

    /// Claim `count` units of an item into the participant's cart
    ///
    /// Returns true if the participant's prior confirmation was dropped
    /// because the cart changed (so a UI can surface the reset).
    pub fn claim(&mut self, participant: &ParticipantId, item: ItemId, count: u32) -> Result<bool> {
        self.ledger.claim(participant, item, count)?;
        if count == 0 {
            return Ok(false);
        }
        Ok(self.tracker.invalidate(participant))
    }

    /// Return `count` units of an item from the participant's cart
    ///
    /// Same confirmation-clearing side effect as [`SplitSession::claim`].
    pub fn unclaim(
        &mut self,
        participant: &ParticipantId,
        item: ItemId,
        count: u32,
    ) -> Result<bool> {
        self.ledger.unclaim(participant, item, count)?;
        if count == 0 {
            return Ok(false);
        }
        Ok(self.tracker.invalidate(participant))
    }

    /// Record the participant's confirmation
    ///
    /// Requires the receipt to be fully allocated and the participant's
    /// cart to be non-empty.
    pub fn confirm(&mut self, participant: &ParticipantId) -> Result<SessionPhase> {
        if self.ledger.receipt().is_none() {
            return Err(Error::NoReceipt);
        }
        if !self.ledger.is_fully_allocated() {
            return Err(Error::AllocationIncomplete {
                remaining: self.ledger.remaining_total(),
            });
        }
        if self.ledger.cart_is_empty(participant) {
            return Err(Error::EmptyCart(participant.clone()));
        }

        self.tracker.confirm(participant)?;
        Ok(self.phase())
    }

    /// True iff every unit of every item has been claimed
    pub fn is_fully_allocated(&self) -> bool {
        self.ledger.is_fully_allocated()
    }

    /// True iff the quorum is complete
    pub fn is_ready(&self) -> bool {
        self.tracker.is_ready()
    }

    /// Whether the participant has confirmed
    pub fn has_confirmed(&self, participant: &ParticipantId) -> bool {
        self.tracker.has_confirmed(participant)
    }

    /// Current confirmed count
    pub fn confirmed_count(&self) -> u32 {
        self.tracker.confirmed_count()
    }

    /// Required confirmation count
    pub fn required(&self) -> u32 {
        self.tracker.required()
    }

    /// Current receipt, if any
    pub fn receipt(&self) -> Option<&Receipt> {
        self.ledger.receipt()
    }

    /// The participant's cart, joined with receipt data
    pub fn cart(&self, participant: &ParticipantId) -> Vec<CartEntry> {
        self.ledger.cart(participant)
    }

    /// The participant's cart total, rounded at currency precision
    pub fn cart_total(&self, participant: &ParticipantId) -> Decimal {
        self.ledger.cart_total(participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::FixedDecoder;
    use rust_decimal_macros::dec;

    fn loaded_session(required: u32) -> SplitSession {
        let mut session = SplitSession::new(required).unwrap();
        session
            .load_from_scan(&FixedDecoder::new(), "scan-payload")
            .unwrap();
        session
    }

    fn claim_everything(session: &mut SplitSession, participant: &ParticipantId) {
        session.claim(participant, ItemId::new(1), 1).unwrap();
        session.claim(participant, ItemId::new(2), 2).unwrap();
        session.claim(participant, ItemId::new(3), 1).unwrap();
        session.claim(participant, ItemId::new(4), 3).unwrap();
    }

    #[test]
    fn test_phase_progression() {
        let mut session = SplitSession::new(1).unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);

        session
            .load_from_scan(&FixedDecoder::new(), "payload")
            .unwrap();
        assert_eq!(session.phase(), SessionPhase::Open);

        let alice = ParticipantId::new("alice");
        claim_everything(&mut session, &alice);
        assert_eq!(session.confirm(&alice).unwrap(), SessionPhase::Ready);

        session.discard();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.receipt().is_none());
    }

    #[test]
    fn test_confirm_requires_full_allocation() {
        let mut session = loaded_session(1);
        let alice = ParticipantId::new("alice");

        session.claim(&alice, ItemId::new(1), 1).unwrap();
        let result = session.confirm(&alice);
        assert!(matches!(
            result,
            Err(Error::AllocationIncomplete { remaining: 6 })
        ));
    }

    #[test]
    fn test_confirm_requires_non_empty_cart() {
        let mut session = loaded_session(2);
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");

        claim_everything(&mut session, &alice);
        let result = session.confirm(&bob);
        assert!(matches!(result, Err(Error::EmptyCart(_))));
    }

    #[test]
    fn test_mutation_by_confirmed_participant_reverts_flag() {
        let mut session = loaded_session(2);
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");

        session.claim(&alice, ItemId::new(1), 1).unwrap();
        session.claim(&alice, ItemId::new(2), 2).unwrap();
        session.claim(&bob, ItemId::new(3), 1).unwrap();
        session.claim(&bob, ItemId::new(4), 3).unwrap();

        session.confirm(&alice).unwrap();
        session.confirm(&bob).unwrap();
        assert_eq!(session.phase(), SessionPhase::Ready);

        // Bob changes his cart: only his flag drops, and the session
        // falls back from ready to open.
        let reset = session.unclaim(&bob, ItemId::new(4), 1).unwrap();
        assert!(reset);
        assert_eq!(session.phase(), SessionPhase::Open);
        assert_eq!(session.confirmed_count(), 1);
        assert!(session.has_confirmed(&alice));
        assert!(!session.has_confirmed(&bob));
    }

    #[test]
    fn test_mutation_by_unconfirmed_participant_keeps_others() {
        let mut session = loaded_session(2);
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");

        claim_everything(&mut session, &alice);
        session.confirm(&alice).unwrap();

        // Alice unclaims one unit for Bob to take; her own flag drops,
        // nothing else changes.
        let reset = session.unclaim(&alice, ItemId::new(4), 1).unwrap();
        assert!(reset);
        assert_eq!(session.confirmed_count(), 0);

        let reset = session.claim(&bob, ItemId::new(4), 1).unwrap();
        assert!(!reset);
    }

    #[test]
    fn test_second_confirm_without_mutation_errors() {
        let mut session = loaded_session(2);
        let alice = ParticipantId::new("alice");
        let bob = ParticipantId::new("bob");

        session.claim(&alice, ItemId::new(1), 1).unwrap();
        session.claim(&alice, ItemId::new(2), 2).unwrap();
        session.claim(&bob, ItemId::new(3), 1).unwrap();
        session.claim(&bob, ItemId::new(4), 3).unwrap();

        session.confirm(&alice).unwrap();
        assert!(matches!(
            session.confirm(&alice),
            Err(Error::AlreadyConfirmed(_))
        ));
        assert_eq!(session.confirmed_count(), 1);
    }

    #[test]
    fn test_cart_total_scenario() {
        let mut session = loaded_session(1);
        let alice = ParticipantId::new("alice");

        session.claim(&alice, ItemId::new(1), 1).unwrap();
        session.claim(&alice, ItemId::new(2), 1).unwrap();
        session.claim(&alice, ItemId::new(3), 1).unwrap();

        // 8.50 + 12.50 + 9.75
        assert_eq!(session.cart_total(&alice), dec!(30.75));
    }
}
