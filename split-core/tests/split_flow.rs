//! End-to-end split flow tests
//!
//! Walks the demo receipt through partial and full allocation the way a
//! table of diners would.

use rust_decimal_macros::dec;
use split_core::types::{ItemId, ParticipantId};
use split_core::{Error, FixedDecoder, SessionPhase, SplitSession};

#[test]
fn test_partial_allocation_leaves_remaining_units() {
    let mut session = SplitSession::new(1).unwrap();
    session
        .load_from_scan(&FixedDecoder::new(), "qr-payload")
        .unwrap();

    let alice = ParticipantId::new("alice");

    // All of GLASS STAR, one of two NOODLES, all of FRIED RICE.
    session.claim(&alice, ItemId::new(1), 1).unwrap();
    session.claim(&alice, ItemId::new(2), 1).unwrap();
    session.claim(&alice, ItemId::new(3), 1).unwrap();

    let receipt = session.receipt().unwrap();
    assert_eq!(receipt.item(ItemId::new(2)).unwrap().remaining(), 1);
    assert_eq!(receipt.item(ItemId::new(4)).unwrap().remaining(), 3);
    assert_eq!(receipt.remaining_total(), 4);

    assert!(!session.is_fully_allocated());
    assert!(matches!(
        session.confirm(&alice),
        Err(Error::AllocationIncomplete { remaining: 4 })
    ));
}

#[test]
fn test_full_allocation_enables_confirmation() {
    let mut session = SplitSession::new(1).unwrap();
    session
        .load_from_scan(&FixedDecoder::new(), "qr-payload")
        .unwrap();

    let alice = ParticipantId::new("alice");

    session.claim(&alice, ItemId::new(1), 1).unwrap();
    session.claim(&alice, ItemId::new(2), 1).unwrap();
    session.claim(&alice, ItemId::new(3), 1).unwrap();

    // Claim the rest: the second noodles and all spring rolls.
    session.claim(&alice, ItemId::new(2), 1).unwrap();
    session.claim(&alice, ItemId::new(4), 3).unwrap();

    assert!(session.is_fully_allocated());
    assert_eq!(session.confirm(&alice).unwrap(), SessionPhase::Ready);
    assert_eq!(session.confirmed_count(), 1);
    assert_eq!(session.cart_total(&alice), dec!(56.75));
}

#[test]
fn test_two_diners_split_and_reconfirm() {
    let mut session = SplitSession::new(2).unwrap();
    session
        .load_from_scan(&FixedDecoder::new(), "qr-payload")
        .unwrap();

    let alice = ParticipantId::new("alice");
    let bob = ParticipantId::new("bob");

    session.claim(&alice, ItemId::new(1), 1).unwrap();
    session.claim(&alice, ItemId::new(2), 2).unwrap();
    session.claim(&bob, ItemId::new(3), 1).unwrap();
    session.claim(&bob, ItemId::new(4), 3).unwrap();

    assert_eq!(session.confirm(&alice).unwrap(), SessionPhase::Open);
    assert_eq!(session.confirm(&bob).unwrap(), SessionPhase::Ready);

    assert_eq!(session.cart_total(&alice), dec!(33.50));
    assert_eq!(session.cart_total(&bob), dec!(23.25));

    // Bob hands a spring roll back to alice; his confirmation drops and
    // both must land the units again before the session is ready.
    assert!(session.unclaim(&bob, ItemId::new(4), 1).unwrap());
    assert_eq!(session.phase(), SessionPhase::Open);

    assert!(session.claim(&alice, ItemId::new(4), 1).unwrap());
    assert_eq!(session.confirmed_count(), 0);

    session.confirm(&alice).unwrap();
    session.confirm(&bob).unwrap();
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert_eq!(session.cart_total(&alice), dec!(38.00));
    assert_eq!(session.cart_total(&bob), dec!(18.75));
}
