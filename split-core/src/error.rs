//! Error types for the bill split coordinator

use crate::types::{ItemId, ParticipantId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for coordinator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coordinator errors
///
/// All variants are recoverable: the failing operation leaves state
/// unchanged and the caller may retry or return the flow to idle.
#[derive(Error, Debug)]
pub enum Error {
    /// Receipt failed decoding or validation
    #[error("Invalid receipt: {0}")]
    InvalidReceipt(String),

    /// Claim exceeds an item's remaining quantity
    #[error("Insufficient quantity for item {item}: requested {requested}, remaining {remaining}")]
    InsufficientQuantity {
        /// Item being claimed
        item: ItemId,
        /// Units requested
        requested: u32,
        /// Units still unclaimed
        remaining: u32,
    },

    /// Unclaim exceeds the quantity held in the participant's cart
    #[error("Nothing to unclaim for item {item}: requested {requested}, held {held}")]
    NothingToUnclaim {
        /// Item being returned
        item: ItemId,
        /// Units requested
        requested: u32,
        /// Units held in the cart
        held: u32,
    },

    /// Item id not present in the loaded receipt
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Operation requires a loaded receipt
    #[error("No receipt loaded")]
    NoReceipt,

    /// Confirming before every item is claimed
    #[error("Allocation incomplete: {remaining} unit(s) still unclaimed")]
    AllocationIncomplete {
        /// Units still in the unclaimed pool
        remaining: u32,
    },

    /// Confirming with an empty cart
    #[error("Empty cart for participant {0}")]
    EmptyCart(ParticipantId),

    /// Participant's confirmation flag is already set
    #[error("Participant {0} has already confirmed")]
    AlreadyConfirmed(ParticipantId),

    /// Confirmation received after the quorum was already reached
    #[error("Quorum already reached ({required} of {required} confirmed)")]
    QuorumAlreadyReached {
        /// Required confirmation count
        required: u32,
    },

    /// Quorum size must be at least one
    #[error("Invalid quorum size: {0}")]
    InvalidQuorum(u32),

    /// Exchange rate must be strictly positive
    #[error("Invalid rate: {0}")]
    InvalidRate(Decimal),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
