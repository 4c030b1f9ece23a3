//! Core types for the settlement engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use split_core::{Currency, SettlementRecord};
use uuid::Uuid;

/// Transfer request built from a confirmed cart
///
/// Each settlement attempt mints a fresh request; a request is never
/// re-submitted across attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Request ID, unique per attempt
    pub request_id: Uuid,

    /// Fiat total of the confirmed cart
    pub fiat_total: Decimal,

    /// Currency of the fiat total
    pub currency: Currency,

    /// Converted crypto amount (floored at the asset scale)
    pub crypto_amount: Decimal,

    /// Recipient address
    pub recipient: String,

    /// Build timestamp
    pub created_at: DateTime<Utc>,
}

/// Signed transfer payload, opaque to the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedPayload {
    /// Request the payload was produced for
    pub request_id: Uuid,

    /// Serialized signed transaction bytes
    pub bytes: Vec<u8>,
}

/// Finality verdict reported by the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finality {
    /// Transfer irreversibly accepted
    Finalized,
    /// Transfer dropped before finality
    Dropped,
}

/// Phase of the settlement orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementPhase {
    /// No attempt in flight
    Idle,
    /// Assembling the transfer request
    Building,
    /// Waiting on the external signer (cancellable)
    AwaitingSignature,
    /// Submitting the signed payload to the network
    Broadcasting,
    /// Awaiting network finality
    Confirming,
    /// Transfer finalized and recorded
    Settled,
    /// Attempt failed; retry requires a fresh request
    Failed,
}

/// Loyalty token award earned by a completed settlement
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoyaltyReward {
    /// Tokens earned (minting is an external concern)
    pub tokens: u64,
}

/// Result of a successful settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// The appended history record
    pub record: SettlementRecord,

    /// Loyalty award attached to the settlement
    pub reward: LoyaltyReward,
}
