//! Error types for the settlement engine

use split_core::TxReference;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
///
/// Settlement failures are never retried automatically: a transfer is
/// only re-attempted by explicit user action, with a fresh request.
#[derive(Error, Debug)]
pub enum Error {
    /// Coordinator core error
    #[error("Core error: {0}")]
    Core(#[from] split_core::Error),

    /// Settlement attempted before the confirmation quorum completed
    #[error("Quorum not reached: {confirmed} of {required} confirmed")]
    QuorumNotReached {
        /// Confirmations recorded so far
        confirmed: u32,
        /// Confirmations required
        required: u32,
    },

    /// The signer declined to sign the request
    #[error("Signature rejected: {0}")]
    SignatureRejected(String),

    /// The signer capability is unreachable
    #[error("Signer unavailable: {0}")]
    SignerUnavailable(String),

    /// The network rejected or dropped the transfer
    #[error("Broadcast error: {0}")]
    BroadcastError(String),

    /// Finality was not observed within the configured timeout; the
    /// transfer's true outcome is unknown to the coordinator
    #[error("Confirmation timeout for {tx_reference} after {timeout_secs}s")]
    ConfirmationTimeout {
        /// Reference of the broadcast transfer, for external
        /// reconciliation
        tx_reference: TxReference,
        /// Timeout that elapsed
        timeout_secs: u64,
    },

    /// The attempt was cancelled before broadcast
    #[error("Settlement cancelled before broadcast")]
    Cancelled,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

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
