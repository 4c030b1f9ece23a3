//! Outbound signer collaborator
//!
//! Key management and transaction signing live outside the coordinator
//! (a wallet, an HSM, a human approving on a device). The engine only
//! hands over a built request and waits; the wait may be unbounded and
//! is the one place an attempt can be cancelled.

use crate::types::{SettlementRequest, SignedPayload};
use crate::Result;
use async_trait::async_trait;
use tokio::time::Duration;

/// Collaborator that signs a settlement request
#[async_trait]
pub trait Signer: Send + Sync {
    /// Produce a signed payload for the request
    ///
    /// May suspend indefinitely while a human approves. Fails with
    /// `SignatureRejected` or `SignerUnavailable`.
    async fn sign(&self, request: &SettlementRequest) -> Result<SignedPayload>;
}

/// Signer that approves every request, optionally after a delay
///
/// The delay stands in for the human-approval wait in tests and demos.
#[derive(Debug, Clone)]
pub struct InMemorySigner {
    delay: Duration,
}

impl InMemorySigner {
    /// Create a signer that approves immediately
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Create a signer that approves after `delay`
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for InMemorySigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Signer for InMemorySigner {
    async fn sign(&self, request: &SettlementRequest) -> Result<SignedPayload> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        // The request itself serves as the payload body; a real signer
        // would return network-ready transaction bytes.
        let bytes = serde_json::to_vec(request)
            .map_err(|e| crate::Error::Other(format!("payload encoding failed: {}", e)))?;
        Ok(SignedPayload {
            request_id: request.request_id,
            bytes,
        })
    }
}

/// Signer that declines every request
#[derive(Debug, Clone, Default)]
pub struct RejectingSigner;

#[async_trait]
impl Signer for RejectingSigner {
    async fn sign(&self, request: &SettlementRequest) -> Result<SignedPayload> {
        Err(crate::Error::SignatureRejected(format!(
            "request {} declined by signer",
            request.request_id
        )))
    }
}
