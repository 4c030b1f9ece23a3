//! Outbound broadcast and finality collaborator
//!
//! The network capability accepts a signed payload, returns a
//! transaction reference immediately, and later reports finality. The
//! engine bounds the finality wait with its own timeout; once a payload
//! has been broadcast there is no cancellation, only success or the
//! timeout.

use crate::types::{Finality, SignedPayload};
use crate::Result;
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use split_core::TxReference;
use tokio::time::Duration;

/// Collaborator that submits signed payloads and reports finality
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Submit the signed payload, returning the network's transaction
    /// reference
    async fn broadcast(&self, payload: &SignedPayload) -> Result<TxReference>;

    /// Wait for the network's finality verdict on a broadcast transfer
    async fn await_finality(&self, tx: &TxReference) -> Result<Finality>;
}

/// In-memory network with scriptable behavior, for tests and demos
#[derive(Debug, Clone)]
pub struct MockNetwork {
    fail_broadcast: bool,
    finality: Finality,
    finality_delay: Duration,
    never_finalizes: bool,
}

impl MockNetwork {
    /// Network that accepts broadcasts and finalizes immediately
    pub fn new() -> Self {
        Self {
            fail_broadcast: false,
            finality: Finality::Finalized,
            finality_delay: Duration::ZERO,
            never_finalizes: false,
        }
    }

    /// Reject every broadcast with a network fault
    pub fn with_broadcast_failure(mut self) -> Self {
        self.fail_broadcast = true;
        self
    }

    /// Report the given finality verdict
    pub fn with_finality(mut self, finality: Finality) -> Self {
        self.finality = finality;
        self
    }

    /// Delay the finality report
    pub fn with_finality_delay(mut self, delay: Duration) -> Self {
        self.finality_delay = delay;
        self
    }

    /// Never report finality (the engine's timeout must fire)
    pub fn with_no_finality(mut self) -> Self {
        self.never_finalizes = true;
        self
    }

    fn mint_reference() -> TxReference {
        let reference: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(35)
            .map(char::from)
            .collect();
        TxReference::new(reference)
    }
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broadcaster for MockNetwork {
    async fn broadcast(&self, payload: &SignedPayload) -> Result<TxReference> {
        if self.fail_broadcast {
            return Err(crate::Error::BroadcastError(format!(
                "network refused payload for request {}",
                payload.request_id
            )));
        }
        Ok(Self::mint_reference())
    }

    async fn await_finality(&self, _tx: &TxReference) -> Result<Finality> {
        if self.never_finalizes {
            std::future::pending::<()>().await;
        }
        if !self.finality_delay.is_zero() {
            tokio::time::sleep(self.finality_delay).await;
        }
        Ok(self.finality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn payload() -> SignedPayload {
        SignedPayload {
            request_id: Uuid::new_v4(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_mock_network_happy_path() {
        let network = MockNetwork::new();
        let tx = network.broadcast(&payload()).await.unwrap();
        assert_eq!(tx.as_str().len(), 35);
        assert_eq!(network.await_finality(&tx).await.unwrap(), Finality::Finalized);
    }

    #[tokio::test]
    async fn test_mock_network_broadcast_failure() {
        let network = MockNetwork::new().with_broadcast_failure();
        let result = network.broadcast(&payload()).await;
        assert!(matches!(result, Err(crate::Error::BroadcastError(_))));
    }

    #[tokio::test]
    async fn test_mock_network_dropped_transfer() {
        let network = MockNetwork::new().with_finality(Finality::Dropped);
        let tx = network.broadcast(&payload()).await.unwrap();
        assert_eq!(network.await_finality(&tx).await.unwrap(), Finality::Dropped);
    }
}
