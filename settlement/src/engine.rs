//! Settlement orchestrator
//!
//! Drives one settlement attempt through its phases:
//!
//! ```text
//! Idle → Building → AwaitingSignature → Broadcasting → Confirming
//!                                                   ↘ Settled | Failed
//! ```
//!
//! Each attempt mints a fresh request; nothing is ever re-broadcast.
//! The signature wait is the only cancellable step; once a payload hits
//! the network the engine waits for finality or the confirmation
//! timeout. Only a finalized transfer is recorded in payment history.
//!
//! The engine holds `&mut SplitSession` for the whole attempt, so cart
//! or confirmation changes cannot interleave with an in-flight
//! settlement; a caller must cancel first, then mutate.

use crate::{
    broadcast::Broadcaster,
    config::Config,
    rates::RateSource,
    signer::Signer,
    types::{Finality, LoyaltyReward, SettlementOutcome, SettlementPhase, SettlementRequest},
    Error, Result,
};
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use split_core::{
    rates, ParticipantId, PaymentHistory, SettlementRecord, SettlementStatus, SplitSession,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::Duration;
use uuid::Uuid;

/// Caller-side handle that cancels a pending signature wait
#[derive(Debug)]
pub struct CancelHandle(oneshot::Sender<()>);

impl CancelHandle {
    /// Cancel the attempt; a no-op once broadcasting has started
    pub fn cancel(self) {
        let _ = self.0.send(());
    }
}

/// Engine-side token observed while awaiting signature
#[derive(Debug)]
pub struct CancelToken(oneshot::Receiver<()>);

impl CancelToken {
    /// Create a linked handle/token pair
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = oneshot::channel();
        (CancelHandle(tx), CancelToken(rx))
    }

    /// A token that never fires, for attempts without a cancel surface
    pub fn never() -> CancelToken {
        let (_tx, rx) = oneshot::channel();
        CancelToken(rx)
    }

    async fn cancelled(self) {
        // A dropped handle means the caller gave up the cancel surface,
        // not that it cancelled.
        if self.0.await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Settlement engine
pub struct SettlementEngine {
    /// Configuration
    config: Config,

    /// External signer capability
    signer: Arc<dyn Signer>,

    /// External network capability
    network: Arc<dyn Broadcaster>,

    /// External rate source
    rates: Arc<dyn RateSource>,

    /// Shared payment history
    history: Arc<RwLock<PaymentHistory>>,

    /// Current orchestrator phase
    phase: SettlementPhase,
}

impl SettlementEngine {
    /// Create a new settlement engine
    pub fn new(
        config: Config,
        signer: Arc<dyn Signer>,
        network: Arc<dyn Broadcaster>,
        rates: Arc<dyn RateSource>,
    ) -> Self {
        Self {
            config,
            signer,
            network,
            rates,
            history: Arc::new(RwLock::new(PaymentHistory::new())),
            phase: SettlementPhase::Idle,
        }
    }

    /// Current orchestrator phase
    pub fn phase(&self) -> SettlementPhase {
        self.phase
    }

    /// Shared payment history
    pub fn history(&self) -> Arc<RwLock<PaymentHistory>> {
        Arc::clone(&self.history)
    }

    /// Newest records, bounded by the configured prefix length
    pub fn recent_history(&self) -> Vec<SettlementRecord> {
        self.history.read().recent(self.config.history.recent_limit)
    }

    /// Assemble a transfer request from a cart total and a rate quote
    ///
    /// Conversion floors at the configured asset scale so the request
    /// can never overcharge; a non-positive rate is rejected.
    pub fn build_request(&self, fiat_total: Decimal, rate: Decimal) -> Result<SettlementRequest> {
        let crypto_amount =
            rates::to_crypto_amount_scaled(fiat_total, rate, self.config.asset.decimals)?;
        Ok(SettlementRequest {
            request_id: Uuid::new_v4(),
            fiat_total,
            currency: self.config.currency,
            crypto_amount,
            recipient: self.config.recipient.clone(),
            created_at: Utc::now(),
        })
    }

    /// Settle the participant's confirmed cart, without a cancel surface
    pub async fn settle(
        &mut self,
        session: &mut SplitSession,
        participant: &ParticipantId,
    ) -> Result<SettlementOutcome> {
        self.settle_with_cancel(session, participant, CancelToken::never())
            .await
    }

    /// Settle the participant's confirmed cart
    ///
    /// Fails with `QuorumNotReached` unless the session is ready. On
    /// success the record is appended to history and the session returns
    /// to idle; on failure history is untouched and the session keeps
    /// its state so the user can retry with a fresh attempt.
    pub async fn settle_with_cancel(
        &mut self,
        session: &mut SplitSession,
        participant: &ParticipantId,
        cancel: CancelToken,
    ) -> Result<SettlementOutcome> {
        if !session.is_ready() {
            return Err(Error::QuorumNotReached {
                confirmed: session.confirmed_count(),
                required: session.required(),
            });
        }
        if !session.has_confirmed(participant) {
            return Err(Error::Other(format!(
                "participant {} has not confirmed this split",
                participant
            )));
        }

        // Building
        self.phase = SettlementPhase::Building;
        let fiat_total = session.cart_total(participant);
        let rate = match self.rates.current_rate(self.config.currency).await {
            Ok(rate) => rate,
            Err(e) => return self.fail(e),
        };
        let request = match self.build_request(fiat_total, rate) {
            Ok(request) => request,
            Err(e) => return self.fail(e),
        };
        tracing::info!(
            request_id = %request.request_id,
            %fiat_total,
            %rate,
            crypto_amount = %request.crypto_amount,
            recipient = %request.recipient,
            "settlement request built"
        );

        // AwaitingSignature: may suspend indefinitely, cancellable.
        self.phase = SettlementPhase::AwaitingSignature;
        let sign_result = {
            let sign = self.signer.sign(&request);
            tokio::pin!(sign);
            tokio::select! {
                result = &mut sign => Some(result),
                _ = cancel.cancelled() => None,
            }
        };
        let signed = match sign_result {
            None => {
                self.phase = SettlementPhase::Idle;
                tracing::info!(request_id = %request.request_id, "attempt cancelled before broadcast");
                return Err(Error::Cancelled);
            }
            Some(Err(e)) => return self.fail(e),
            Some(Ok(signed)) => signed,
        };

        // Broadcasting: past this point there is no cancellation.
        self.phase = SettlementPhase::Broadcasting;
        let tx = match self.network.broadcast(&signed).await {
            Ok(tx) => tx,
            Err(e) => return self.fail(e),
        };
        tracing::info!(tx_reference = %tx, "transfer broadcast");

        // Confirming
        self.phase = SettlementPhase::Confirming;
        let timeout = Duration::from_secs(self.config.confirmation.timeout_secs);
        let finality = match tokio::time::timeout(timeout, self.network.await_finality(&tx)).await {
            Err(_elapsed) => {
                // The transfer's true outcome is unknown here; the
                // reference is surfaced for external reconciliation.
                return self.fail(Error::ConfirmationTimeout {
                    tx_reference: tx,
                    timeout_secs: self.config.confirmation.timeout_secs,
                });
            }
            Ok(Err(e)) => return self.fail(e),
            Ok(Ok(finality)) => finality,
        };
        if finality == Finality::Dropped {
            return self.fail(Error::BroadcastError(format!(
                "transfer {} dropped before finality",
                tx
            )));
        }

        // Settled
        self.phase = SettlementPhase::Settled;
        let record = SettlementRecord {
            record_id: Uuid::new_v4(),
            settled_at: Utc::now(),
            restaurant: self.config.counterparty_label.clone(),
            fiat_amount: fiat_total,
            currency: self.config.currency,
            participants: session.required(),
            status: SettlementStatus::Completed,
            tx_reference: Some(tx),
        };
        self.history.write().append(record.clone());

        // The receipt is consumed by settlement; the next split starts
        // from a fresh scan.
        session.discard();
        self.phase = SettlementPhase::Idle;
        tracing::info!(record_id = %record.record_id, "settlement complete");

        Ok(SettlementOutcome {
            record,
            reward: LoyaltyReward { tokens: 1 },
        })
    }

    fn fail<T>(&mut self, error: Error) -> Result<T> {
        self.phase = SettlementPhase::Failed;
        tracing::warn!(%error, "settlement attempt failed");
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::MockNetwork;
    use crate::rates::FixedRateSource;
    use crate::signer::{InMemorySigner, RejectingSigner};
    use rust_decimal_macros::dec;
    use split_core::types::ItemId;
    use split_core::{FixedDecoder, SessionPhase};

    fn ready_session() -> (SplitSession, ParticipantId) {
        let mut session = SplitSession::new(1).unwrap();
        session
            .load_from_scan(&FixedDecoder::new(), "qr-payload")
            .unwrap();

        let alice = ParticipantId::new("alice");
        session.claim(&alice, ItemId::new(1), 1).unwrap();
        session.claim(&alice, ItemId::new(2), 2).unwrap();
        session.claim(&alice, ItemId::new(3), 1).unwrap();
        session.claim(&alice, ItemId::new(4), 3).unwrap();
        session.confirm(&alice).unwrap();

        (session, alice)
    }

    fn engine(signer: Arc<dyn Signer>, network: Arc<dyn Broadcaster>) -> SettlementEngine {
        SettlementEngine::new(
            Config::default(),
            signer,
            network,
            Arc::new(FixedRateSource::default()),
        )
    }

    #[tokio::test]
    async fn test_settle_happy_path() {
        let (mut session, alice) = ready_session();
        let mut engine = engine(Arc::new(InMemorySigner::new()), Arc::new(MockNetwork::new()));

        let outcome = engine.settle(&mut session, &alice).await.unwrap();

        assert_eq!(outcome.record.fiat_amount, dec!(56.75));
        assert_eq!(outcome.record.status, SettlementStatus::Completed);
        assert_eq!(outcome.record.participants, 1);
        assert!(outcome.record.tx_reference.is_some());
        assert_eq!(outcome.reward.tokens, 1);

        // Record landed at the head of history, engine and session are idle.
        assert_eq!(engine.recent_history().len(), 1);
        assert_eq!(engine.phase(), SettlementPhase::Idle);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.receipt().is_none());
    }

    #[tokio::test]
    async fn test_build_request_for_fixed_recipient() {
        let engine = engine(Arc::new(InMemorySigner::new()), Arc::new(MockNetwork::new()));

        let request = engine.build_request(dec!(31.25), dec!(100)).unwrap();
        assert_eq!(request.crypto_amount, dec!(0.3125));
        assert_eq!(request.recipient, Config::default().recipient);
        assert_eq!(request.fiat_total, dec!(31.25));
    }

    #[tokio::test]
    async fn test_settle_requires_quorum() {
        let mut session = SplitSession::new(1).unwrap();
        session
            .load_from_scan(&FixedDecoder::new(), "qr-payload")
            .unwrap();
        let alice = ParticipantId::new("alice");

        let mut engine = engine(Arc::new(InMemorySigner::new()), Arc::new(MockNetwork::new()));
        let result = engine.settle(&mut session, &alice).await;

        assert!(matches!(
            result,
            Err(Error::QuorumNotReached {
                confirmed: 0,
                required: 1
            })
        ));
        // Quorum errors leave everything untouched.
        assert_eq!(engine.phase(), SettlementPhase::Idle);
        assert!(engine.recent_history().is_empty());
    }

    #[tokio::test]
    async fn test_settle_for_unconfirmed_participant_rejected() {
        let (mut session, _alice) = ready_session();
        let bob = ParticipantId::new("bob");

        let mut engine = engine(Arc::new(InMemorySigner::new()), Arc::new(MockNetwork::new()));
        let result = engine.settle(&mut session, &bob).await;
        assert!(result.is_err());
        assert!(engine.recent_history().is_empty());
    }

    #[tokio::test]
    async fn test_signature_rejection_fails_attempt() {
        let (mut session, alice) = ready_session();
        let mut engine = engine(Arc::new(RejectingSigner), Arc::new(MockNetwork::new()));

        let result = engine.settle(&mut session, &alice).await;

        assert!(matches!(result, Err(Error::SignatureRejected(_))));
        assert_eq!(engine.phase(), SettlementPhase::Failed);
        assert!(engine.recent_history().is_empty());
        // The session keeps its state for a retry.
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[tokio::test]
    async fn test_broadcast_failure_then_retry_succeeds() {
        let (mut session, alice) = ready_session();

        let mut failing = engine(
            Arc::new(InMemorySigner::new()),
            Arc::new(MockNetwork::new().with_broadcast_failure()),
        );
        let result = failing.settle(&mut session, &alice).await;
        assert!(matches!(result, Err(Error::BroadcastError(_))));
        assert_eq!(failing.phase(), SettlementPhase::Failed);
        assert!(failing.recent_history().is_empty());

        // A user-initiated retry is a fresh attempt with a fresh request.
        let mut working = engine(Arc::new(InMemorySigner::new()), Arc::new(MockNetwork::new()));
        let outcome = working.settle(&mut session, &alice).await.unwrap();
        assert_eq!(outcome.record.status, SettlementStatus::Completed);
    }

    #[tokio::test]
    async fn test_confirmation_timeout_leaves_history_unchanged() {
        let (mut session, alice) = ready_session();

        let mut config = Config::default();
        config.confirmation.timeout_secs = 0;
        let mut engine = SettlementEngine::new(
            config,
            Arc::new(InMemorySigner::new()),
            Arc::new(MockNetwork::new().with_no_finality()),
            Arc::new(FixedRateSource::default()),
        );

        let result = engine.settle(&mut session, &alice).await;

        match result {
            Err(Error::ConfirmationTimeout { tx_reference, .. }) => {
                assert!(!tx_reference.as_str().is_empty());
            }
            other => panic!("expected ConfirmationTimeout, got {:?}", other.map(|_| ())),
        }
        assert_eq!(engine.phase(), SettlementPhase::Failed);
        assert!(engine.recent_history().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_transfer_fails_attempt() {
        let (mut session, alice) = ready_session();
        let mut engine = engine(
            Arc::new(InMemorySigner::new()),
            Arc::new(MockNetwork::new().with_finality(Finality::Dropped)),
        );

        let result = engine.settle(&mut session, &alice).await;
        assert!(matches!(result, Err(Error::BroadcastError(_))));
        assert!(engine.recent_history().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_while_awaiting_signature() {
        let (mut session, alice) = ready_session();
        let mut engine = engine(
            Arc::new(InMemorySigner::with_delay(Duration::from_secs(30))),
            Arc::new(MockNetwork::new()),
        );

        let (handle, token) = CancelToken::pair();
        handle.cancel();
        let result = engine.settle_with_cancel(&mut session, &alice, token).await;

        assert!(matches!(result, Err(Error::Cancelled)));
        // Cancellation has no side effects: engine idle, history empty,
        // session still ready.
        assert_eq!(engine.phase(), SettlementPhase::Idle);
        assert!(engine.recent_history().is_empty());
        assert_eq!(session.phase(), SessionPhase::Ready);
    }

    #[tokio::test]
    async fn test_zero_rate_rejected() {
        let (mut session, alice) = ready_session();
        let mut engine = SettlementEngine::new(
            Config::default(),
            Arc::new(InMemorySigner::new()),
            Arc::new(MockNetwork::new()),
            Arc::new(FixedRateSource::new(Decimal::ZERO)),
        );

        let result = engine.settle(&mut session, &alice).await;
        assert!(matches!(
            result,
            Err(Error::Core(split_core::Error::InvalidRate(_)))
        ));
        assert!(engine.recent_history().is_empty());
    }
}
