//! Settlement Engine
//!
//! Turns a confirmed bill split into a single on-chain payment.
//!
//! # Architecture
//!
//! The engine consumes a ready [`split_core::SplitSession`] and drives
//! one attempt through its phases:
//!
//! 1. **Building**: cart total + rate quote → fresh transfer request
//! 2. **AwaitingSignature**: external signer, cancellable, may suspend
//!    indefinitely
//! 3. **Broadcasting**: submit to the network capability
//! 4. **Confirming**: await finality under the configured timeout
//! 5. **Settled**: append a completed record to payment history
//!
//! Failures surface to the caller and are never retried automatically;
//! crypto transfers are only re-attempted by explicit user action, with
//! a fresh request.
//!
//! # Example
//!
//! ```no_run
//! use settlement::{Config, SettlementEngine, InMemorySigner, MockNetwork, FixedRateSource};
//! use split_core::{FixedDecoder, ParticipantId, SplitSession};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> settlement::Result<()> {
//!     let mut session = SplitSession::new(1)?;
//!     session.load_from_scan(&FixedDecoder::new(), "qr-payload")?;
//!     // ... claims and confirmation ...
//!
//!     let mut engine = SettlementEngine::new(
//!         Config::default(),
//!         Arc::new(InMemorySigner::new()),
//!         Arc::new(MockNetwork::new()),
//!         Arc::new(FixedRateSource::default()),
//!     );
//!     let outcome = engine.settle(&mut session, &ParticipantId::new("alice")).await?;
//!     println!("settled: {}", outcome.record.record_id);
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod broadcast;
pub mod config;
pub mod engine;
pub mod error;
pub mod rates;
pub mod signer;
pub mod types;

// Re-exports
pub use broadcast::{Broadcaster, MockNetwork};
pub use config::Config;
pub use engine::{CancelHandle, CancelToken, SettlementEngine};
pub use error::{Error, Result};
pub use rates::{FixedRateSource, RateSource};
pub use signer::{InMemorySigner, RejectingSigner, Signer};
pub use types::*;
