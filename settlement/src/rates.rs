//! Inbound exchange-rate collaborator
//!
//! Supplies the current fiat price of one whole crypto unit on demand.
//! Live retrieval (exchange APIs, oracles) lives outside the
//! coordinator; the conversion arithmetic itself is in
//! [`split_core::rates`] and rejects non-positive quotes.

use crate::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use split_core::Currency;

/// Collaborator quoting the fiat price of one whole crypto unit
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Current rate for the given fiat currency
    async fn current_rate(&self, currency: Currency) -> Result<Decimal>;
}

/// Rate source returning a fixed quote
///
/// The default mirrors the development placeholder of one crypto unit
/// per 100 fiat units.
#[derive(Debug, Clone)]
pub struct FixedRateSource {
    rate: Decimal,
}

impl FixedRateSource {
    /// Create a source that always quotes `rate`
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

impl Default for FixedRateSource {
    fn default() -> Self {
        Self::new(Decimal::from(100))
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    async fn current_rate(&self, _currency: Currency) -> Result<Decimal> {
        Ok(self.rate)
    }
}
