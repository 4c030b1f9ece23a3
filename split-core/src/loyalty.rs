//! Loyalty tier calculator
//!
//! Pure step function from an accumulated token count to a discount
//! percentage, plus the distance to the next tier. The token balance
//! itself is external and read-only; the calculator owns no state.
//!
//! Tiers: `<25 → 0%`, `25–49 → 5%`, `50–99 → 10%`, `>=100 → 20%`.

use crate::Result;

/// Tier thresholds, ascending
const THRESHOLDS: [u64; 3] = [25, 50, 100];

/// Discount percentage for the given token count
pub fn discount_percent(token_count: u64) -> u8 {
    if token_count >= 100 {
        20
    } else if token_count >= 50 {
        10
    } else if token_count >= 25 {
        5
    } else {
        0
    }
}

/// Tokens remaining to the next tier threshold, 0 once at the top tier
pub fn next_tier_gap(token_count: u64) -> u64 {
    THRESHOLDS
        .iter()
        .find(|&&threshold| token_count < threshold)
        .map(|&threshold| threshold - token_count)
        .unwrap_or(0)
}

/// Progress toward the next tier threshold, in `[0, 1]`
///
/// 1.0 once the top tier is reached.
pub fn next_tier_progress(token_count: u64) -> f64 {
    match THRESHOLDS.iter().find(|&&threshold| token_count < threshold) {
        Some(&threshold) => token_count as f64 / threshold as f64,
        None => 1.0,
    }
}

/// Inbound collaborator supplying a wallet's current token count
pub trait TokenBalanceSource {
    /// Current token count for the wallet
    fn token_balance(&self, wallet: &str) -> Result<u64>;
}

/// Balance source returning a fixed count, for tests and demos
#[derive(Debug, Clone)]
pub struct StaticBalanceSource {
    balance: u64,
}

impl StaticBalanceSource {
    /// Create a source that always reports `balance`
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }
}

impl TokenBalanceSource for StaticBalanceSource {
    fn token_balance(&self, _wallet: &str) -> Result<u64> {
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(discount_percent(0), 0);
        assert_eq!(discount_percent(24), 0);
        assert_eq!(discount_percent(25), 5);
        assert_eq!(discount_percent(49), 5);
        assert_eq!(discount_percent(50), 10);
        assert_eq!(discount_percent(99), 10);
        assert_eq!(discount_percent(100), 20);
        assert_eq!(discount_percent(1_000), 20);
    }

    #[test]
    fn test_next_tier_gap() {
        assert_eq!(next_tier_gap(0), 25);
        assert_eq!(next_tier_gap(24), 1);
        assert_eq!(next_tier_gap(25), 25);
        assert_eq!(next_tier_gap(60), 40);
        assert_eq!(next_tier_gap(100), 0);
        assert_eq!(next_tier_gap(250), 0);
    }

    #[test]
    fn test_next_tier_progress() {
        assert_eq!(next_tier_progress(0), 0.0);
        assert!((next_tier_progress(20) - 0.8).abs() < f64::EPSILON);
        assert!((next_tier_progress(75) - 0.75).abs() < f64::EPSILON);
        assert_eq!(next_tier_progress(100), 1.0);
    }

    #[test]
    fn test_static_balance_source() {
        let source = StaticBalanceSource::new(42);
        assert_eq!(source.token_balance("any-wallet").unwrap(), 42);
        assert_eq!(discount_percent(source.token_balance("w").unwrap()), 5);
    }
}
