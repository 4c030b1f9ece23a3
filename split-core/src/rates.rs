//! Fiat-to-crypto rate conversion
//!
//! Pure arithmetic only; the rate itself comes from an external source.
//! Conversion always rounds down at the asset's smallest transferable
//! unit so a rounding step can never overcharge the payer.

use crate::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of the default settlement asset's smallest unit
/// (10^9 smallest units per whole unit)
pub const DEFAULT_ASSET_SCALE: u32 = 9;

/// Convert a fiat amount to a crypto amount at the given rate
///
/// `rate` is the fiat price of one whole crypto unit and must be
/// strictly positive. The result is floored at [`DEFAULT_ASSET_SCALE`]
/// decimal places.
pub fn to_crypto_amount(fiat_amount: Decimal, rate: Decimal) -> Result<Decimal> {
    to_crypto_amount_scaled(fiat_amount, rate, DEFAULT_ASSET_SCALE)
}

/// Convert a fiat amount to a crypto amount, flooring at `scale`
/// decimal places
pub fn to_crypto_amount_scaled(fiat_amount: Decimal, rate: Decimal, scale: u32) -> Result<Decimal> {
    if rate <= Decimal::ZERO {
        return Err(Error::InvalidRate(rate));
    }
    Ok((fiat_amount / rate).round_dp_with_strategy(scale, RoundingStrategy::ToZero))
}
