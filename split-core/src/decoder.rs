//! Inbound decoder collaborator
//!
//! A [`Decoder`] turns a raw scanned payload (QR contents, OCR text) into
//! structured line items. Camera and QR hardware live outside the
//! coordinator; only the decoded payload crosses this seam.

use crate::parser;
use crate::types::{ItemId, LineItem};
use crate::Result;
use rust_decimal::Decimal;

/// Collaborator that decodes a scanned payload into line items
pub trait Decoder {
    /// Decode raw scan data into ordered line items
    ///
    /// Failures are reported as [`crate::Error::InvalidReceipt`].
    fn decode(&self, raw: &str) -> Result<Vec<LineItem>>;
}

/// Decoder for the plain-text receipt format (see [`crate::parser`])
#[derive(Debug, Default, Clone)]
pub struct TextDecoder;

impl TextDecoder {
    /// Create a text decoder
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for TextDecoder {
    fn decode(&self, raw: &str) -> Result<Vec<LineItem>> {
        parser::parse_receipt(raw)
    }
}

/// Placeholder decoder that ignores the payload and returns a fixed
/// four-item demo receipt
///
/// Stands in for a real QR decoder during development; swap in a
/// [`TextDecoder`] (or any other [`Decoder`]) without touching the
/// coordinator.
#[derive(Debug, Default, Clone)]
pub struct FixedDecoder;

impl FixedDecoder {
    /// Create a fixed decoder
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for FixedDecoder {
    fn decode(&self, _raw: &str) -> Result<Vec<LineItem>> {
        Ok(vec![
            LineItem::new(ItemId::new(1), "GLASS STAR #148", Decimal::new(850, 2), 1),
            LineItem::new(ItemId::new(2), "NOODLES (L)", Decimal::new(1250, 2), 2),
            LineItem::new(ItemId::new(3), "FRIED RICE", Decimal::new(975, 2), 1),
            LineItem::new(ItemId::new(4), "SPRING ROLLS", Decimal::new(450, 2), 3),
        ])
    }
}
