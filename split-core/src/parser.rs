//! Receipt parser
//!
//! Turns raw decoded receipt text into a structured line-item inventory.
//!
//! The wire format is one item per line:
//!
//! ```text
//! 1 x GLASS STAR #148 @ 8.50
//! 2 x NOODLES (L) @ 12.50
//! ```
//!
//! Blank lines are skipped. Item ids are assigned sequentially in print
//! order, starting at 1. Structural failures map to
//! [`Error::InvalidReceipt`]; value checks (non-negative price, positive
//! quantity) are enforced when the ledger loads the items.

use crate::types::{ItemId, LineItem};
use crate::{Error, Result};
use rust_decimal::Decimal;

/// Parse raw receipt text into ordered line items
pub fn parse_receipt(text: &str) -> Result<Vec<LineItem>> {
    let mut items = Vec::new();
    let mut next_id = 1u32;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let item = parse_line(line, next_id)
            .map_err(|reason| Error::InvalidReceipt(format!("line {}: {}", idx + 1, reason)))?;
        items.push(item);
        next_id += 1;
    }

    Ok(items)
}

fn parse_line(line: &str, id: u32) -> std::result::Result<LineItem, String> {
    let (qty_part, rest) = line
        .split_once(" x ")
        .ok_or_else(|| format!("missing quantity separator in {:?}", line))?;

    // Names may contain '@'; the price is everything after the last " @ ".
    let (name_part, price_part) = rest
        .rsplit_once(" @ ")
        .ok_or_else(|| format!("missing price separator in {:?}", line))?;

    let quantity: u32 = qty_part
        .trim()
        .parse()
        .map_err(|_| format!("unparseable quantity {:?}", qty_part.trim()))?;

    let unit_price: Decimal = price_part
        .trim()
        .parse()
        .map_err(|_| format!("unparseable price {:?}", price_part.trim()))?;

    let name = name_part.trim();
    if name.is_empty() {
        return Err("empty item name".to_string());
    }

    Ok(LineItem::new(ItemId::new(id), name, unit_price, quantity))
}
