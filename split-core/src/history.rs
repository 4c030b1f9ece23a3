//! Payment history
//!
//! Append-only, most-recent-first record of completed settlements.
//! Records are immutable once appended and there is no deletion
//! operation; the storage technology behind a persistent deployment is a
//! caller concern, this is the logical record.

use crate::types::SettlementRecord;
use std::collections::VecDeque;

/// Ordered settlement records, newest first
#[derive(Debug, Default)]
pub struct PaymentHistory {
    records: VecDeque<SettlementRecord>,
}

impl PaymentHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the head
    pub fn append(&mut self, record: SettlementRecord) {
        tracing::info!(
            record_id = %record.record_id,
            restaurant = %record.restaurant,
            amount = %record.fiat_amount,
            status = %record.status,
            "settlement recorded"
        );
        self.records.push_front(record);
    }

    /// All records, newest first
    pub fn all(&self) -> Vec<SettlementRecord> {
        self.records.iter().cloned().collect()
    }

    /// At most `limit` newest records
    pub fn recent(&self, limit: usize) -> Vec<SettlementRecord> {
        self.records.iter().take(limit).cloned().collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True iff no settlements have been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
