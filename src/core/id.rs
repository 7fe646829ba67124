use chrono::{DateTime, Utc};

use crate::core::error::{TransactionError, TransactionResult};
use crate::core::transaction::TransactionId;

/// Hands out timestamp-derived ids that never repeat within a session.
///
/// An id is the creation time in milliseconds since the epoch, unless that
/// would not exceed the last id handed out (two entries in the same
/// millisecond, a clock stepping backwards, or loaded ids from a clock that
/// ran ahead), in which case it is the last id plus one.
#[derive(Debug)]
pub struct IdGenerator {
    last: Option<TransactionId>,
}

impl IdGenerator {
    /// Starts after the largest of `existing`.
    pub fn after<I>(existing: I) -> IdGenerator
    where
        I: IntoIterator<Item = TransactionId>
    {
        IdGenerator { last: existing.into_iter().max() }
    }

    /// Fails once the last id handed out is `TransactionId::MAX`.
    pub fn next_at(&mut self, now: DateTime<Utc>) -> TransactionResult<TransactionId> {
        let millis = TransactionId::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = match self.last {
            Some(last) if millis <= last => last.checked_add(1)
                .ok_or(TransactionError::IdsExhausted)?,
            _ => millis
        };
        self.last = Some(id);
        return Ok(id);
    }
}
