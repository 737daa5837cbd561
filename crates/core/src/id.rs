//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a line item.
///
/// Opaque to callers; values handed out by one [`IdSequence`] are strictly
/// increasing, so ordering by id is ordering by creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(u64);

impl LineItemId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for LineItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("LineItemId: {e}")))?;
        Ok(Self(raw))
    }
}

/// Monotonic id source.
///
/// Never rewinds: ids stay unique for the lifetime of the sequence even after
/// the items they were given to are removed.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next identifier.
    pub fn next_id(&mut self) -> Result<LineItemId, DomainError> {
        self.last = self
            .last
            .checked_add(1)
            .ok_or_else(|| DomainError::invariant("line item id space exhausted"))?;
        Ok(LineItemId(self.last))
    }

    /// The most recently issued id, if any.
    pub fn last_issued(&self) -> Option<LineItemId> {
        (self.last > 0).then_some(LineItemId(self.last))
    }
}
